//! Report-specific element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` ships paragraphs, tables and page breaks.  The report additionally needs fixed-height
//! spacers, headings on a bordered panel, status table cell backgrounds, and a way to place the
//! custom drawables from [`crate::timeline`] and [`crate::progress`] in the document flow.

use genpdf::elements::CellDecorator;
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{Color, Style};
use genpdf::{render, Element, Mm, Position, RenderResult, Size};
use log::debug;

use crate::canvas::{mm_from_pt, AreaSurface};
use crate::drawing::{Drawable, Stroke};
use crate::paint::{Paint, PaintQueue};
use crate::theme;

/// Vertical gap of a fixed height, given in points.
///
/// A spacer that does not fit at the bottom of a page is shortened to the remaining space instead
/// of pushing an empty gap to the next page.
pub struct Spacer {
    height: Mm,
}

impl Spacer {
    pub fn new(height_pt: f64) -> Self {
        Self {
            height: mm_from_pt(height_pt),
        }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// A single-line section title on a bordered panel spanning the full width.
pub struct SectionHeading {
    text: String,
    style: Style,
    panel: Color,
    border: Stroke,
    padding: Mm,
    space_before: Mm,
    space_after: Mm,
    paints: PaintQueue,
}

impl SectionHeading {
    pub fn new(text: impl Into<String>, style: Style, paints: PaintQueue) -> Self {
        Self {
            text: text.into(),
            style,
            panel: theme::PANEL,
            border: Stroke::new(theme::ACCENT, theme::HEADING_BORDER),
            padding: mm_from_pt(theme::HEADING_PADDING),
            space_before: Mm::default(),
            space_after: Mm::default(),
            paints,
        }
    }

    /// Sets the gaps above and below the heading in points and returns the updated heading.
    pub fn with_spacing(mut self, before_pt: f64, after_pt: f64) -> Self {
        self.space_before = mm_from_pt(before_pt);
        self.space_after = mm_from_pt(after_pt);
        self
    }
}

impl Element for SectionHeading {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let style = style.and(self.style);
        let line_height = style.line_height(&context.font_cache);
        let panel_height = self.padding + line_height + self.padding;
        let total = self.space_before + panel_height + self.space_after;

        let mut result = RenderResult::default();
        if total > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        area.add_offset(Position::new(0, self.space_before));
        let width = area.size().width;
        self.paints.draw(
            &area,
            rectangle(width, panel_height),
            Paint::filled(self.panel).with_outline(self.border),
        );

        let origin = Position::new(self.padding, self.padding);
        match area.text_section(&context.font_cache, origin, style) {
            Some(mut section) => section.print_str(&self.text, style)?,
            None => {
                return Err(Error::new(
                    format!("Heading {:?} does not fit into its panel", self.text),
                    ErrorKind::PageSizeExceeded,
                ))
            }
        }

        result.size = Size::new(width, total);
        Ok(result)
    }
}

/// Corners of a rectangle anchored at the upper left corner of an area.
fn rectangle(width: Mm, height: Mm) -> Vec<Position> {
    vec![
        Position::new(0, 0),
        Position::new(width, 0),
        Position::new(width, height),
        Position::new(0, height),
    ]
}

/// Cell backgrounds and grid lines of the status table.
///
/// The first row is the header band; body rows alternate between two stripe colours.  Every cell
/// is painted underneath the page content since `genpdf` decorates cells after their text.
#[derive(Clone, Debug)]
pub struct StatusTableDecorator {
    header: Color,
    stripes: [Color; 2],
    grid: Stroke,
    paints: PaintQueue,
}

impl StatusTableDecorator {
    pub fn new(paints: PaintQueue) -> Self {
        Self {
            header: theme::ACCENT,
            stripes: [theme::WHITE, theme::PANEL],
            grid: Stroke::new(theme::GRID, theme::TABLE_GRID_WIDTH),
            paints,
        }
    }

    /// Background colour of the given row.
    pub fn row_fill(&self, row: usize) -> Color {
        match row {
            0 => self.header,
            _ => self.stripes[(row - 1) % self.stripes.len()],
        }
    }
}

impl CellDecorator for StatusTableDecorator {
    fn decorate_cell(
        &mut self,
        _column: usize,
        row: usize,
        _has_more: bool,
        area: render::Area<'_>,
        _style: Style,
    ) {
        let size = area.size();
        self.paints.draw(
            &area,
            rectangle(size.width, size.height),
            Paint::filled(self.row_fill(row))
                .with_outline(self.grid)
                .as_underlay(),
        );
    }
}

/// Places a [`Drawable`] in the document flow, centered horizontally.
///
/// The drawable never splits across pages: when the remaining space is too small the figure moves
/// to the next page as a whole.
pub struct Figure<D> {
    drawable: D,
    label: &'static str,
    paints: PaintQueue,
}

impl<D: Drawable> Figure<D> {
    pub fn new(label: &'static str, drawable: D, paints: PaintQueue) -> Self {
        Self {
            drawable,
            label,
            paints,
        }
    }
}

impl<D: Drawable> Element for Figure<D> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let bounds = self.drawable.bounds();
        let width = mm_from_pt(bounds.width);
        let height = mm_from_pt(bounds.height);

        let mut result = RenderResult::default();
        if height > area.size().height {
            debug!("{} figure does not fit, deferring to next page", self.label);
            result.has_more = true;
            return Ok(result);
        }

        let available = area.size().width;
        if width < available {
            area.add_offset(Position::new((available - width) / 2.0, 0));
        }
        area.set_width(width);
        area.set_height(height);

        debug!(
            "rendering {} figure ({} x {} pt)",
            self.label, bounds.width, bounds.height
        );
        let mut surface = AreaSurface::new(context, area, &self.paints);
        self.drawable.render(&mut surface, bounds);
        surface.finish()?;

        result.size = Size::new(width, height);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{rectangle, StatusTableDecorator};
    use crate::paint::PaintQueue;
    use crate::theme;
    use genpdf::{Mm, Position};

    #[test]
    fn header_band_then_alternating_stripes() {
        let decorator = StatusTableDecorator::new(PaintQueue::new());
        assert_eq!(decorator.row_fill(0), theme::ACCENT);
        assert_eq!(decorator.row_fill(1), theme::WHITE);
        assert_eq!(decorator.row_fill(2), theme::PANEL);
        assert_eq!(decorator.row_fill(3), theme::WHITE);
        assert_eq!(decorator.row_fill(6), theme::PANEL);
    }

    #[test]
    fn rectangle_walks_the_corners_clockwise() {
        let corners = rectangle(Mm::from(40), Mm::from(10));
        assert_eq!(
            corners,
            vec![
                Position::new(0, 0),
                Position::new(40, 0),
                Position::new(40, 10),
                Position::new(0, 10),
            ]
        );
    }
}

//! `genpdf` backend for the drawing primitives in [`crate::drawing`].

use genpdf::error::{Error, ErrorKind};
use genpdf::render::Area;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{Context, Mm, Position};

use crate::drawing::{arc_points, DrawCommand, FontSpec, Point, Surface, TextMeasure};
use crate::paint::{Paint, PaintQueue};

const POINTS_PER_INCH: f64 = 72.0;
const MM_PER_INCH: f64 = 25.4;

/// Converts PDF points into `genpdf` millimetres.
pub fn mm_from_pt(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value * MM_PER_INCH / POINTS_PER_INCH))
}

/// Converts `genpdf` millimetres into PDF points.
pub fn pt_from_mm(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0 * POINTS_PER_INCH / MM_PER_INCH
}

fn position(point: Point) -> Position {
    Position::new(mm_from_pt(point.x), mm_from_pt(point.y))
}

fn text_style(font: FontSpec, color: Option<Color>) -> Style {
    let mut style = Style::new().with_font_size(font.size);
    if font.bold {
        style.set_bold();
    }
    if let Some(color) = color {
        style.set_color(color);
    }
    style
}

/// Surface that paints onto a `genpdf` render area.
///
/// Text goes straight through `genpdf`.  Lines, discs and wedges are queued on a [`PaintQueue`]
/// so that their fill colour and stroke width survive into the final document.
pub struct AreaSurface<'a, 'p> {
    context: &'a Context,
    area: Area<'p>,
    paints: &'a PaintQueue,
    error: Option<Error>,
}

impl<'a, 'p> AreaSurface<'a, 'p> {
    pub fn new(context: &'a Context, area: Area<'p>, paints: &'a PaintQueue) -> Self {
        Self {
            context,
            area,
            paints,
            error: None,
        }
    }

    /// Returns the first error raised while printing text, if any.
    pub fn finish(self) -> Result<(), Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn path(&self, points: Vec<Point>, paint: Paint) {
        self.paints
            .draw(&self.area, points.into_iter().map(position).collect(), paint);
    }

    fn print(&mut self, origin: Point, text: &str, font: FontSpec, color: Color) {
        if text.is_empty() || self.error.is_some() {
            return;
        }
        let style = text_style(font, Some(color));
        let ascent = style
            .font(&self.context.font_cache)
            .glyph_height(style.font_size());
        let top_left = Position::new(mm_from_pt(origin.x), mm_from_pt(origin.y) - ascent);
        match self
            .area
            .text_section(&self.context.font_cache, top_left, style)
        {
            Some(mut section) => {
                if let Err(err) = section.print_str(text, style) {
                    self.error = Some(err);
                }
            }
            None => {
                self.error = Some(Error::new(
                    format!(
                        "Label {:?} at ({:.1}, {:.1}) does not fit into the figure",
                        text, origin.x, origin.y
                    ),
                    ErrorKind::PageSizeExceeded,
                ));
            }
        }
    }
}

impl TextMeasure for AreaSurface<'_, '_> {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        let string = StyledString::new(text.to_owned(), text_style(font, None));
        pt_from_mm(string.width(&self.context.font_cache))
    }
}

impl Surface for AreaSurface<'_, '_> {
    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Line { from, to, stroke } => {
                self.path(vec![from, to], Paint::stroked(stroke))
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                outline,
            } => self.path(
                arc_points(center, radius, 0.0, 360.0),
                Paint::filled(fill).with_outline(outline),
            ),
            DrawCommand::Wedge {
                center,
                radius,
                start_angle,
                sweep,
                fill,
                outline,
            } => {
                let mut edge = vec![center];
                edge.extend(arc_points(center, radius, start_angle, sweep));
                self.path(edge, Paint::filled(fill).with_outline(outline));
            }
            DrawCommand::Text {
                origin,
                text,
                font,
                color,
            } => self.print(origin, &text, font, color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{mm_from_pt, pt_from_mm};

    #[test]
    fn point_conversion_round_trips_an_inch() {
        let inch = mm_from_pt(72.0);
        let mm: printpdf::Mm = inch.into();
        assert!((mm.0 - 25.4).abs() < 1e-6);
        assert!((pt_from_mm(inch) - 72.0).abs() < 1e-6);
    }

    #[test]
    fn figure_offsets_convert_without_drift() {
        for value in [0.5, 1.0, 17.25, 450.0, 595.28] {
            let mm: printpdf::Mm = mm_from_pt(value).into();
            assert!((mm.0 - value * 25.4 / 72.0).abs() < 1e-9);
            assert!((pt_from_mm(mm_from_pt(value)) - value).abs() < 1e-9);
        }
    }
}

//! Backend-independent drawing primitives for the custom report graphics.
//!
//! Drawables describe what they paint as a sequence of [`DrawCommand`]s sent to a [`Surface`].
//! Coordinates are PDF points relative to the upper left corner of the drawable's bounds, with the
//! y axis pointing down, which matches how `genpdf` areas are addressed.  Text is positioned by its
//! baseline so centering math only depends on the measured advance width.
//!
//! Two surfaces exist: [`crate::canvas::AreaSurface`] forwards commands to a `genpdf` render area,
//! and [`RecordingSurface`] keeps them in memory so layout math can be inspected directly.

use genpdf::style::Color;

/// A point in drawable-local coordinates (points, y down).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height reserved for a drawable, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Font selection for text drawn on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontSpec {
    pub size: u8,
    pub bold: bool,
}

impl FontSpec {
    pub const fn regular(size: u8) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: u8) -> Self {
        Self { size, bold: true }
    }
}

/// Outline color and thickness (points).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// A single vector primitive emitted by a drawable.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Straight line segment.
    Line { from: Point, to: Point, stroke: Stroke },
    /// Filled circle with an outline.
    Circle {
        center: Point,
        radius: f64,
        fill: Color,
        outline: Stroke,
    },
    /// Filled pie wedge.
    ///
    /// Angles are in degrees, counter-clockwise from three o'clock as seen on the page.  A negative
    /// sweep runs clockwise.
    Wedge {
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        fill: Color,
        outline: Stroke,
    },
    /// Text whose baseline starts at `origin`.
    Text {
        origin: Point,
        text: String,
        font: FontSpec,
        color: Color,
    },
}

/// Text measurement capability used for centering labels.
pub trait TextMeasure {
    /// Returns the advance width of `text` in points.
    fn text_width(&self, text: &str, font: FontSpec) -> f64;
}

/// Drawing target handed to a [`Drawable`] for a single render pass.
pub trait Surface: TextMeasure {
    fn draw(&mut self, command: DrawCommand);
}

/// Custom graphics that paint themselves onto a borrowed surface.
pub trait Drawable {
    /// Space the drawable wants in the document flow.
    fn bounds(&self) -> Bounds;

    /// Emits the drawing commands for the given bounds.
    fn render(&self, surface: &mut dyn Surface, bounds: Bounds);
}

/// Draws `text` horizontally centered on `center_x` with its baseline at `baseline`.
///
/// Returns the x coordinate the text was started at.
pub fn draw_centered_text(
    surface: &mut dyn Surface,
    text: &str,
    center_x: f64,
    baseline: f64,
    font: FontSpec,
    color: Color,
) -> f64 {
    let width = surface.text_width(text, font);
    let x = center_x - width / 2.0;
    surface.draw(DrawCommand::Text {
        origin: Point::new(x, baseline),
        text: text.to_owned(),
        font,
        color,
    });
    x
}

/// Number of polyline segments used to approximate a full circle.
const SEGMENTS_PER_TURN: f64 = 72.0;

/// Returns points along an arc, y down, using the angle convention of [`DrawCommand::Wedge`].
pub fn arc_points(center: Point, radius: f64, start_angle: f64, sweep: f64) -> Vec<Point> {
    let segments = ((sweep.abs() / 360.0) * SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
    (0..=segments)
        .map(|step| {
            let angle = (start_angle + sweep * step as f64 / segments as f64).to_radians();
            Point::new(
                center.x + radius * angle.cos(),
                center.y - radius * angle.sin(),
            )
        })
        .collect()
}

/// Measures text as a fixed fraction of the font size per character.
///
/// Useful wherever real font metrics are unavailable; the recording surface uses it by default.
#[derive(Clone, Copy, Debug)]
pub struct UniformAdvance {
    /// Advance of one character as a multiple of the font size.
    pub em_fraction: f64,
}

impl Default for UniformAdvance {
    fn default() -> Self {
        Self { em_fraction: 0.5 }
    }
}

impl TextMeasure for UniformAdvance {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        text.chars().count() as f64 * f64::from(font.size) * self.em_fraction
    }
}

/// Surface that records every command instead of painting it.
#[derive(Debug, Default)]
pub struct RecordingSurface<M = UniformAdvance> {
    measure: M,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TextMeasure> RecordingSurface<M> {
    pub fn with_measure(measure: M) -> Self {
        Self {
            measure,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text commands in emission order.
    pub fn texts(&self) -> impl Iterator<Item = (&Point, &str, FontSpec)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text {
                origin, text, font, ..
            } => Some((origin, text.as_str(), *font)),
            _ => None,
        })
    }
}

impl<M: TextMeasure> TextMeasure for RecordingSurface<M> {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        self.measure.text_width(text, font)
    }
}

impl<M: TextMeasure> Surface for RecordingSurface<M> {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn centered_text_uses_measured_width() {
        let mut surface = RecordingSurface::new();
        let x = draw_centered_text(
            &mut surface,
            "Jan 9",
            100.0,
            40.0,
            FontSpec::bold(10),
            crate::theme::INK,
        );
        // 5 chars * 10pt * 0.5
        assert!((x - 87.5).abs() < EPS);
        let (origin, text, _) = surface.texts().next().expect("text recorded");
        assert_eq!(text, "Jan 9");
        assert!((origin.y - 40.0).abs() < EPS);
    }

    #[test]
    fn arc_points_cover_the_sweep_clockwise() {
        let center = Point::new(0.0, 0.0);
        let points = arc_points(center, 10.0, 90.0, -90.0);
        let first = points.first().expect("start point");
        let last = points.last().expect("end point");
        // twelve o'clock is above the center on a y-down page
        assert!((first.x - 0.0).abs() < EPS && (first.y + 10.0).abs() < EPS);
        assert!((last.x - 10.0).abs() < EPS && last.y.abs() < EPS);
    }

    #[test]
    fn zero_sweep_still_yields_a_segment() {
        let points = arc_points(Point::new(5.0, 5.0), 2.0, 0.0, 0.0);
        assert_eq!(points.len(), 2);
    }
}

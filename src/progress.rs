//! Completed-versus-pending proportion chart.

use genpdf::style::Color;

use crate::drawing::{
    draw_centered_text, Bounds, DrawCommand, Drawable, FontSpec, Point, Stroke, Surface,
};
use crate::error::ReportError;
use crate::theme;

const PIE_RADIUS: f64 = 50.0;
/// Pie slices start at twelve o'clock and run clockwise.
const START_ANGLE: f64 = 90.0;
const SLICE_OUTLINE: f64 = 0.5;
/// Slice captions sit this far out along the slice's mid-angle, relative to the radius.
const CAPTION_DISTANCE: f64 = 1.25;

pub const PERCENT_FONT: FontSpec = FontSpec::regular(16);
pub const CAPTION_FONT: FontSpec = FontSpec::regular(8);

/// Completed and total counts behind a proportion chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProportionDatum {
    completed: u32,
    total: u32,
}

impl ProportionDatum {
    /// Validates that `total` is non-zero and not smaller than `completed`.
    pub fn new(completed: u32, total: u32) -> Result<Self, ReportError> {
        if total == 0 || completed > total {
            return Err(ReportError::InvalidProportion { completed, total });
        }
        Ok(Self { completed, total })
    }

    /// Number of completed items.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Number of items overall; never zero.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Completed share in percent.
    pub fn percentage(&self) -> f64 {
        f64::from(self.completed) / f64::from(self.total) * 100.0
    }

    /// Percentage label; the value is truncated, not rounded.
    pub fn label(&self) -> String {
        format!("{}%", self.percentage().trunc() as u32)
    }
}

/// One wedge of the proportion chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slice {
    pub value: f64,
    pub fill: Color,
    pub caption: &'static str,
}

/// Draws a two-slice pie with the completed percentage in the middle.
#[derive(Clone, Debug)]
pub struct ProgressRenderer {
    datum: ProportionDatum,
    width: f64,
    height: f64,
}

impl ProgressRenderer {
    /// Default footprint used by the report: 200 x 200 points.
    pub const DEFAULT_BOUNDS: Bounds = Bounds::new(200.0, 200.0);

    pub fn new(datum: ProportionDatum) -> Self {
        Self {
            datum,
            width: Self::DEFAULT_BOUNDS.width,
            height: Self::DEFAULT_BOUNDS.height,
        }
    }

    /// Sets the figure footprint in points and returns the updated renderer.
    ///
    /// The pie keeps its radius and stays centered in the new footprint.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Shorthand for validating the counts and building the renderer.
    pub fn from_counts(completed: u32, total: u32) -> Result<Self, ReportError> {
        ProportionDatum::new(completed, total).map(Self::new)
    }

    pub fn datum(&self) -> ProportionDatum {
        self.datum
    }

    /// Completed slice followed by the pending slice; values add up to 100.
    pub fn slices(&self) -> [Slice; 2] {
        let percentage = self.datum.percentage();
        [
            Slice {
                value: percentage,
                fill: theme::COMPLETED,
                caption: "Completed",
            },
            Slice {
                value: 100.0 - percentage,
                fill: theme::PENDING,
                caption: "Pending",
            },
        ]
    }
}

impl Drawable for ProgressRenderer {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    fn render(&self, surface: &mut dyn Surface, bounds: Bounds) {
        let center = pie_center(bounds);
        let mut angle = START_ANGLE;
        for slice in self.slices() {
            let sweep = -slice.value * 3.6;
            if sweep == 0.0 {
                continue;
            }
            surface.draw(DrawCommand::Wedge {
                center,
                radius: PIE_RADIUS,
                start_angle: angle,
                sweep,
                fill: slice.fill,
                outline: Stroke::new(theme::WHITE, SLICE_OUTLINE),
            });
            draw_caption(surface, slice.caption, center, angle + sweep / 2.0);
            angle += sweep;
        }

        draw_centered_text(
            surface,
            &self.datum.label(),
            center.x,
            center.y,
            PERCENT_FONT,
            theme::INK,
        );
    }
}

fn pie_center(bounds: Bounds) -> Point {
    Point::new(bounds.width / 2.0, bounds.height / 2.0)
}

fn draw_caption(surface: &mut dyn Surface, caption: &str, center: Point, angle: f64) {
    let radians = angle.to_radians();
    let distance = PIE_RADIUS * CAPTION_DISTANCE;
    let anchor = Point::new(
        center.x + distance * radians.cos(),
        center.y - distance * radians.sin(),
    );
    let x = if radians.cos() < 0.0 {
        anchor.x - surface.text_width(caption, CAPTION_FONT)
    } else {
        anchor.x
    };
    surface.draw(DrawCommand::Text {
        origin: Point::new(x, anchor.y),
        text: caption.to_owned(),
        font: CAPTION_FONT,
        color: theme::INK,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{RecordingSurface, TextMeasure};

    const EPS: f64 = 1e-9;
    const DEFAULT_CENTER: Point = Point::new(100.0, 100.0);

    fn render(completed: u32, total: u32) -> RecordingSurface {
        let renderer = ProgressRenderer::from_counts(completed, total).expect("valid counts");
        let mut surface = RecordingSurface::new();
        renderer.render(&mut surface, renderer.bounds());
        surface
    }

    fn wedges(surface: &RecordingSurface) -> Vec<(f64, f64, Color)> {
        surface
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Wedge {
                    start_angle,
                    sweep,
                    fill,
                    ..
                } => Some((*start_angle, *sweep, *fill)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn percentage_and_slices_follow_counts() {
        let renderer = ProgressRenderer::from_counts(3, 5).expect("valid counts");
        assert!((renderer.datum().percentage() - 60.0).abs() < EPS);
        let [done, pending] = renderer.slices();
        assert!((done.value - 60.0).abs() < EPS);
        assert!((pending.value - 40.0).abs() < EPS);
        assert_eq!(done.fill, theme::COMPLETED);
        assert_eq!(pending.fill, theme::PENDING);
    }

    #[test]
    fn label_truncates_instead_of_rounding() {
        let datum = ProportionDatum::new(2, 3).expect("valid counts");
        assert!(datum.percentage() > 66.6);
        assert_eq!(datum.label(), "66%");
        assert_eq!(ProportionDatum::new(1, 8).expect("valid").label(), "12%");
    }

    #[test]
    fn zero_total_is_rejected() {
        let err = ProportionDatum::new(0, 0).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidProportion {
                completed: 0,
                total: 0
            }
        ));
    }

    #[test]
    fn completed_above_total_is_rejected() {
        assert!(ProgressRenderer::from_counts(6, 5).is_err());
    }

    #[test]
    fn wedges_run_clockwise_from_twelve() {
        let surface = render(3, 5);
        let wedges = wedges(&surface);
        assert_eq!(wedges.len(), 2);
        assert!((wedges[0].0 - 90.0).abs() < EPS);
        assert!((wedges[0].1 + 216.0).abs() < EPS);
        assert!((wedges[1].0 + 126.0).abs() < EPS);
        assert!((wedges[1].1 + 144.0).abs() < EPS);
    }

    #[test]
    fn percentage_label_is_centered_on_the_pie() {
        let surface = render(3, 5);
        let (origin, text, font) = surface.texts().last().expect("label drawn");
        assert_eq!(text, "60%");
        assert_eq!(font, PERCENT_FONT);
        let width = surface.text_width(text, font);
        assert!((origin.x + width / 2.0 - DEFAULT_CENTER.x).abs() < EPS);
        assert!((origin.y - DEFAULT_CENTER.y).abs() < EPS);
    }

    #[test]
    fn pie_follows_a_custom_footprint() {
        let renderer = ProgressRenderer::from_counts(3, 5)
            .expect("valid counts")
            .with_size(300.0, 240.0);
        let mut surface = RecordingSurface::new();
        renderer.render(&mut surface, renderer.bounds());

        let centers: Vec<Point> = surface
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Wedge { center, radius, .. } => {
                    assert!((radius - PIE_RADIUS).abs() < EPS);
                    Some(*center)
                }
                _ => None,
            })
            .collect();
        assert_eq!(centers, vec![Point::new(150.0, 120.0); 2]);

        let (origin, text, font) = surface.texts().last().expect("label drawn");
        let width = surface.text_width(text, font);
        assert!((origin.x + width / 2.0 - 150.0).abs() < EPS);
        assert!((origin.y - 120.0).abs() < EPS);

        let captions: Vec<f64> = surface
            .texts()
            .filter(|(_, _, font)| *font == CAPTION_FONT)
            .map(|(origin, _, _)| origin.x)
            .collect();
        assert!(captions[0] > 150.0 && captions[1] < 150.0);
    }

    #[test]
    fn complete_progress_draws_a_single_full_wedge() {
        let surface = render(4, 4);
        let wedges = wedges(&surface);
        assert_eq!(wedges.len(), 1);
        assert!((wedges[0].1 + 360.0).abs() < EPS);
        assert_eq!(wedges[0].2, theme::COMPLETED);
        assert_eq!(surface.texts().last().map(|(_, text, _)| text), Some("100%"));
    }

    #[test]
    fn no_progress_draws_only_the_pending_wedge() {
        let surface = render(0, 7);
        let wedges = wedges(&surface);
        assert_eq!(wedges.len(), 1);
        assert_eq!(wedges[0].2, theme::PENDING);
        assert_eq!(surface.texts().last().map(|(_, text, _)| text), Some("0%"));
    }

    #[test]
    fn captions_flank_the_pie() {
        let surface = render(3, 5);
        let captions: Vec<_> = surface
            .texts()
            .filter(|(_, _, font)| *font == CAPTION_FONT)
            .map(|(origin, text, _)| (text.to_owned(), origin.x))
            .collect();
        assert_eq!(captions.len(), 2);
        // completed slice ends past six o'clock, so its mid-angle points right
        assert_eq!(captions[0].0, "Completed");
        assert!(captions[0].1 > DEFAULT_CENTER.x);
        assert_eq!(captions[1].0, "Pending");
        assert!(captions[1].1 < DEFAULT_CENTER.x);
    }
}

//! Horizontal milestone timeline.

use crate::drawing::{
    draw_centered_text, Bounds, DrawCommand, Drawable, FontSpec, Point, Stroke, Surface,
};
use crate::theme;

/// Distance between the bounds' edges and the ends of the axis.
pub const AXIS_INSET: f64 = 50.0;
const AXIS_WIDTH: f64 = 3.0;
const MARKER_RADIUS: f64 = 8.0;
const MARKER_OUTLINE: f64 = 2.0;
/// Baseline of the date label above the axis.
const DATE_RISE: f64 = 20.0;
/// Baselines of the first and second event label line below the axis.
const EVENT_DROP: f64 = 25.0;
const EVENT_SECOND_LINE_DROP: f64 = 35.0;
/// Event labels longer than this many characters are split over two lines.
pub const WRAP_THRESHOLD: usize = 15;

pub const DATE_FONT: FontSpec = FontSpec::bold(9);
pub const EVENT_FONT: FontSpec = FontSpec::regular(8);

/// Completion state of a milestone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MilestoneState {
    Completed,
    Pending,
}

impl MilestoneState {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// A milestone shown on the timeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineEvent {
    label_top: String,
    label_bottom: String,
    state: MilestoneState,
}

impl TimelineEvent {
    /// Creates an event from its date label, its name and its milestone state.
    pub fn new(
        label_top: impl Into<String>,
        label_bottom: impl Into<String>,
        state: MilestoneState,
    ) -> Self {
        Self {
            label_top: label_top.into(),
            label_bottom: label_bottom.into(),
            state,
        }
    }

    /// Event that has already happened; drawn in the completed colour.
    pub fn completed(label_top: impl Into<String>, label_bottom: impl Into<String>) -> Self {
        Self::new(label_top, label_bottom, MilestoneState::Completed)
    }

    /// Upcoming event; drawn in the pending colour.
    pub fn pending(label_top: impl Into<String>, label_bottom: impl Into<String>) -> Self {
        Self::new(label_top, label_bottom, MilestoneState::Pending)
    }

    /// Short date drawn above the marker.
    pub fn label_top(&self) -> &str {
        &self.label_top
    }

    /// Event name drawn below the marker.
    pub fn label_bottom(&self) -> &str {
        &self.label_bottom
    }

    pub fn state(&self) -> MilestoneState {
        self.state
    }
}

/// Splits an event name into the lines drawn under its marker.
///
/// Names longer than [`WRAP_THRESHOLD`] characters become two lines: the first two
/// space-separated words, then the rest. Shorter names stay on one line.
pub fn wrap_event_label(label: &str) -> Vec<String> {
    if label.chars().count() <= WRAP_THRESHOLD {
        return vec![label.to_owned()];
    }

    let words: Vec<&str> = label.split(' ').collect();
    let split = words.len().min(2);
    vec![words[..split].join(" "), words[split..].join(" ")]
}

/// X coordinates of `count` markers spread evenly between `start` and `end`.
pub fn marker_positions(count: usize, start: f64, end: f64) -> Vec<f64> {
    let step = if count > 1 {
        (end - start) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(|index| start + index as f64 * step).collect()
}

/// Renders an ordered list of milestones along a horizontal axis.
#[derive(Clone, Debug)]
pub struct TimelineRenderer {
    events: Vec<TimelineEvent>,
    width: f64,
    height: f64,
}

impl TimelineRenderer {
    /// Default footprint used by the report: 450 x 120 points.
    pub const DEFAULT_BOUNDS: Bounds = Bounds::new(450.0, 120.0);

    pub fn new(events: impl Into<Vec<TimelineEvent>>) -> Self {
        Self {
            events: events.into(),
            width: Self::DEFAULT_BOUNDS.width,
            height: Self::DEFAULT_BOUNDS.height,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }
}

impl Drawable for TimelineRenderer {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    fn render(&self, surface: &mut dyn Surface, bounds: Bounds) {
        let axis_y = bounds.height / 2.0;
        let start_x = AXIS_INSET;
        let end_x = bounds.width - AXIS_INSET;

        surface.draw(DrawCommand::Line {
            from: Point::new(start_x, axis_y),
            to: Point::new(end_x, axis_y),
            stroke: Stroke::new(theme::ACCENT, AXIS_WIDTH),
        });

        let positions = marker_positions(self.events.len(), start_x, end_x);
        for (event, x) in self.events.iter().zip(positions) {
            let fill = if event.state.is_completed() {
                theme::COMPLETED
            } else {
                theme::PENDING
            };
            surface.draw(DrawCommand::Circle {
                center: Point::new(x, axis_y),
                radius: MARKER_RADIUS,
                fill,
                outline: Stroke::new(theme::WHITE, MARKER_OUTLINE),
            });

            draw_centered_text(
                surface,
                &event.label_top,
                x,
                axis_y - DATE_RISE,
                DATE_FONT,
                theme::INK,
            );

            let drops = [EVENT_DROP, EVENT_SECOND_LINE_DROP];
            for (line, drop) in wrap_event_label(&event.label_bottom).iter().zip(drops) {
                draw_centered_text(surface, line, x, axis_y + drop, EVENT_FONT, theme::INK);
            }
        }
    }
}

//! Colours, font sizes and spacing used throughout the report.

use genpdf::style::{Color, Style};

/// Dark slate used for titles, headings and chart labels.
pub const INK: Color = Color::Rgb(0x2c, 0x3e, 0x50);
/// Muted grey for the cover subtitle.
pub const SUBTLE: Color = Color::Rgb(0x7f, 0x8c, 0x8d);
/// Body copy.
pub const BODY: Color = Color::Rgb(0x33, 0x33, 0x33);
/// Accent blue for the timeline axis, heading borders and the table header band.
pub const ACCENT: Color = Color::Rgb(0x34, 0x98, 0xdb);
/// Fill for completed milestones and the completed pie slice.
pub const COMPLETED: Color = Color::Rgb(0x27, 0xae, 0x60);
/// Fill for pending milestones and the pending pie slice.
pub const PENDING: Color = Color::Rgb(0xf3, 0x9c, 0x12);
/// Status text colour for pending rows in the status table.
pub const PENDING_MUTED: Color = Color::Rgb(0x95, 0xa5, 0xa6);
/// Marker outlines, slice separators and even table rows.
pub const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);
/// Header text on the accent band.
pub const WHITESMOKE: Color = Color::Rgb(0xf5, 0xf5, 0xf5);
/// Heading box background and odd table row stripes.
pub const PANEL: Color = Color::Rgb(0xf8, 0xf9, 0xfa);
/// Table grid lines.
pub const GRID: Color = Color::Rgb(0xdd, 0xdd, 0xdd);

pub const TITLE_SIZE: u8 = 26;
pub const SUBTITLE_SIZE: u8 = 14;
pub const HEADING_SIZE: u8 = 18;
pub const BODY_SIZE: u8 = 11;
pub const TABLE_SIZE: u8 = 10;

/// Space after the title, in points.
pub const TITLE_SPACE_AFTER: f64 = 20.0;
pub const SUBTITLE_SPACE_AFTER: f64 = 30.0;
pub const HEADING_SPACE_BEFORE: f64 = 25.0;
pub const HEADING_SPACE_AFTER: f64 = 15.0;
pub const BODY_SPACE_AFTER: f64 = 8.0;
pub const BULLET_SPACE_AFTER: f64 = 6.0;
pub const BULLET_INDENT: f64 = 20.0;
/// Border width of the box around section headings.
pub const HEADING_BORDER: f64 = 2.0;
/// Space between the heading box border and its text.
pub const HEADING_PADDING: f64 = 8.0;
/// Width of the table grid lines.
pub const TABLE_GRID_WIDTH: f64 = 1.0;
/// Inner padding of status table cells.
pub const TABLE_CELL_PADDING: f64 = 10.0;

pub fn title_style() -> Style {
    Style::new()
        .bold()
        .with_font_size(TITLE_SIZE)
        .with_color(INK)
}

pub fn subtitle_style() -> Style {
    Style::new()
        .bold()
        .with_font_size(SUBTITLE_SIZE)
        .with_color(SUBTLE)
}

pub fn heading_style() -> Style {
    Style::new()
        .bold()
        .with_font_size(HEADING_SIZE)
        .with_color(INK)
}

pub fn body_style() -> Style {
    Style::new().with_font_size(BODY_SIZE).with_color(BODY)
}

pub fn table_header_style() -> Style {
    Style::new()
        .bold()
        .with_font_size(TABLE_SIZE)
        .with_color(WHITESMOKE)
}

pub fn table_body_style() -> Style {
    Style::new().with_font_size(TABLE_SIZE).with_color(BODY)
}

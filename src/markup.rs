//! Inline markup for the report's narrative text.
//!
//! Narrative lines are written as plain strings with `**bold**` and `*italic*` markers and turned
//! into [`Span`]s, which convert directly into `genpdf` styled strings.  Markers may nest
//! (`**bold *and italic***`), and an unterminated marker is reported as a [`MarkupError`].

use std::fmt;

use genpdf::style::{Color, Style, StyledString};

/// A run of text with inline styling.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Assigns a text colour to the span.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    fn style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        StyledString::new(span.text.clone(), span.style())
    }
}

impl From<Span> for StyledString {
    fn from(span: Span) -> Self {
        StyledString::from(&span)
    }
}

/// Error raised for malformed markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupError {
    offset: usize,
    marker: &'static str,
}

impl MarkupError {
    /// Byte offset of the marker that was never closed.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The unclosed marker, `**` or `*`.
    pub fn marker(&self) -> &'static str {
        self.marker
    }
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unterminated `{}` marker opened at byte {}",
            self.marker, self.offset
        )
    }
}

impl std::error::Error for MarkupError {}

/// Parses `**bold**` and `*italic*` markers into spans.
///
/// Adjacent text with the same styling is merged into a single span; empty spans are dropped.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, MarkupError> {
    let mut spans: Vec<Span> = Vec::new();
    let mut current = String::new();
    let mut bold_open: Option<usize> = None;
    let mut italic_open: Option<usize> = None;

    let mut rest = input;
    while let Some(star) = rest.find('*') {
        current.push_str(&rest[..star]);
        let offset = input.len() - rest.len() + star;
        let run = if rest[star..].starts_with("**") { 2 } else { 1 };
        flush(
            &mut spans,
            &mut current,
            bold_open.is_some(),
            italic_open.is_some(),
        );

        // `***` closes italic before bold when both are open, and opens bold before italic otherwise
        let toggles_bold = run == 2 && !(italic_open.is_some() && rest[star..].starts_with("***"));
        if toggles_bold {
            bold_open = match bold_open {
                Some(_) => None,
                None => Some(offset),
            };
        } else {
            italic_open = match italic_open {
                Some(_) => None,
                None => Some(offset),
            };
        }
        let consumed = if toggles_bold { 2 } else { 1 };
        rest = &rest[star + consumed..];
    }
    current.push_str(rest);

    if let Some(offset) = bold_open {
        return Err(MarkupError {
            offset,
            marker: "**",
        });
    }
    if let Some(offset) = italic_open {
        return Err(MarkupError { offset, marker: "*" });
    }

    flush(&mut spans, &mut current, false, false);
    Ok(spans)
}

fn flush(spans: &mut Vec<Span>, buffer: &mut String, bold: bool, italic: bool) {
    if buffer.is_empty() {
        return;
    }
    let text = std::mem::take(buffer);
    if let Some(last) = spans.last_mut() {
        if last.bold == bold && last.italic == italic {
            last.text.push_str(&text);
            return;
        }
    }
    spans.push(Span {
        text,
        bold,
        italic,
        color: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_single_span() {
        let spans = parse_markup("Company: StartupXYZ").expect("valid markup");
        assert_eq!(spans, vec![Span::new("Company: StartupXYZ")]);
    }

    #[test]
    fn bold_label_followed_by_value() {
        let spans = parse_markup("**Client Representative:** Emily Rodriguez").expect("valid");
        assert_eq!(
            spans,
            vec![
                Span::new("Client Representative:").bold(),
                Span::new(" Emily Rodriguez"),
            ]
        );
    }

    #[test]
    fn italic_inside_bold() {
        let spans = parse_markup("a **b *c*** d").expect("valid");
        assert_eq!(
            spans,
            vec![
                Span::new("a "),
                Span::new("b ").bold(),
                Span::new("c").bold().italic(),
                Span::new(" d"),
            ]
        );
    }

    #[test]
    fn bold_inside_italic() {
        let spans = parse_markup("*x **y***").expect("valid");
        assert_eq!(
            spans,
            vec![
                Span::new("x ").italic(),
                Span::new("y").bold().italic(),
            ]
        );
    }

    #[test]
    fn unterminated_bold_reports_offset() {
        let err = parse_markup("ok **oops").unwrap_err();
        assert_eq!(err.marker(), "**");
        assert_eq!(err.offset(), 3);
    }

    #[test]
    fn unterminated_italic_is_an_error() {
        let err = parse_markup("*dangling").unwrap_err();
        assert_eq!(err.marker(), "*");
        assert!(err.to_string().contains("byte 0"));
    }

    #[test]
    fn span_converts_to_styled_string() {
        let styled = StyledString::from(
            Span::new("Complete")
                .bold()
                .colored(crate::theme::COMPLETED),
        );
        assert_eq!(styled.s, "Complete");
        assert!(styled.style.is_bold());
        assert_eq!(styled.style.color(), Some(crate::theme::COMPLETED));
    }
}

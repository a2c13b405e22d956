//! Filled and width-controlled vector paths on top of `genpdf`.
//!
//! `genpdf` strokes every path one point wide and never fills, so shapes that need more are
//! drawn in two passes.  During layout the outline goes through [`Area::draw_line`] in the
//! reserved [`MARKER_COLOR`] while its real [`Paint`] is queued on a [`PaintQueue`].  Once the
//! document is serialized, [`apply_paints`] walks the page content streams with `lopdf` and
//! rewrites the marker paths, in order, with the queued fill colour, stroke colour and line width.

use std::cell::RefCell;
use std::rc::Rc;

use genpdf::render::Area;
use genpdf::style::{Color, Style};
use genpdf::Position;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object};

use crate::drawing::Stroke;

/// Outline colour reserved for paths that are rewritten after rendering.
pub const MARKER_COLOR: Color = Color::Rgb(0xff, 0x00, 0xff);

/// `genpdf` writes colour components with two decimals.
const MARKER_TOLERANCE: f32 = 0.006;

/// Errors that can occur while repainting marker paths in a rendered PDF document.
#[derive(Debug)]
pub enum PaintError {
    /// The PDF bytes or a page content stream could not be processed by `lopdf`.
    Parse(lopdf::Error),
    /// A marker path was not terminated by a stroke operator.
    UnterminatedPath {
        /// 1-indexed page holding the path.
        page_number: u32,
    },
    /// The number of marker paths did not match the number of queued paints.
    Mismatch {
        /// Paints queued during layout.
        queued: usize,
        /// Marker paths found in the document.
        found: usize,
    },
}

impl From<lopdf::Error> for PaintError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for PaintError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl std::fmt::Display for PaintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Failed to process PDF content: {err}"),
            Self::UnterminatedPath { page_number } => {
                write!(f, "Unterminated vector path on page {page_number}")
            }
            Self::Mismatch { queued, found } => write!(
                f,
                "Queued {queued} vector paints but found {found} marker paths"
            ),
        }
    }
}

impl std::error::Error for PaintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::UnterminatedPath { .. } | Self::Mismatch { .. } => None,
        }
    }
}

/// How a queued path is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
    /// Closes the path before painting.
    pub closed: bool,
    /// Moves the path to the start of its page, underneath all other content.
    pub underlay: bool,
}

impl Paint {
    /// Open path stroked with `stroke`.
    pub fn stroked(stroke: Stroke) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
            closed: false,
            underlay: false,
        }
    }

    /// Closed shape filled with `fill`.
    pub fn filled(fill: Color) -> Self {
        Self {
            fill: Some(fill),
            stroke: None,
            closed: true,
            underlay: false,
        }
    }

    /// Adds an outline and returns the updated paint.
    pub fn with_outline(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Paints the path below everything else on the page.
    pub fn as_underlay(mut self) -> Self {
        self.underlay = true;
        self
    }

    fn is_visible(&self) -> bool {
        self.fill.is_some() || self.stroke.map_or(false, |stroke| stroke.width > 0.0)
    }

    fn operations(&self, path: Vec<Operation>) -> Vec<Operation> {
        let stroke = self.stroke.filter(|stroke| stroke.width > 0.0);
        let mut operations = vec![Operation::new("q", Vec::new())];
        if let Some(fill) = self.fill {
            operations.push(color_operation(fill, false));
        }
        if let Some(stroke) = stroke {
            operations.push(color_operation(stroke.color, true));
            operations.push(Operation::new(
                "w",
                vec![Object::from(stroke.width as f32)],
            ));
        }
        operations.extend(path);
        if self.closed {
            operations.push(Operation::new("h", Vec::new()));
        }
        let operator = match (self.fill.is_some(), stroke.is_some()) {
            (true, true) => "B",
            (true, false) => "f",
            _ => "S",
        };
        operations.push(Operation::new(operator, Vec::new()));
        operations.push(Operation::new("Q", Vec::new()));
        operations
    }
}

fn color_operation(color: Color, stroke: bool) -> Operation {
    let (operator, components) = match color {
        Color::Rgb(r, g, b) => (if stroke { "RG" } else { "rg" }, vec![r, g, b]),
        Color::Cmyk(c, m, y, k) => (if stroke { "K" } else { "k" }, vec![c, m, y, k]),
        Color::Greyscale(value) => (if stroke { "G" } else { "g" }, vec![value]),
    };
    Operation::new(
        operator,
        components
            .into_iter()
            .map(|component| Object::from(f32::from(component) / 255.0))
            .collect(),
    )
}

/// Paints queued during layout, shared by every element of one document.
#[derive(Clone, Debug, Default)]
pub struct PaintQueue {
    paints: Rc<RefCell<Vec<Paint>>>,
}

impl PaintQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `points` as a marker path on `area` and queues `paint` for it.
    ///
    /// Points are relative to the upper left corner of the area.  Invisible paints and paths with
    /// fewer than two points are skipped entirely.
    pub fn draw(&self, area: &Area<'_>, points: Vec<Position>, paint: Paint) {
        if points.len() < 2 || !paint.is_visible() {
            return;
        }
        self.paints.borrow_mut().push(paint);
        area.draw_line(points, Style::new().with_color(MARKER_COLOR));
    }

    /// Removes and returns the queued paints in emission order.
    pub fn take(&self) -> Vec<Paint> {
        std::mem::take(&mut *self.paints.borrow_mut())
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

fn is_marker(operation: &Operation) -> bool {
    let expected = [1.0, 0.0, 1.0];
    operation.operator == "RG"
        && operation.operands.len() == expected.len()
        && operation
            .operands
            .iter()
            .zip(expected)
            .all(|(operand, value)| {
                number(operand).map_or(false, |actual| (actual - value).abs() < MARKER_TOLERANCE)
            })
}

struct RepaintedPage {
    operations: Vec<Operation>,
    repainted: usize,
}

fn repaint_page<'a>(
    page_number: u32,
    operations: Vec<Operation>,
    paints: &mut impl Iterator<Item = &'a Paint>,
) -> Result<RepaintedPage, PaintError> {
    let mut underlay = Vec::new();
    let mut body = Vec::with_capacity(operations.len());
    let mut repainted = 0;

    let mut operations = operations.into_iter();
    while let Some(operation) = operations.next() {
        if !is_marker(&operation) {
            body.push(operation);
            continue;
        }

        let mut path = Vec::new();
        let mut terminated = false;
        for next in operations.by_ref() {
            if next.operator == "S" {
                terminated = true;
                break;
            }
            path.push(next);
        }
        if !terminated {
            return Err(PaintError::UnterminatedPath { page_number });
        }

        repainted += 1;
        // a missing paint is reported once every page has been counted
        if let Some(paint) = paints.next() {
            let target = if paint.underlay {
                &mut underlay
            } else {
                &mut body
            };
            target.extend(paint.operations(path));
        }
    }

    underlay.extend(body);
    Ok(RepaintedPage {
        operations: underlay,
        repainted,
    })
}

/// Rewrites every marker path in `pdf_bytes` with the matching entry of `paints`.
///
/// Marker paths are matched to paints in page order, then in content stream order within a page,
/// which is the order they were drawn in.  Documents without queued paints are returned as-is.
pub fn apply_paints(pdf_bytes: &[u8], paints: &[Paint]) -> Result<Vec<u8>, PaintError> {
    if paints.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let mut queued = paints.iter();
    let mut found = 0;

    for (page_number, page_id) in document.get_pages() {
        let content = Content::decode(&document.get_page_content(page_id)?)?;
        let page = repaint_page(page_number, content.operations, &mut queued)?;
        if page.repainted == 0 {
            continue;
        }
        found += page.repainted;
        let encoded = Content {
            operations: page.operations,
        }
        .encode()?;
        document.change_page_content(page_id, encoded)?;
    }

    if found != paints.len() {
        return Err(PaintError::Mismatch {
            queued: paints.len(),
            found,
        });
    }

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;
    use lopdf::{dictionary, Stream};

    fn marker() -> Operation {
        Operation::new("RG", vec![1.0f32.into(), 0.0f32.into(), 1.0f32.into()])
    }

    fn reset() -> Operation {
        Operation::new("RG", vec![0.0f32.into(), 0.0f32.into(), 0.0f32.into()])
    }

    fn path(points: &[(f32, f32)]) -> Vec<Operation> {
        let mut operations = Vec::new();
        for (index, (x, y)) in points.iter().enumerate() {
            let operator = if index == 0 { "m" } else { "l" };
            operations.push(Operation::new(operator, vec![(*x).into(), (*y).into()]));
        }
        operations.push(Operation::new("S", Vec::new()));
        operations
    }

    fn marker_path(points: &[(f32, f32)]) -> Vec<Operation> {
        let mut operations = vec![marker()];
        operations.extend(path(points));
        operations.push(reset());
        operations
    }

    fn text() -> Vec<Operation> {
        vec![
            Operation::new("BT", Vec::new()),
            Operation::new("Tj", vec![Object::string_literal("Jan 9")]),
            Operation::new("ET", Vec::new()),
        ]
    }

    fn pdf_with_pages(pages: Vec<Vec<Operation>>) -> Vec<u8> {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let mut kids = Vec::new();
        for operations in pages {
            let content = Content { operations }.encode().expect("encode content");
            let content_id = document.add_object(Stream::new(dictionary! {}, content));
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()]
            });
            kids.push(Object::Reference(page_id));
        }
        let count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id
        });
        document.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        document.save_to(&mut bytes).expect("save pdf");
        bytes
    }

    fn page_operators(pdf: &[u8]) -> Vec<Vec<String>> {
        let document = Document::load_mem(pdf).expect("load pdf");
        document
            .get_pages()
            .into_values()
            .map(|page_id| {
                let content = document.get_page_content(page_id).expect("page content");
                Content::decode(&content)
                    .expect("decode content")
                    .operations
                    .into_iter()
                    .map(|operation| operation.operator)
                    .collect()
            })
            .collect()
    }

    fn find(operators: &[String], operator: &str) -> usize {
        operators
            .iter()
            .position(|candidate| candidate == operator)
            .unwrap_or_else(|| panic!("{operator} missing from {operators:?}"))
    }

    #[test]
    fn filled_circle_gets_fill_width_and_outline() {
        let mut page = marker_path(&[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)]);
        page.extend(text());
        let pdf = pdf_with_pages(vec![page]);

        let paint =
            Paint::filled(theme::COMPLETED).with_outline(Stroke::new(theme::WHITE, 2.0));
        let repainted = apply_paints(&pdf, &[paint]).expect("repaint");

        let document = Document::load_mem(&repainted).expect("load pdf");
        let page_id = document.get_pages()[&1];
        let content =
            Content::decode(&document.get_page_content(page_id).expect("content")).expect("decode");
        let operations = content.operations;

        assert!(!operations.iter().any(is_marker), "marker colour must be gone");
        let width = operations
            .iter()
            .find(|operation| operation.operator == "w")
            .expect("line width set");
        assert_eq!(number(&width.operands[0]), Some(2.0));
        let fill = operations
            .iter()
            .find(|operation| operation.operator == "rg")
            .expect("fill colour set");
        let green = number(&fill.operands[1]).expect("number");
        assert!((green - 0xae as f32 / 255.0).abs() < 1e-4);

        let operators: Vec<&str> = operations
            .iter()
            .map(|operation| operation.operator.as_str())
            .collect();
        assert_eq!(
            &operators[..10],
            &["q", "rg", "RG", "w", "m", "l", "l", "h", "B", "Q"]
        );
    }

    #[test]
    fn stroked_line_keeps_the_path_open() {
        let pdf = pdf_with_pages(vec![marker_path(&[(0.0, 50.0), (100.0, 50.0)])]);
        let repainted = apply_paints(&pdf, &[Paint::stroked(Stroke::new(theme::ACCENT, 3.0))])
            .expect("repaint");

        let operators = &page_operators(&repainted)[0];
        assert!(!operators.iter().any(|operator| operator == "h"));
        assert!(!operators.iter().any(|operator| operator == "rg"));
        assert!(find(operators, "w") < find(operators, "S"));
    }

    #[test]
    fn underlay_moves_below_earlier_text() {
        let mut page = text();
        page.extend(marker_path(&[(0.0, 0.0), (50.0, 0.0), (50.0, 20.0), (0.0, 20.0)]));
        let pdf = pdf_with_pages(vec![page]);

        let band = Paint::filled(theme::ACCENT).as_underlay();
        let repainted = apply_paints(&pdf, &[band]).expect("repaint");

        let operators = &page_operators(&repainted)[0];
        assert!(find(operators, "f") < find(operators, "BT"));
    }

    #[test]
    fn paints_follow_page_order() {
        let pdf = pdf_with_pages(vec![
            marker_path(&[(0.0, 0.0), (10.0, 0.0)]),
            marker_path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]),
        ]);
        let paints = [
            Paint::stroked(Stroke::new(theme::ACCENT, 3.0)),
            Paint::filled(theme::PENDING),
        ];
        let repainted = apply_paints(&pdf, &paints).expect("repaint");

        let pages = page_operators(&repainted);
        assert!(pages[0].iter().any(|operator| operator == "S"));
        assert!(!pages[0].iter().any(|operator| operator == "f"));
        assert!(pages[1].iter().any(|operator| operator == "f"));
    }

    #[test]
    fn unmatched_markers_are_reported() {
        let pdf = pdf_with_pages(vec![marker_path(&[(0.0, 0.0), (10.0, 0.0)])]);
        let paints = [
            Paint::filled(theme::PENDING),
            Paint::filled(theme::COMPLETED),
        ];
        match apply_paints(&pdf, &paints) {
            Err(PaintError::Mismatch { queued, found }) => assert_eq!((queued, found), (2, 1)),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn unpainted_document_passes_through() {
        let pdf = pdf_with_pages(vec![text()]);
        assert_eq!(apply_paints(&pdf, &[]).expect("no-op"), pdf);
    }

    #[test]
    fn invisible_paint_has_nothing_to_stroke() {
        assert!(!Paint::stroked(Stroke::new(theme::WHITE, 0.0)).is_visible());
        assert!(Paint::filled(theme::WHITE).is_visible());
    }
}

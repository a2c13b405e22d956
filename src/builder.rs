//! Turns a report story into a `genpdf` document and serializes it.

use genpdf::elements::{PageBreak, Paragraph, TableLayout};
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{self, Element, Margins, PageDecorator, PaperSize, Size};
use log::{debug, info};

#[cfg(feature = "hyphenation")]
use hyphenation::Standard;

use crate::canvas::mm_from_pt;
use crate::elements::{Figure, SectionHeading, Spacer, StatusTableDecorator};
use crate::error::ReportError;
use crate::fonts;
use crate::markup::Span;
use crate::model::{Block, RichParagraph, StatusTable, TextRole};
use crate::paint::{self, PaintQueue};
use crate::progress::ProgressRenderer;
use crate::theme;
use crate::timeline::TimelineRenderer;

/// Builder for `genpdf::Document` instances pre-configured for the report.
pub struct DocumentBuilder {
    title: String,
    paper_size: Size,
    margin_pt: f64,
    #[cfg(feature = "hyphenation")]
    hyphenator: Option<Standard>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            title: String::new(),
            paper_size: PaperSize::A4.into(),
            margin_pt: 72.0,
            #[cfg(feature = "hyphenation")]
            hyphenator: None,
        }
    }
}

impl DocumentBuilder {
    /// Creates a builder for an untitled A4 document with one-inch margins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the PDF document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the paper size used for every page.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    /// Sets the margin applied on all four sides, in points.
    pub fn with_margin_pt(mut self, margin_pt: f64) -> Self {
        self.margin_pt = margin_pt;
        self
    }

    /// Enables hyphenation of body paragraphs.
    #[cfg(feature = "hyphenation")]
    pub fn with_hyphenator(mut self, hyphenator: Standard) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }

    /// Builds an empty document with fonts, paper size and margins applied.
    pub fn build(self) -> Result<genpdf::Document, ReportError> {
        let font_family = fonts::default_font_family().map_err(ReportError::Fonts)?;
        let mut document = genpdf::Document::new(font_family);

        document.set_title(self.title);
        document.set_paper_size(self.paper_size);
        let margin = mm_from_pt(self.margin_pt);
        document.set_page_decorator(MarginDecorator {
            page: 0,
            margins: Margins::trbl(margin, margin, margin, margin),
        });

        #[cfg(feature = "hyphenation")]
        if let Some(hyphenator) = self.hyphenator {
            document.set_hyphenator(hyphenator);
        }

        Ok(document)
    }
}

struct MarginDecorator {
    page: usize,
    margins: Margins,
}

impl PageDecorator for MarginDecorator {
    fn decorate_page<'a>(
        &mut self,
        _context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        debug!("starting page {}", self.page);
        area.add_margins(self.margins);
        Ok(area)
    }
}

/// Rendered PDF bytes.
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
}

/// Appends every block of `story` to `document` and serializes the result.
///
/// Vector paths queued by figures, headings and the status table are painted into the serialized
/// bytes before they are returned.
pub fn render_story(
    mut document: genpdf::Document,
    story: &[Block],
) -> Result<RenderedPdf, ReportError> {
    debug!("laying out {} story blocks", story.len());
    let paints = PaintQueue::new();
    for block in story {
        push_block(&mut document, block, &paints)?;
    }

    let mut bytes = Vec::new();
    document.render(&mut bytes).map_err(ReportError::Render)?;
    let queued = paints.take();
    debug!("painting {} vector paths", queued.len());
    let bytes = paint::apply_paints(&bytes, &queued)?;
    info!("rendered report ({} bytes)", bytes.len());
    Ok(RenderedPdf { bytes })
}

fn push_block(
    document: &mut genpdf::Document,
    block: &Block,
    paints: &PaintQueue,
) -> Result<(), ReportError> {
    match block {
        Block::Heading(text) => document.push(
            SectionHeading::new(text.clone(), theme::heading_style(), paints.clone())
                .with_spacing(theme::HEADING_SPACE_BEFORE, theme::HEADING_SPACE_AFTER),
        ),
        Block::Paragraph(paragraph) => document.push(rich_paragraph(paragraph)),
        Block::Spacer(height) => document.push(Spacer::new(*height)),
        Block::Timeline(events) => document.push(Figure::new(
            "timeline",
            TimelineRenderer::new(events.clone()),
            paints.clone(),
        )),
        Block::Progress(datum) => document.push(Figure::new(
            "progress",
            ProgressRenderer::new(*datum),
            paints.clone(),
        )),
        Block::Table(table) => document.push(status_table(table, paints)?),
        Block::PageBreak => document.push(PageBreak::new()),
    }
    Ok(())
}

fn rich_paragraph(source: &RichParagraph) -> impl Element {
    let mut paragraph = Paragraph::default();
    for span in source.spans() {
        paragraph.push(span);
    }
    paragraph.set_alignment(source.alignment().into());

    let (style, space_after, indent) = match source.role() {
        TextRole::Body => (theme::body_style(), theme::BODY_SPACE_AFTER, 0.0),
        TextRole::Bullet => (
            theme::body_style(),
            theme::BULLET_SPACE_AFTER,
            theme::BULLET_INDENT,
        ),
        TextRole::Title => (theme::title_style(), theme::TITLE_SPACE_AFTER, 0.0),
        TextRole::Subtitle => (theme::subtitle_style(), theme::SUBTITLE_SPACE_AFTER, 0.0),
    };
    paragraph.styled(style).padded(Margins::trbl(
        0,
        0,
        mm_from_pt(space_after),
        mm_from_pt(indent),
    ))
}

fn table_cell(span: Span, style: Style) -> impl Element {
    let padding = mm_from_pt(theme::TABLE_CELL_PADDING);
    Paragraph::new(span)
        .styled(style)
        .padded(Margins::trbl(padding, padding, padding, padding))
}

fn status_table(table: &StatusTable, paints: &PaintQueue) -> Result<TableLayout, ReportError> {
    let mut layout = TableLayout::new(table.column_weights().to_vec());
    layout.set_cell_decorator(StatusTableDecorator::new(paints.clone()));

    let mut header = layout.row();
    for title in table.headers() {
        header.push_element(table_cell(
            Span::new(title.clone()),
            theme::table_header_style(),
        ));
    }
    header.push().map_err(ReportError::Render)?;

    for row in table.rows() {
        layout
            .row()
            .element(table_cell(
                Span::new(row.milestone.clone()),
                theme::table_body_style(),
            ))
            .element(table_cell(
                Span::new(format!("\u{2022} {}", row.status)).colored(row.status_color()),
                theme::table_body_style(),
            ))
            .push()
            .map_err(ReportError::Render)?;
    }

    Ok(layout)
}

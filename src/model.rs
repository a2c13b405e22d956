//! Data structures describing the logical content of the report.
//!
//! A report is a [`Cover`] followed by titled [`Section`]s.  Both hold [`Block`]s, which mirror the
//! flowables the renderer turns into `genpdf` elements.  [`Report::story`] flattens everything into
//! the ordered block list the layout engine consumes, which is also what the tests inspect.

use genpdf::style::Color;

use crate::markup::Span;
use crate::progress::ProportionDatum;
use crate::theme;
use crate::timeline::{MilestoneState, TimelineEvent};

/// Horizontal alignment of a paragraph, mapped onto [`genpdf::Alignment`] when rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
}

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
        }
    }
}

/// Typographic role of a paragraph; decides size, indent and spacing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextRole {
    #[default]
    Body,
    Bullet,
    /// Document title on the cover.
    Title,
    /// Line under the title.
    Subtitle,
}

/// Paragraph made of styled spans.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
    role: TextRole,
}

impl RichParagraph {
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn role(&self) -> TextRole {
        self.role
    }

    /// Sets the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the role and returns the updated paragraph.
    pub fn with_role(mut self, role: TextRole) -> Self {
        self.role = role;
        self
    }

    /// Concatenated text of all spans.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }
}

/// One milestone row of the status table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusRow {
    pub milestone: String,
    pub status: String,
    pub state: MilestoneState,
}

impl StatusRow {
    pub fn new(
        milestone: impl Into<String>,
        status: impl Into<String>,
        state: MilestoneState,
    ) -> Self {
        Self {
            milestone: milestone.into(),
            status: status.into(),
            state,
        }
    }

    /// Colour of the status cell.
    pub fn status_color(&self) -> Color {
        if self.state.is_completed() {
            theme::COMPLETED
        } else {
            theme::PENDING_MUTED
        }
    }
}

/// Two-column milestone status table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusTable {
    headers: [String; 2],
    rows: Vec<StatusRow>,
    column_weights: [usize; 2],
}

impl StatusTable {
    pub fn new(rows: impl Into<Vec<StatusRow>>) -> Self {
        Self {
            headers: ["Milestone".to_owned(), "Status".to_owned()],
            rows: rows.into(),
            // 3.2in and 1.8in columns
            column_weights: [32, 18],
        }
    }

    pub fn headers(&self) -> &[String; 2] {
        &self.headers
    }

    pub fn rows(&self) -> &[StatusRow] {
        &self.rows
    }

    pub fn column_weights(&self) -> [usize; 2] {
        self.column_weights
    }
}

/// Individual content blocks that make up sections and the cover.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Section heading on a bordered panel.
    Heading(String),
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    /// Vertical gap, in points.
    Spacer(f64),
    /// Milestone timeline drawing.
    Timeline(Vec<TimelineEvent>),
    /// Completed/pending proportion chart.
    Progress(ProportionDatum),
    /// Milestone status table.
    Table(StatusTable),
    /// Explicit page break request.
    PageBreak,
}

impl Block {
    /// Convenience helper for building a body paragraph block.
    pub fn paragraph(spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(RichParagraph::new(spans))
    }

    /// Convenience helper for building a bullet paragraph block.
    pub fn bullet(spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(RichParagraph::new(spans).with_role(TextRole::Bullet))
    }

    /// Centered single-line paragraph in the given cover role.
    pub fn centered(text: impl Into<String>, role: TextRole) -> Self {
        Self::Paragraph(
            RichParagraph::new(vec![Span::new(text)])
                .with_role(role)
                .with_alignment(HorizontalAlignment::Center),
        )
    }
}

/// Title block of the report.
#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
    title: String,
    subtitle: Option<String>,
    dateline: Option<String>,
    blocks: Vec<Block>,
}

impl Cover {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            dateline: None,
            blocks: Vec::new(),
        }
    }

    /// Sets the subtitle and returns the updated cover.
    pub fn with_subtitle(mut self, subtitle: impl Into<Option<String>>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Sets the italic line under the subtitle, typically the generation date, and returns the
    /// updated cover.
    pub fn with_dateline(mut self, dateline: impl Into<Option<String>>) -> Self {
        self.dateline = dateline.into();
        self
    }

    /// Appends a block to the cover and returns the updated instance.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    fn story(&self) -> Vec<Block> {
        let mut story = vec![Block::centered(self.title.clone(), TextRole::Title)];
        if let Some(subtitle) = &self.subtitle {
            story.push(Block::centered(subtitle.clone(), TextRole::Subtitle));
        }
        if let Some(dateline) = &self.dateline {
            story.push(Block::paragraph(vec![Span::new(dateline.clone()).italic()]));
        }
        story.extend(self.blocks.iter().cloned());
        story
    }
}

/// Titled section of the report.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    title: String,
    blocks: Vec<Block>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Appends a block and returns the updated section.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Extends the section with additional blocks and returns the updated instance.
    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }

    /// Creates a builder that can inject an initial page break.
    pub fn builder(title: impl Into<String>) -> SectionBuilder {
        SectionBuilder::new(title)
    }

    /// Heading followed by the section blocks; a leading page break stays ahead of the heading.
    fn story(&self) -> Vec<Block> {
        let mut story = Vec::with_capacity(self.blocks.len() + 1);
        let mut blocks = self.blocks.iter().peekable();
        if let Some(Block::PageBreak) = blocks.peek() {
            story.push(Block::PageBreak);
            blocks.next();
        }
        story.push(Block::Heading(self.title.clone()));
        story.extend(blocks.cloned());
        story
    }
}

/// Builder for [`Section`] values.
///
/// Callers can opt in to starting the section on a fresh page via
/// [`SectionBuilder::start_on_new_page`].
#[derive(Clone, Debug, Default)]
pub struct SectionBuilder {
    title: String,
    blocks: Vec<Block>,
    start_on_new_page: bool,
}

impl SectionBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Marks the section to start on a new page.
    pub fn start_on_new_page(mut self, start_on_new_page: bool) -> Self {
        self.start_on_new_page = start_on_new_page;
        self
    }

    /// Pushes an additional block into the section.
    pub fn push_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Builds the final section, injecting a leading page break when requested.
    pub fn build(mut self) -> Section {
        if self.start_on_new_page && !matches!(self.blocks.first(), Some(Block::PageBreak)) {
            self.blocks.insert(0, Block::PageBreak);
        }

        Section {
            title: self.title,
            blocks: self.blocks,
        }
    }
}

/// A complete report: cover plus ordered sections.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    cover: Cover,
    sections: Vec<Section>,
}

impl Report {
    pub fn new(cover: Cover) -> Self {
        Self {
            cover,
            sections: Vec::new(),
        }
    }

    /// Appends a section and returns the updated report.
    pub fn add_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Flattens the cover and sections into the ordered block list handed to the layout engine.
    pub fn story(&self) -> Vec<Block> {
        let mut story = self.cover.story();
        for section in &self.sections {
            story.extend(section.story());
        }
        story
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_inserts_page_break() {
        let section = Section::builder("Intro")
            .start_on_new_page(true)
            .push_block(Block::paragraph(Vec::new()))
            .build();

        assert_eq!(
            section.story(),
            vec![
                Block::PageBreak,
                Block::Heading("Intro".to_owned()),
                Block::paragraph(Vec::new()),
            ]
        );
    }

    #[test]
    fn builder_does_not_duplicate_page_break() {
        let section = Section::builder("Intro")
            .start_on_new_page(true)
            .push_block(Block::PageBreak)
            .build();

        assert_eq!(
            section.story(),
            vec![Block::PageBreak, Block::Heading("Intro".to_owned())]
        );
    }

    #[test]
    fn page_break_precedes_section_heading_in_story() {
        let report = Report::new(Cover::new("Title"))
            .add_section(Section::new("First").with_block(Block::Spacer(10.0)))
            .add_section(
                Section::builder("Second")
                    .start_on_new_page(true)
                    .push_block(Block::Spacer(5.0))
                    .build(),
            );

        assert_eq!(
            report.story(),
            vec![
                Block::centered("Title", TextRole::Title),
                Block::Heading("First".to_owned()),
                Block::Spacer(10.0),
                Block::PageBreak,
                Block::Heading("Second".to_owned()),
                Block::Spacer(5.0),
            ]
        );
    }

    #[test]
    fn cover_story_includes_optional_lines() {
        let cover = Cover::new("Client Report")
            .with_subtitle(Some("Acme".to_owned()))
            .with_dateline(Some("May 01, 2024".to_owned()))
            .with_block(Block::Spacer(40.0));
        let story = Report::new(cover).story();

        assert_eq!(story.len(), 4);
        match &story[1] {
            Block::Paragraph(paragraph) => {
                assert_eq!(paragraph.plain_text(), "Acme");
                assert_eq!(paragraph.role(), TextRole::Subtitle);
                assert_eq!(paragraph.alignment(), HorizontalAlignment::Center);
            }
            other => panic!("expected subtitle paragraph, got {other:?}"),
        }
        match &story[2] {
            Block::Paragraph(paragraph) => {
                assert_eq!(paragraph.plain_text(), "May 01, 2024");
                assert!(paragraph.spans()[0].is_italic());
                assert_eq!(paragraph.alignment(), HorizontalAlignment::Left);
            }
            other => panic!("expected dateline paragraph, got {other:?}"),
        }
    }

    #[test]
    fn status_colors_follow_state() {
        let done = StatusRow::new("Kickoff", "Complete", MilestoneState::Completed);
        let todo = StatusRow::new("Review", "Scheduled", MilestoneState::Pending);
        assert_eq!(done.status_color(), theme::COMPLETED);
        assert_eq!(todo.status_color(), theme::PENDING_MUTED);
    }
}

//! Report dataset, story assembly and the one-shot generation entry point.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use log::info;

use crate::builder::{self, DocumentBuilder, RenderedPdf};
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::markup::{parse_markup, MarkupError, Span};
use crate::model::{Block, Cover, Report, RichParagraph, Section, StatusRow, StatusTable};
use crate::progress::ProportionDatum;
use crate::timeline::{MilestoneState, TimelineEvent};

/// A narrative line: either body text or an indented bullet, written in inline markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NarrativeLine {
    Text(String),
    Bullet(String),
    /// Blank gap between groups of lines, in points.
    Gap(u16),
}

impl NarrativeLine {
    pub fn text(markup: &str) -> Self {
        Self::Text(markup.to_owned())
    }

    pub fn bullet(markup: &str) -> Self {
        Self::Bullet(markup.to_owned())
    }
}

/// Everything printed in a client report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportData {
    pub title: String,
    pub subtitle: String,
    pub overview: Vec<NarrativeLine>,
    pub events: Vec<TimelineEvent>,
    pub progress_intro: String,
    pub status_rows: Vec<StatusRow>,
    pub meeting_notes: Vec<NarrativeLine>,
    pub next_steps: Vec<NarrativeLine>,
}

impl ReportData {
    /// The StartupXYZ onboarding report.
    pub fn sample() -> Self {
        Self {
            title: "Client Report".to_owned(),
            subtitle: "StartupXYZ - SaaS Subscription Implementation".to_owned(),
            overview: vec![
                NarrativeLine::text("Implementation progress for StartupXYZ SaaS subscription:"),
                NarrativeLine::Gap(6),
                NarrativeLine::text("**\u{2022} Company:** StartupXYZ"),
                NarrativeLine::text(
                    "**\u{2022} Solution:** Cloud-based SaaS Platform for Workflow Automation",
                ),
                NarrativeLine::text("**\u{2022} Investment:** $25,000 SaaS Subscription"),
                NarrativeLine::text("**\u{2022} Project Start:** January 9, 2024"),
                NarrativeLine::text("**\u{2022} Client Representative:** Emily Rodriguez"),
                NarrativeLine::text(
                    "**\u{2022} Current Status:** Implementation Phase - 60% Complete",
                ),
            ],
            events: vec![
                TimelineEvent::completed("Jan 9", "Partnership Launched"),
                TimelineEvent::completed("Jan 10", "Platform Activated"),
                TimelineEvent::completed("Jan 11", "Team Training"),
                TimelineEvent::pending("Jan 12", "First Reports"),
                TimelineEvent::pending("Jan 15", "Success Review"),
            ],
            progress_intro: "Current implementation status and milestone completion:".to_owned(),
            status_rows: vec![
                StatusRow::new(
                    "Partnership Agreement Finalized",
                    "Complete",
                    MilestoneState::Completed,
                ),
                StatusRow::new(
                    "Platform Setup & Configuration",
                    "Complete",
                    MilestoneState::Completed,
                ),
                StatusRow::new(
                    "Team Training & Onboarding",
                    "Complete",
                    MilestoneState::Completed,
                ),
                StatusRow::new(
                    "First Reports & Analytics",
                    "In Progress",
                    MilestoneState::Pending,
                ),
                StatusRow::new(
                    "Success Review & Optimization",
                    "Scheduled Jan 15",
                    MilestoneState::Pending,
                ),
            ],
            meeting_notes: vec![
                NarrativeLine::text("**Implementation Kickoff Meeting - January 9, 2024**"),
                NarrativeLine::text("**Client Representative:** Emily Rodriguez"),
                NarrativeLine::Gap(6),
                NarrativeLine::text("**Meeting Outcomes:**"),
                NarrativeLine::bullet("\u{2022} Finalized SaaS solution configuration"),
                NarrativeLine::bullet("\u{2022} Completed platform activation"),
                NarrativeLine::bullet("\u{2022} Scheduled team training sessions"),
                NarrativeLine::bullet("\u{2022} Discussed expansion plans for Q2 2024"),
                NarrativeLine::bullet("\u{2022} Scheduled follow-up review for January 15"),
                NarrativeLine::Gap(6),
                NarrativeLine::text(
                    "**Client Feedback:** Strong interest expressed in expanding the solution to \
                     additional teams, indicating positive early adoption and value recognition.",
                ),
            ],
            next_steps: vec![
                NarrativeLine::text("**Immediate Priorities:**"),
                NarrativeLine::Gap(6),
                NarrativeLine::text("**This Week:**"),
                NarrativeLine::bullet(
                    "\u{2192} Complete first custom reports and analytics dashboard",
                ),
                NarrativeLine::bullet("\u{2192} Finalize initial usage review and optimization"),
                NarrativeLine::Gap(6),
                NarrativeLine::text("**January 15 Follow-up Review:**"),
                NarrativeLine::bullet("\u{2192} Review platform adoption and early results"),
                NarrativeLine::bullet(
                    "\u{2192} Address any questions or additional training needs",
                ),
                NarrativeLine::bullet("\u{2192} Discuss Q2 expansion plans"),
                NarrativeLine::bullet("\u{2192} Identify optimization opportunities"),
                NarrativeLine::Gap(6),
                NarrativeLine::text("**Future Planning:**"),
                NarrativeLine::bullet("\u{2192} Plan for additional team onboarding in Q2"),
                NarrativeLine::bullet(
                    "\u{2192} Explore advanced features for enhanced productivity",
                ),
            ],
        }
    }

    /// Completed and total milestone counts taken from the timeline.
    pub fn progress(&self) -> Result<ProportionDatum, ReportError> {
        let completed = self
            .events
            .iter()
            .filter(|event| event.state().is_completed())
            .count();
        ProportionDatum::new(saturating_u32(completed), saturating_u32(self.events.len()))
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Formats a cover date the way the report prints it, e.g. `January 09, 2024`.
pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

fn narrative_blocks(lines: &[NarrativeLine]) -> Result<Vec<Block>, MarkupError> {
    lines
        .iter()
        .map(|line| match line {
            NarrativeLine::Text(markup) => Ok(Block::paragraph(parse_markup(markup)?)),
            NarrativeLine::Bullet(markup) => Ok(Block::bullet(parse_markup(markup)?)),
            NarrativeLine::Gap(points) => Ok(Block::Spacer(f64::from(*points))),
        })
        .collect()
}

/// Builds the report structure: cover, overview, timeline, progress (on a new page), notes and
/// next steps.
pub fn assemble(data: &ReportData, generated_on: NaiveDate) -> Result<Report, ReportError> {
    let cover = Cover::new(data.title.clone())
        .with_subtitle(Some(data.subtitle.clone()))
        .with_dateline(Some(format_report_date(generated_on)))
        .with_block(Block::Spacer(40.0));

    let overview = Section::new("SaaS Implementation Overview")
        .with_blocks(narrative_blocks(&data.overview)?)
        .with_block(Block::Spacer(40.0));

    let timeline = Section::new("Implementation Timeline").with_blocks([
        Block::Spacer(20.0),
        Block::Timeline(data.events.clone()),
        Block::Spacer(35.0),
    ]);

    let progress = Section::builder("Implementation Progress")
        .start_on_new_page(true)
        .push_block(Block::Paragraph(RichParagraph::new(vec![Span::new(
            data.progress_intro.clone(),
        )])))
        .push_block(Block::Spacer(15.0))
        .push_block(Block::Table(StatusTable::new(data.status_rows.clone())))
        .push_block(Block::Spacer(20.0))
        .push_block(Block::Progress(data.progress()?))
        .push_block(Block::Spacer(35.0))
        .build();

    let highlights = Section::new("Recent Collaboration Highlights")
        .with_blocks(narrative_blocks(&data.meeting_notes)?)
        .with_block(Block::Spacer(30.0));

    let next_steps = Section::new("Next Steps")
        .with_blocks(narrative_blocks(&data.next_steps)?)
        .with_block(Block::Spacer(30.0));

    Ok(Report::new(cover)
        .add_section(overview)
        .add_section(timeline)
        .add_section(progress)
        .add_section(highlights)
        .add_section(next_steps))
}

/// Renders the report for `data` to PDF bytes without touching the filesystem.
pub fn render(data: &ReportData, config: &ReportConfig) -> Result<RenderedPdf, ReportError> {
    let report = assemble(data, config.generated_on())?;

    let builder = DocumentBuilder::new()
        .with_title(format!("{} - {}", data.title, data.subtitle))
        .with_paper_size(config.paper_size())
        .with_margin_pt(config.margin_pt());

    #[cfg(feature = "hyphenation")]
    let builder = {
        use hyphenation::{Language, Load, Standard};
        let hyphenator =
            Standard::from_embedded(Language::EnglishUS).map_err(ReportError::Hyphenation)?;
        builder.with_hyphenator(hyphenator)
    };

    let document = builder.build()?;
    builder::render_story(document, &report.story())
}

/// Renders the report and writes it to the configured output path.
pub fn generate(data: &ReportData, config: &ReportConfig) -> Result<PathBuf, ReportError> {
    config.check_output_dir()?;
    let pdf = render(data, config)?;

    let path = config.output_path().to_path_buf();
    fs::write(&path, &pdf.bytes).map_err(|err| ReportError::output(&path, err))?;
    info!("wrote {} ({} bytes)", path.display(), pdf.bytes.len());
    Ok(path)
}

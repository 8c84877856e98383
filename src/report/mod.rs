//! PDF report for a scored questionnaire.

pub mod layout;
pub mod metrics;
mod pdf;

use crate::screening::{ChildDetails, ScoreReport};

use layout::{Document, LayoutWriter, PageGeometry};
use metrics::Font;

pub const REPORT_FILENAME: &str = "asd_traits_report.pdf";
pub const REPORT_TITLE: &str = "Autism Spectrum Disorder (ASD) Traits Test Result";

const LEFT: f32 = 100.0;
const TITLE_SIZE: f32 = 24.0;
const BODY_SIZE: f32 = 12.0;
const LINE: f32 = 20.0;
const WRAP_LEADING: f32 = 14.0;

/// Who the report is about.
#[derive(Debug, Clone)]
pub struct Subject {
    pub name: String,
    pub details: Option<ChildDetails>,
}

impl Subject {
    pub fn named(name: impl Into<String>) -> Self {
        Subject {
            name: name.into(),
            details: None,
        }
    }
}

pub fn render(report: &ScoreReport, subject: &Subject) -> Document {
    render_on(PageGeometry::LETTER, report, subject)
}

pub fn render_on(geometry: PageGeometry, report: &ScoreReport, subject: &Subject) -> Document {
    let mut w = LayoutWriter::new(geometry);

    w.centered(Font::HelveticaBold, TITLE_SIZE, REPORT_TITLE);
    w.advance(50.0);

    w.text(LEFT, Font::Helvetica, BODY_SIZE, format!("Username: {}", subject.name));
    w.advance(LINE);
    w.text(LEFT, Font::Helvetica, BODY_SIZE, format!("Total Score: {}/10", report.score));
    w.advance(LINE);
    w.text(LEFT, Font::Helvetica, BODY_SIZE, "Details of Your Responses:");
    w.advance(LINE);

    for (i, value) in report.responses.values().enumerate() {
        w.text(LEFT, Font::Helvetica, BODY_SIZE, format!("Question {}: {value}", i + 1));
        w.advance(LINE);
    }

    if let Some(details) = &subject.details {
        w.text(LEFT, Font::Helvetica, BODY_SIZE, "Additional Information:");
        w.advance(LINE);
        for (label, value) in details.lines() {
            w.text(LEFT, Font::Helvetica, BODY_SIZE, format!("{label}: {value}"));
            w.advance(LINE);
        }
    }

    let max_width = w.geometry().width - 2.0 * LEFT;
    w.wrapped(LEFT, Font::HelveticaBold, BODY_SIZE, report.risk.message(), max_width, WRAP_LEADING);

    let doc = w.finish();
    tracing::debug!(score = report.score, pages = doc.pages.len(), "rendered report layout");
    doc
}

/// Renders straight to PDF bytes.
pub fn render_pdf(report: &ScoreReport, subject: &Subject) -> Vec<u8> {
    render(report, subject).to_pdf(REPORT_TITLE)
}

//! Progress rendering for build runs.
//!
//! One `Reporter` is constructed per run and handed by reference to the
//! orchestrator; there is no process-wide logging singleton. It is a pure
//! sink: rendering never fails the run.

use crate::model::{OutcomeReport, Severity};
use owo_colors::{OwoColorize, Stream};

/// Output format for progress lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Styled status lines, Thor-style right-aligned labels.
    Text,
    /// One JSON object per report, for scripting.
    Json,
}

pub struct Reporter {
    format: ReportFormat,
    verbose: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Render one classified outcome. Error detail (`extra`) is shown only
    /// under verbose mode; otherwise the run-level failure summary tells the
    /// user to re-run with `--verbose`.
    pub fn report(&self, report: &OutcomeReport) {
        match self.format {
            ReportFormat::Text => {
                println!("{}", status_line(report));
                if let Some(extra) = self.visible_extra(report) {
                    println!("{}", extra.if_supports_color(Stream::Stdout, |s| s.red()));
                }
            }
            ReportFormat::Json => {
                let mut shown = report.clone();
                if self.visible_extra(report).is_none() {
                    shown.extra = None;
                }
                if let Ok(line) = serde_json::to_string(&shown) {
                    println!("{}", line);
                }
            }
        }
    }

    /// Plain informational line, outside the per-artifact stream.
    pub fn message(&self, msg: &str) {
        eprintln!("{}", msg);
    }

    /// Run-level failure summary.
    pub fn failure(&self, msg: &str) {
        eprintln!("{}", msg.if_supports_color(Stream::Stderr, |s| s.red()));
    }

    /// Non-fatal warning, surfaced only under verbose mode. Used by cleanup
    /// for individual removal failures.
    pub fn verbose_warning(&self, msg: &str) {
        if self.verbose {
            eprintln!("{}", msg.if_supports_color(Stream::Stderr, |s| s.yellow()));
        }
    }

    fn visible_extra<'a>(&self, report: &'a OutcomeReport) -> Option<&'a str> {
        if self.verbose && report.severity == Severity::Error {
            report.extra.as_deref()
        } else {
            None
        }
    }
}

/// Format a status line with the label right-aligned and colored by severity.
fn status_line(report: &OutcomeReport) -> String {
    let label = format!("{:>12}", report.label);
    let colored = match report.severity {
        Severity::Error => label
            .if_supports_color(Stream::Stdout, |s| s.red())
            .to_string(),
        Severity::Success => label
            .if_supports_color(Stream::Stdout, |s| s.green())
            .to_string(),
        Severity::Warning => label
            .if_supports_color(Stream::Stdout, |s| s.yellow())
            .to_string(),
        Severity::Neutral | Severity::Info => label
            .if_supports_color(Stream::Stdout, |s| s.blue())
            .to_string(),
    };
    format!("{}  {}", colored, report.subject)
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project marker file that makes a directory a sitegen project.
pub const PROJECT_MARKER: &str = "site.toml";

/// Kind of outcome the build engine observed for one artifact.
///
/// The set is open-ended: engines may emit kinds this CLI does not know
/// about, carried verbatim in `Other` so they still render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Error,
    Deleted,
    Created,
    Identical,
    Updated,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Error => "error",
            EventKind::Deleted => "deleted",
            EventKind::Created => "created",
            EventKind::Identical => "identical",
            EventKind::Updated => "updated",
            EventKind::Other(raw) => raw.as_str(),
        }
    }
}

/// One artifact-level outcome emitted by the build engine during a run.
#[derive(Debug, Clone)]
pub struct BuildEvent {
    pub kind: EventKind,
    /// Path or identifier of the affected artifact.
    pub target: String,
    /// Supplementary payload; populated only for `Error` (exception text)
    /// and engine-defined kinds.
    pub detail: Option<String>,
}

impl BuildEvent {
    pub fn new(kind: EventKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            detail: None,
        }
    }

    pub fn error(target: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Error,
            target: target.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Display severity for a classified outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Neutral,
    Warning,
    Error,
}

/// Rendering unit handed to the progress reporter.
///
/// Constructed from each `BuildEvent` as it arrives, rendered, discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub label: String,
    pub subject: String,
    pub severity: Severity,
    /// Shown only under verbose mode; carries the error detail text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

/// Final result of one build invocation.
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome {
    pub succeeded: bool,
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        if self.succeeded {
            0
        } else {
            1
        }
    }
}

/// Configuration snapshot for one build run, resolved from CLI flags and
/// the project config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Symbolic execution environment (e.g. production, development).
    pub environment: String,
    /// Remove orphaned files and reclaim empty directories after success.
    pub clean: bool,
    /// Optional filter restricting which source artifacts are built.
    pub glob: Option<String>,
    /// Surface error details in progress output.
    pub verbose: bool,
    /// Concurrency hint forwarded to the build engine.
    pub parallel: usize,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
}

/// Contents of `site.toml`. All fields optional; paths are relative to the
/// project root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub build_dir: Option<PathBuf>,
}

impl SiteConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn source_dir(&self, root: &Path) -> PathBuf {
        root.join(self.source.as_deref().unwrap_or(Path::new("source")))
    }

    pub fn build_dir(&self, root: &Path) -> PathBuf {
        root.join(self.build_dir.as_deref().unwrap_or(Path::new("build")))
    }
}

/// Walk upward from `start` looking for the project marker file.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(d) = dir {
        if d.join(PROJECT_MARKER).is_file() {
            return Some(d.to_path_buf());
        }
        dir = d.parent();
    }
    None
}

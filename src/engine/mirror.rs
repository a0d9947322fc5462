//! Mirror build engine: renders a source tree into the build directory.
//!
//! "Rendering" is a byte-for-byte copy; the interesting part is the outcome
//! taxonomy. Each source artifact yields exactly one event: `created` when
//! no prior output existed, `identical` when the bytes already match,
//! `updated` when they differ, `error` when the artifact could not be read
//! or written. Under the clean option, output files with no source
//! counterpart are deleted and yield `deleted`.

use super::glob;
use super::BuildEngine;
use crate::model::{BuildEvent, BuildOptions, EventKind};
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use walkdir::WalkDir;

pub struct MirrorEngine {
    options: BuildOptions,
}

impl MirrorEngine {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    async fn execute(self, events: UnboundedSender<BuildEvent>) -> bool {
        let mut failed = false;

        if !self.options.source_dir.is_dir() {
            let _ = events.send(BuildEvent::error(
                self.options.source_dir.display().to_string(),
                "source directory does not exist",
            ));
            return false;
        }
        if let Err(e) = std::fs::create_dir_all(&self.options.build_dir) {
            let _ = events.send(BuildEvent::error(
                self.options.build_dir.display().to_string(),
                format!("could not create build directory: {e}"),
            ));
            return false;
        }

        let (sources, walk_errors) = collect_relative_files(&self.options.source_dir);
        for (path, detail) in walk_errors {
            failed = true;
            let _ = events.send(BuildEvent::error(path, detail));
        }

        let selected: Vec<PathBuf> = sources
            .iter()
            .filter(|rel| match self.options.glob.as_deref() {
                Some(pattern) => glob::matches(pattern, &rel_str(rel)),
                None => true,
            })
            .cloned()
            .collect();
        tracing::debug!(
            total = sources.len(),
            selected = selected.len(),
            parallel = self.options.parallel,
            "rendering sources"
        );

        // Renders run on blocking tasks, bounded by the parallel hint; this
        // drain loop is the only sender, so event delivery stays serialized.
        let parallel = self.options.parallel.max(1);
        let mut renders = stream::iter(selected.into_iter().map(|rel| {
            let src_root = self.options.source_dir.clone();
            let build_root = self.options.build_dir.clone();
            tokio::task::spawn_blocking(move || render_one(&src_root, &build_root, &rel))
        }))
        .buffer_unordered(parallel);

        while let Some(joined) = renders.next().await {
            let event = match joined {
                Ok(ev) => ev,
                Err(e) => BuildEvent::error("render", format!("render task failed: {e}")),
            };
            if event.kind == EventKind::Error {
                failed = true;
            }
            let _ = events.send(event);
        }

        // Orphans are judged against the full source set, not the glob
        // selection, so a partial build never deletes the rest of the tree.
        if self.options.clean {
            for event in remove_orphans(&self.options.build_dir, &sources) {
                if event.kind == EventKind::Error {
                    failed = true;
                }
                let _ = events.send(event);
            }
        }

        !failed
    }
}

impl BuildEngine for MirrorEngine {
    fn run(
        self,
        events: UnboundedSender<BuildEvent>,
    ) -> impl Future<Output = bool> + Send + 'static {
        self.execute(events)
    }
}

fn rel_str(rel: &Path) -> String {
    rel.iter()
        .map(|c| c.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Enumerate regular files under `root` as root-relative paths.
fn collect_relative_files(root: &Path) -> (BTreeSet<PathBuf>, Vec<(String, String)>) {
    let mut files = BTreeSet::new();
    let mut errors = Vec::new();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(e) if e.file_type().is_file() => {
                if let Ok(rel) = e.path().strip_prefix(root) {
                    files.insert(rel.to_path_buf());
                }
            }
            Ok(_) => {}
            Err(e) => {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                errors.push((path, e.to_string()));
            }
        }
    }
    (files, errors)
}

/// Render a single artifact and report its outcome.
fn render_one(src_root: &Path, build_root: &Path, rel: &Path) -> BuildEvent {
    let shown = rel_str(rel);
    let contents = match std::fs::read(src_root.join(rel)) {
        Ok(c) => c,
        Err(e) => return BuildEvent::error(shown, e.to_string()),
    };

    let dest = build_root.join(rel);
    if dest.exists() {
        match std::fs::read(&dest) {
            Ok(existing) if existing == contents => {
                return BuildEvent::new(EventKind::Identical, shown)
            }
            Ok(_) => match std::fs::write(&dest, &contents) {
                Ok(()) => return BuildEvent::new(EventKind::Updated, shown),
                Err(e) => return BuildEvent::error(shown, e.to_string()),
            },
            Err(e) => return BuildEvent::error(shown, e.to_string()),
        }
    }

    if let Some(parent) = dest.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return BuildEvent::error(shown, e.to_string());
        }
    }
    match std::fs::write(&dest, &contents) {
        Ok(()) => BuildEvent::new(EventKind::Created, shown),
        Err(e) => BuildEvent::error(shown, e.to_string()),
    }
}

/// Delete output files whose source artifact no longer exists.
fn remove_orphans(build_root: &Path, sources: &BTreeSet<PathBuf>) -> Vec<BuildEvent> {
    let (outputs, _) = collect_relative_files(build_root);
    let mut events = Vec::new();
    for rel in outputs.difference(sources) {
        let shown = rel_str(rel);
        match std::fs::remove_file(build_root.join(rel)) {
            Ok(()) => events.push(BuildEvent::new(EventKind::Deleted, shown)),
            Err(e) => events.push(BuildEvent::error(shown, e.to_string())),
        }
    }
    events
}

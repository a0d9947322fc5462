//! Build run controller.
//!
//! Sequence per run: Validating (project marker + config), Building (engine
//! task + serialized event drain), then either cleanup on success or the
//! failure summary. Only the terminal exit code crosses the process
//! boundary; everything finer-grained goes through the reporter.

use crate::classifier::classify;
use crate::engine::{BuildEngine, MirrorEngine};
use crate::model::{
    find_project_root, BuildOptions, RunOutcome, SiteConfig, PROJECT_MARKER,
};
use crate::reclaim::reclaim;
use crate::reporter::Reporter;
use anyhow::{Context, Result};
use tokio::sync::mpsc;

/// Execute one full build run from the current working directory.
///
/// Returns `Ok` with the run outcome for everything the run itself decides
/// (precondition failures included); `Err` is reserved for environment
/// problems like an unreadable working directory.
pub async fn run_build(
    environment: &str,
    clean: bool,
    glob: Option<String>,
    parallel: usize,
    reporter: &Reporter,
) -> Result<RunOutcome> {
    // Validating: a missing project marker is a precondition failure with
    // its own message, never routed through the event classifier.
    let cwd = std::env::current_dir().context("could not determine working directory")?;
    let Some(root) = find_project_root(&cwd) else {
        reporter.failure(&format!(
            "Error: could not find a sitegen project ({PROJECT_MARKER}), perhaps you are in the wrong folder?"
        ));
        return Ok(RunOutcome { succeeded: false });
    };
    let config = match SiteConfig::load(&root.join(PROJECT_MARKER)) {
        Ok(c) => c,
        Err(e) => {
            reporter.failure(&format!("Error: invalid project config: {e:#}"));
            return Ok(RunOutcome { succeeded: false });
        }
    };

    let options = BuildOptions {
        environment: environment.to_string(),
        clean,
        glob,
        verbose: reporter.verbose(),
        parallel,
        source_dir: config.source_dir(&root),
        build_dir: config.build_dir(&root),
    };
    tracing::debug!(
        environment = %options.environment,
        source = %options.source_dir.display(),
        build = %options.build_dir.display(),
        "starting build"
    );

    let engine = MirrorEngine::new(options.clone());
    Ok(drive(engine, &options, reporter).await)
}

/// Building through Done: drive a prepared engine and apply run policy.
///
/// The drain loop here is the single consumer of the event channel, which
/// is what keeps reporter output ordered even when the engine renders in
/// parallel.
pub(crate) async fn drive<E: BuildEngine>(
    engine: E,
    options: &BuildOptions,
    reporter: &Reporter,
) -> RunOutcome {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(engine.run(event_tx));

    // The channel closes once the engine drops its sender, so this loop
    // ends exactly when the run is over.
    while let Some(event) = event_rx.recv().await {
        tracing::trace!(kind = event.kind.as_str(), target = %event.target, "build event");
        reporter.report(&classify(&event));
    }

    let succeeded = match handle.await {
        Ok(ok) => ok,
        Err(e) => {
            reporter.failure(&format!("build task failed: {e}"));
            false
        }
    };

    if !succeeded {
        let mut msg = String::from("There were errors during this build");
        if !reporter.verbose() {
            msg.push_str(", re-run with `sitegen build --verbose` to see the full exception.");
        }
        reporter.failure(&msg);
        return RunOutcome { succeeded: false };
    }

    // Cleanup runs only after success and never affects the exit code.
    if options.clean {
        let removed = reclaim(&options.build_dir, reporter);
        tracing::debug!(removed, "directory cleanup finished");
    }

    RunOutcome { succeeded: true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildEvent, EventKind};
    use crate::reporter::ReportFormat;
    use std::future::Future;
    use std::path::Path;
    use tokio::sync::mpsc::UnboundedSender;

    /// Engine that replays a fixed script and reports a fixed verdict.
    struct ScriptedEngine {
        events: Vec<BuildEvent>,
        succeeded: bool,
    }

    impl BuildEngine for ScriptedEngine {
        fn run(
            self,
            events: UnboundedSender<BuildEvent>,
        ) -> impl Future<Output = bool> + Send + 'static {
            async move {
                for ev in self.events {
                    let _ = events.send(ev);
                }
                self.succeeded
            }
        }
    }

    fn options(build_dir: &Path, clean: bool) -> BuildOptions {
        BuildOptions {
            environment: "test".into(),
            clean,
            glob: None,
            verbose: false,
            parallel: 1,
            source_dir: build_dir.join("unused-source"),
            build_dir: build_dir.to_path_buf(),
        }
    }

    fn reporter() -> Reporter {
        Reporter::new(ReportFormat::Text, false)
    }

    #[tokio::test]
    async fn successful_run_with_clean_reclaims_empty_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("tmp/deep")).unwrap();
        let engine = ScriptedEngine {
            events: vec![
                BuildEvent::new(EventKind::Created, "index.html"),
                BuildEvent::new(EventKind::Identical, "about.html"),
            ],
            succeeded: true,
        };
        let outcome = drive(engine, &options(tmp.path(), true), &reporter()).await;
        assert!(outcome.succeeded);
        assert_eq!(outcome.exit_code(), 0);
        assert!(!tmp.path().join("tmp").exists());
    }

    #[tokio::test]
    async fn failed_run_never_cleans_even_with_clean_set() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("tmp")).unwrap();
        let engine = ScriptedEngine {
            events: vec![BuildEvent::error("feed.xml", "render failed")],
            succeeded: false,
        };
        let outcome = drive(engine, &options(tmp.path(), true), &reporter()).await;
        assert!(!outcome.succeeded);
        assert_eq!(outcome.exit_code(), 1);
        assert!(tmp.path().join("tmp").exists());
    }

    #[tokio::test]
    async fn successful_run_without_clean_skips_reclaim() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("tmp")).unwrap();
        let engine = ScriptedEngine {
            events: vec![],
            succeeded: true,
        };
        let outcome = drive(engine, &options(tmp.path(), false), &reporter()).await;
        assert!(outcome.succeeded);
        assert!(tmp.path().join("tmp").exists());
    }

    #[tokio::test]
    async fn unknown_event_kinds_do_not_break_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = ScriptedEngine {
            events: vec![BuildEvent {
                kind: EventKind::Other("instrument".into()),
                target: "x".into(),
                detail: Some("render took 12ms".into()),
            }],
            succeeded: true,
        };
        let outcome = drive(engine, &options(tmp.path(), true), &reporter()).await;
        assert!(outcome.succeeded);
    }
}

//! Post-build reclamation of empty directories in the output tree.
//!
//! Deleted source artifacts leave orphaned directories behind in the build
//! directory. After a successful build this walks the tree deepest-first and
//! removes every directory with no remaining children, so multi-level empty
//! chains collapse in a single invocation.

use crate::classifier::classify;
use crate::model::{BuildEvent, EventKind};
use crate::reporter::Reporter;
use std::path::Path;
use walkdir::WalkDir;

/// Remove all empty directories under `root`, reporting each removal.
///
/// `root` itself is never removed, even when the whole tree is empty.
/// Individual removal failures are skipped and surfaced as verbose warnings;
/// they never fail the run. Returns the number of directories removed.
pub fn reclaim(root: &Path, reporter: &Reporter) -> usize {
    let mut removed = 0;

    // contents_first walks children before their parents, so a directory
    // whose only contents were just-removed subdirectories is itself empty
    // by the time we visit it.
    for entry in WalkDir::new(root).contents_first(true) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                reporter.verbose_warning(&format!("cleanup: skipping unreadable entry: {}", e));
                continue;
            }
        };
        if !entry.file_type().is_dir() || entry.path() == root {
            continue;
        }
        if !is_empty_dir(entry.path()) {
            continue;
        }
        match std::fs::remove_dir(entry.path()) {
            Ok(()) => {
                removed += 1;
                let shown = entry
                    .path()
                    .strip_prefix(root)
                    .unwrap_or(entry.path())
                    .display()
                    .to_string();
                reporter.report(&classify(&BuildEvent::new(EventKind::Deleted, shown)));
            }
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "directory removal failed");
                reporter.verbose_warning(&format!(
                    "cleanup: could not remove {}: {}",
                    entry.path().display(),
                    e
                ));
            }
        }
    }

    removed
}

fn is_empty_dir(path: &Path) -> bool {
    match std::fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::ReportFormat;
    use std::fs;

    fn reporter() -> Reporter {
        Reporter::new(ReportFormat::Text, false)
    }

    #[test]
    fn removes_single_empty_leaf() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("tmp")).unwrap();
        assert_eq!(reclaim(tmp.path(), &reporter()), 1);
        assert!(!tmp.path().join("tmp").exists());
    }

    #[test]
    fn multi_level_chain_collapses_in_one_invocation() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();
        assert_eq!(reclaim(tmp.path(), &reporter()), 3);
        assert!(!tmp.path().join("a").exists());
    }

    #[test]
    fn directories_with_files_survive() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("keep/inner")).unwrap();
        fs::write(tmp.path().join("keep/inner/page.html"), "x").unwrap();
        fs::create_dir(tmp.path().join("drop")).unwrap();
        assert_eq!(reclaim(tmp.path(), &reporter()), 1);
        assert!(tmp.path().join("keep/inner/page.html").exists());
        assert!(!tmp.path().join("drop").exists());
    }

    #[test]
    fn root_is_never_removed() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(reclaim(tmp.path(), &reporter()), 0);
        assert!(tmp.path().exists());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("index.html"), "x").unwrap();
        assert_eq!(reclaim(tmp.path(), &reporter()), 2);
        assert_eq!(reclaim(tmp.path(), &reporter()), 0);
        assert!(tmp.path().join("index.html").exists());
    }

    #[test]
    fn mixed_branch_only_empty_side_collapses() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("posts/2024/drafts")).unwrap();
        fs::write(tmp.path().join("posts/2024/hello.html"), "x").unwrap();
        assert_eq!(reclaim(tmp.path(), &reporter()), 1);
        assert!(tmp.path().join("posts/2024/hello.html").exists());
        assert!(!tmp.path().join("posts/2024/drafts").exists());
    }
}

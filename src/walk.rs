//! Target discovery for `fmt` and `lint`

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::config::WalkConfig;

/// Expand files and directories into the sorted list of documents to process
pub fn collect_files(targets: &[PathBuf], config: &WalkConfig) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for target in targets {
        if !target.exists() {
            warn!(path = %target.display(), "target does not exist, skipping");
            continue;
        }
        collect_target(target, config, &mut files);
    }
    files.sort();
    files.dedup();
    files
}

fn collect_target(target: &Path, config: &WalkConfig, files: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(target)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && config.skips_dir(e.file_name())));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && config.accepts_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
}

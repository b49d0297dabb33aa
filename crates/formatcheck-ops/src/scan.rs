use std::path::{Path, PathBuf};

use formatcheck_config::Config;
use ignore::WalkBuilder;
use tracing::trace;

use crate::OperationError;

/// Options controlling which files are checked.
#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Files or directories to check; the project root when empty.
    pub paths: Vec<PathBuf>,
    /// Honour `.gitignore` and `.ignore` files while walking.
    pub respect_ignore: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            paths: Vec::new(),
            respect_ignore: true,
        }
    }
}

/// File selected for checking.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Target {
    pub relative: PathBuf,
    pub absolute: PathBuf,
}

pub(crate) fn collect_targets(
    config: &Config,
    scan: &ScanOptions,
) -> Result<Vec<Target>, OperationError> {
    let root = &config.project.root;
    let roots: Vec<PathBuf> = if scan.paths.is_empty() {
        vec![root.clone()]
    } else {
        scan.paths
            .iter()
            .map(|path| absolutize(path, &config.sources.working_directory))
            .collect()
    };

    let mut targets = Vec::new();
    for start in roots {
        if !start.exists() {
            return Err(OperationError::InvalidInput(format!(
                "path {} does not exist",
                start.display()
            )));
        }

        // Explicitly named files skip the include/exclude filter.
        if start.is_file() {
            targets.push(target_for(root, start));
            continue;
        }

        let walker = WalkBuilder::new(&start)
            .standard_filters(scan.respect_ignore)
            .require_git(false)
            .build();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                continue;
            }
            let target = target_for(root, entry.into_path());
            if config.project.is_included(&target.relative) {
                targets.push(target);
            } else {
                trace!(path = %target.relative.display(), "excluded by project patterns");
            }
        }
    }

    targets.sort();
    targets.dedup();
    Ok(targets)
}

fn target_for(root: &Path, absolute: PathBuf) -> Target {
    let relative = absolute
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| absolute.clone());
    Target { relative, absolute }
}

pub(crate) fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

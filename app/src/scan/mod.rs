use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use storage::{path_to_string, DirectoryLister, ObjectKind, StorageError};
use utils::error::{Error, Result};

use crate::classifier::PathClassifier;
use crate::model::{FilesystemObject, ScanClock, SkipRecord};
use crate::progress::ProgressReporter;


pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100;

/// Result of the enumeration phase.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Traversal order, root first. Not sorted by path.
    pub objects: Vec<FilesystemObject>,
    pub skips: Vec<SkipRecord>,
}

/// Iterative level-order walker.
///
/// Every directory is expanded exactly once, files first and subdirectories
/// second, and its surviving children are appended to the worklist. A failure
/// below the root never aborts the walk.
pub struct TreeScanner<'a, L: DirectoryLister> {
    lister: L,
    classifier: &'a PathClassifier,
    progress: &'a dyn ProgressReporter,
    progress_interval: u64,
}

impl<'a, L: DirectoryLister> TreeScanner<'a, L> {
    pub fn new(
        lister: L, classifier: &'a PathClassifier, progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            lister,
            classifier,
            progress,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Walk the tree below `root`.
    ///
    /// Fails only when the root itself cannot be enumerated.
    pub fn scan(&self, root: &Path, clock: &ScanClock) -> Result<ScanOutcome> {
        let started = Instant::now();
        self.progress.scan_started(root);
        log::info!("Enumerating {}", root.display());

        let root_children = self.root_children(root)?;

        let mut outcome = ScanOutcome::default();
        outcome.objects.push(FilesystemObject::directory(root));

        let mut worklist: VecDeque<FilesystemObject> = root_children.into();
        let mut processed: u64 = 1;

        while let Some(item) = worklist.pop_front() {
            if item.kind.is_dir() {
                let (children, skip) = self.expand(&item.path, clock);
                worklist.extend(children);
                outcome.skips.extend(skip);
            }
            outcome.objects.push(item);

            processed += 1;
            if processed % self.progress_interval == 0 {
                let elapsed = started.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    processed as f64 / elapsed
                } else {
                    0.0
                };
                self.progress.scan_progress(processed, rate);
            }
        }

        log::info!(
            "Enumeration of {} finished: {} objects, {} skipped in {:.2}s",
            root.display(),
            outcome.objects.len(),
            outcome.skips.len(),
            started.elapsed().as_secs_f64()
        );
        self.progress
            .scan_finished(outcome.objects.len(), outcome.skips.len());

        Ok(outcome)
    }

    fn root_children(&self, root: &Path) -> Result<Vec<FilesystemObject>> {
        let files = self
            .lister
            .list_files(root)
            .map_err(|e| root_error(root, e))?;
        let dirs = self
            .lister
            .list_dirs(root)
            .map_err(|e| root_error(root, e))?;

        Ok(self.surviving(files, dirs))
    }

    /// Enumerate one directory. Whatever listing succeeded is kept; the first
    /// failure becomes a single skip record unless the directory is noise.
    fn expand(&self, dir: &Path, clock: &ScanClock) -> (Vec<FilesystemObject>, Option<SkipRecord>) {
        let mut failure: Option<StorageError> = None;

        let files = self.lister.list_files(dir).unwrap_or_else(|e| {
            failure = Some(e);
            Vec::new()
        });
        let dirs = self.lister.list_dirs(dir).unwrap_or_else(|e| {
            failure.get_or_insert(e);
            Vec::new()
        });

        let children = self.surviving(files, dirs);

        let skip = failure.and_then(|e| {
            let path = path_to_string(dir);
            if self.classifier.is_system_path(&path) {
                log::debug!("Ignoring enumeration failure on system path {}: {}", path, e);
                None
            } else {
                log::warn!("Skipping {}: {}", path, e);
                Some(clock.skip(path, e.reason()))
            }
        });

        (children, skip)
    }

    fn surviving(&self, files: Vec<PathBuf>, dirs: Vec<PathBuf>) -> Vec<FilesystemObject> {
        files
            .into_iter()
            .map(|p| (p, ObjectKind::File))
            .chain(dirs.into_iter().map(|p| (p, ObjectKind::Directory)))
            .filter(|(path, _)| {
                let keep = !self.classifier.is_system_path(&path_to_string(path));
                if !keep {
                    log::trace!("Pruned system path {}", path.display());
                }
                keep
            })
            .map(|(path, kind)| FilesystemObject::new(path, kind))
            .collect()
    }
}

fn root_error(root: &Path, err: StorageError) -> Error {
    let source = match err {
        StorageError::List { source, .. } => source,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    };
    log::error!("Cannot enumerate scan root {}: {}", root.display(), source);

    Error::RootInaccessible {
        path: path_to_string(root),
        source,
    }
}

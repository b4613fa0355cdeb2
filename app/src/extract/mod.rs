use storage::{AclEntry, AclReader, SYSTEM_SID};

use crate::classifier::PathClassifier;
use crate::model::{FilesystemObject, PermissionRecord, ScanClock, SkipRecord};
use crate::progress::ProgressReporter;


/// Caller-chosen inclusion rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub include_inherited: bool,
    pub include_system: bool,
    pub include_builtin: bool,
}

#[derive(Debug, Default)]
pub struct ExtractOutcome {
    pub records: Vec<PermissionRecord>,
    pub skips: Vec<SkipRecord>,
}

pub struct PermissionExtractor<'a, R: AclReader> {
    reader: R,
    classifier: &'a PathClassifier,
    options: ExtractOptions,
    progress: &'a dyn ProgressReporter,
}

impl<'a, R: AclReader> PermissionExtractor<'a, R> {
    pub fn new(
        reader: R, classifier: &'a PathClassifier, options: ExtractOptions,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            reader,
            classifier,
            options,
            progress,
        }
    }

    /// Read every object's ACL and keep the entries that pass the filters.
    /// A failing object becomes a skip record; extraction always completes.
    pub fn extract(&self, objects: &[FilesystemObject], clock: &ScanClock) -> ExtractOutcome {
        let mut outcome = ExtractOutcome::default();
        let total = objects.len();
        let mut last_percent = 0u64;

        for (index, object) in objects.iter().enumerate() {
            self.extract_one(object, clock, &mut outcome);

            let percent = ((index + 1) * 100 / total) as u64;
            if percent != last_percent {
                last_percent = percent;
                self.progress.extract_progress(percent as f64);
            }
        }

        log::info!(
            "Extracted {} permission records from {} objects, {} skipped",
            outcome.records.len(),
            total,
            outcome.skips.len()
        );
        self.progress
            .extract_finished(outcome.records.len(), outcome.skips.len());

        outcome
    }

    fn extract_one(
        &self, object: &FilesystemObject, clock: &ScanClock, outcome: &mut ExtractOutcome,
    ) {
        let path = object.path_string();
        if self.classifier.is_system_path(&path) {
            log::debug!("Not reading ACL of system path {}", path);
            return;
        }

        let snapshot = match self.reader.read_acl(&object.path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Skipping {}: {}", path, e);
                outcome.skips.push(clock.skip(path, e.reason()));
                return;
            }
        };

        // Per-object gate: an ACL that inherits from its parent contributes
        // nothing, explicit entries included, unless inherited rules are wanted.
        if !self.options.include_inherited && !snapshot.protected {
            log::trace!("{} inherits its ACL, skipped by inheritance filter", path);
            return;
        }

        let sanitized = sanitize_path(&path);
        outcome.records.extend(
            snapshot
                .entries
                .into_iter()
                .filter(|entry| self.accepts(entry))
                .map(|entry| PermissionRecord {
                    path: sanitized.clone(),
                    object_kind: object.kind,
                    principal: entry.principal,
                    access_type: entry.access_type,
                    rights: entry.rights,
                    is_inherited: entry.is_inherited,
                    inheritance_flags: entry.inheritance_flags,
                    propagation_flags: entry.propagation_flags,
                }),
        );
    }

    fn accepts(&self, entry: &AclEntry) -> bool {
        if !self.options.include_system && is_system_principal(entry) {
            return false;
        }
        if !self.options.include_builtin && is_builtin_principal(&entry.principal) {
            return false;
        }
        true
    }
}

/// The local SYSTEM account, by SID or by name.
pub fn is_system_principal(entry: &AclEntry) -> bool {
    entry.sid.as_deref() == Some(SYSTEM_SID)
        || entry.principal.eq_ignore_ascii_case(r"NT AUTHORITY\SYSTEM")
}

/// Principals in the BUILTIN namespace, e.g. `BUILTIN\Administrators`.
pub fn is_builtin_principal(principal: &str) -> bool {
    principal
        .get(..8)
        .map(|prefix| prefix.eq_ignore_ascii_case(r"BUILTIN\"))
        .unwrap_or(false)
}

/// Replace newlines, carriage returns and double quotes with a space.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_path(path: &str) -> String {
    path.replace(|c: char| matches!(c, '\n' | '\r' | '"'), " ")
}

//! System path classification.
//!
//! Decides, from the path string alone, whether a location is operating
//! system or per-user noise that should be neither scanned nor reported.

use utils::app_config::ClassifierConfig;

/// Well-known system locations, matched as case-insensitive substrings
/// anywhere in a path.
const SYSTEM_LOCATIONS: &[&str] = &[
    // volume metadata and recycle bins
    "$recycle.bin",
    "recycler",
    "system volume information",
    "$extend",
    // setup, recovery and upgrade leftovers
    "config.msi",
    "recovery",
    "$windows.~bt",
    "$windows.~ws",
    "$sysreset",
    "$getcurrent",
    "msocache",
    // crash dumps
    "minidump",
    "livekernelreports",
    "crashdumps",
    // prefetch and caches
    "prefetch",
    "softwaredistribution",
    "inetcache",
    // service profiles
    "serviceprofiles",
    "systemprofile",
    // packaged apps
    "windowsapps",
    // legacy junctions
    "documents and settings",
    "all users",
    "default user",
    "application data",
    "local settings",
    // localized program files aliases
    "programme",
    "programmi",
    "archivos de programa",
    "arquivos de programas",
    // per-user hidden state
    "appdata",
];

/// Well-known system file names, matched as substrings so that transaction
/// logs next to registry hives (`NTUSER.DAT.LOG1`) match too.
const SYSTEM_FILES: &[&str] = &[
    "pagefile.sys",
    "hiberfil.sys",
    "swapfile.sys",
    "ntuser.dat",
    "ntuser.ini",
    "ntuser.pol",
    "usrclass.dat",
    "dumpstack.log",
];

/// Subdirectories of the OS root that stay eligible for scanning.
const OS_ALLOWED: &[&str] = &["fonts", "help", "media"];

/// Subdirectories of the shared application-data root that stay eligible.
const PROGRAM_DATA_ALLOWED: &[&str] = &["microsoft/windows/start menu", "desktop", "documents"];

#[derive(Debug, Clone)]
pub struct PathClassifier {
    users_root: String,
    os_root: String,
    os_allowed: Vec<String>,
    program_data_root: String,
    program_data_allowed: Vec<String>,
    extra_exclusions: Vec<String>,
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(r"C:\Users", r"C:\Windows", r"C:\ProgramData")
    }
}

impl PathClassifier {
    pub fn new(users_root: &str, os_root: &str, program_data_root: &str) -> Self {
        let os_root = normalize(os_root);
        let program_data_root = normalize(program_data_root);

        Self {
            users_root: normalize(users_root),
            os_allowed: OS_ALLOWED
                .iter()
                .map(|sub| format!("{}/{}", os_root, sub))
                .collect(),
            program_data_allowed: PROGRAM_DATA_ALLOWED
                .iter()
                .map(|sub| format!("{}/{}", program_data_root, sub))
                .collect(),
            os_root,
            program_data_root,
            extra_exclusions: Vec::new(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            &config.users_root,
            &config.os_root,
            &config.program_data_root,
        )
        .with_extra_exclusions(&config.extra_exclusions)
    }

    /// Additional denylist entries, matched as plain case-insensitive substrings.
    pub fn with_extra_exclusions<S: AsRef<str>>(mut self, exclusions: &[S]) -> Self {
        self.extra_exclusions = exclusions
            .iter()
            .map(|e| normalize(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Whether `path` is an OS-internal or profile-internal location.
    pub fn is_system_path(&self, path: &str) -> bool {
        let normalized = normalize(path);
        if normalized.is_empty() {
            return false;
        }

        if self.matches_denylist(&normalized) {
            return true;
        }

        if self.is_profile_root(&normalized) {
            return true;
        }

        if is_under(&normalized, &self.os_root) {
            return !self
                .os_allowed
                .iter()
                .any(|allowed| is_under(&normalized, allowed));
        }

        if is_under(&normalized, &self.program_data_root) {
            return !self
                .program_data_allowed
                .iter()
                .any(|allowed| is_under(&normalized, allowed));
        }

        false
    }

    fn matches_denylist(&self, normalized: &str) -> bool {
        SYSTEM_LOCATIONS
            .iter()
            .chain(SYSTEM_FILES)
            .any(|token| normalized.contains(token))
            || self
                .extra_exclusions
                .iter()
                .any(|token| normalized.contains(token.as_str()))
    }

    /// `<users_root>/<name>` with nothing below it.
    fn is_profile_root(&self, normalized: &str) -> bool {
        normalized
            .strip_prefix(self.users_root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|rest| !rest.is_empty() && !rest.contains('/'))
            .unwrap_or(false)
    }
}

/// Lower-case, forward slashes, no trailing separator.
fn normalize(path: &str) -> String {
    path.trim()
        .replace('\\', "/")
        .to_lowercase()
        .trim_end_matches('/')
        .to_string()
}

fn is_under(path: &str, root: &str) -> bool {
    if root.is_empty() {
        return false;
    }
    path == root
        || path
            .strip_prefix(root)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
}

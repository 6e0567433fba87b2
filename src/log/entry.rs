use serde::Serialize;

/// One build action record from the log.
///
/// Timestamps are absolute seconds since the Unix epoch. Two entries are the
/// same build action iff their `hash` (the command fingerprint) matches.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub start: f64,
    pub end: f64,
    pub target: String,
    pub hash: String,
}

impl LogEntry {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl PartialEq for LogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for LogEntry {}

impl std::hash::Hash for LogEntry {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

/// A loaded log: entries in file order, deduplicated by fingerprint.
#[derive(Debug, Clone, Default)]
pub struct LogFile {
    pub version: u32,
    pub entries: Vec<LogEntry>,
}

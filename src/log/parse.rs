use crate::error::{LoadError, LogError};
use crate::log::entry::{LogEntry, LogFile};
use crate::log::lines::LineReader;

use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};

/// First line of every ninja log. The capture is the format version.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"# ninja log v(\d+)").expect("header regex is valid"));

/// Record formats this parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogVersion {
    V6,
}

/// Header version number -> record format. Add new formats here.
const VERSIONS: &[(u32, LogVersion)] = &[(6, LogVersion::V6)];

impl LogVersion {
    pub fn from_number(version: u32) -> Option<Self> {
        VERSIONS
            .iter()
            .find(|(n, _)| *n == version)
            .map(|(_, v)| *v)
    }

    fn parse_record(self, line: &str, base_time: f64) -> Option<LogEntry> {
        match self {
            Self::V6 => parse_v6_record(line, base_time),
        }
    }
}

/// Load a ninja log from disk.
///
/// Record offsets are anchored at the file's modification time, which the log
/// itself does not store.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<LogFile, LoadError> {
    let path = path.as_ref();
    let base_time = modification_time(path).map_err(|e| LoadError::new(path, e))?;
    let lines = LineReader::open(path).map_err(|e| LoadError::new(path, e))?;
    let file = parse(lines, base_time).map_err(|e| LoadError::new(path, e))?;
    info!(
        version = file.version,
        entries = file.entries.len(),
        "loaded ninja log"
    );
    Ok(file)
}

fn modification_time(path: &Path) -> io::Result<f64> {
    let modified = fs::metadata(path)?.modified()?;
    let since_epoch = modified
        .duration_since(UNIX_EPOCH)
        .map_err(io::Error::other)?;
    Ok(since_epoch.as_secs_f64())
}

/// Parse a header line plus records into a deduplicated [`LogFile`].
///
/// Only the header is fatal. Blank lines, `#` comments and malformed records
/// are skipped. When several records share a fingerprint the first one in
/// file order is kept.
pub fn parse<I>(lines: I, base_time: f64) -> Result<LogFile, LogError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut lines = lines.into_iter();

    let header = lines.next().ok_or(LogError::MissingHeader)??;
    let number = parse_header(&header)?;
    let version = LogVersion::from_number(number).ok_or(LogError::UnsupportedVersion(number))?;

    let mut candidates = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match version.parse_record(&line, base_time) {
            Some(entry) => candidates.push(entry),
            // +2: one-based, and the header was line 1.
            None => debug!(line = idx + 2, record = %line, "dropping malformed record"),
        }
    }

    let total = candidates.len();
    let entries = dedup_first_wins(candidates);
    if entries.len() < total {
        debug!(dropped = total - entries.len(), "dropped superseded duplicate records");
    }

    Ok(LogFile {
        version: number,
        entries,
    })
}

fn parse_header(line: &str) -> Result<u32, LogError> {
    HEADER_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| LogError::MalformedHeader(line.to_string()))
}

fn dedup_first_wins(candidates: Vec<LogEntry>) -> Vec<LogEntry> {
    let mut kept: HashSet<String> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|entry| kept.insert(entry.hash.clone()))
        .collect()
}

/// `start_ms \t end_ms \t restat_mtime_ms \t target \t hash`
///
/// The restat field is only counted, never read. Empty fields do not count,
/// so a record with a blank column is malformed.
fn parse_v6_record(line: &str, base_time: f64) -> Option<LogEntry> {
    let fields: Vec<&str> = line.split('\t').filter(|f| !f.is_empty()).collect();
    let [start, end, _restat, target, hash] = fields.as_slice() else {
        return None;
    };

    let start = parse_offset(start)?;
    let end = parse_offset(end)?;
    if end < start {
        warn!(output = %target, start, end, "dropping record that ends before it starts");
        return None;
    }

    Some(LogEntry {
        start: start / 1000.0 + base_time,
        end: end / 1000.0 + base_time,
        target: target.to_string(),
        hash: hash.to_string(),
    })
}

fn parse_offset(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

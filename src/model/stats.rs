//! Build-wide statistics over a set of timed log entries.
//!
//! All durations and timestamps are seconds as `f64`.

use crate::log::LogEntry;
use serde::Serialize;

/// Size of each outlier list.
const OUTLIER_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetTime {
    pub target: String,
    pub duration: f64,
}

/// Distribution of per-entry durations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DurationStats {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    /// Element at `count / 2` of the sorted durations, no interpolation.
    pub median: f64,
    /// Element at `min(floor(count * 0.95), count - 1)`.
    pub p95: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outliers {
    /// Fastest first.
    pub fastest: Vec<TargetTime>,
    /// Slowest first.
    pub slowest: Vec<TargetTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Parallelism {
    /// Peak number of simultaneously running entries.
    pub cores: usize,
    /// `cpu / wall`, or 0 when wall time is zero.
    pub efficiency: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeTotals {
    /// Sum of all durations.
    pub cpu: f64,
    /// Latest end minus earliest start.
    pub wall: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionWindow {
    pub start: f64,
    pub end: f64,
}

/// Immutable snapshot computed once per load. `Default` is the empty-input
/// value: zeros everywhere and no outliers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildStatistics {
    pub target_count: usize,
    pub durations: DurationStats,
    pub outliers: Outliers,
    pub parallelism: Parallelism,
    pub time: TimeTotals,
    pub execution: ExecutionWindow,
}

/// At equal timestamps `End` sorts first, so back-to-back entries do not
/// count as overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    End,
    Start,
}

struct Event {
    time: f64,
    kind: EventKind,
}

impl BuildStatistics {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn compute(entries: &[LogEntry]) -> Self {
        if entries.is_empty() {
            return Self::zero();
        }
        let count = entries.len();

        let mut durations = Vec::with_capacity(count);
        let mut targets = Vec::with_capacity(count);
        let mut events = Vec::with_capacity(count * 2);

        let mut first_start = f64::INFINITY;
        let mut last_end = f64::NEG_INFINITY;
        let mut cpu = 0.0;

        for entry in entries {
            let duration = entry.duration();
            durations.push(duration);
            targets.push(TargetTime {
                target: entry.target.clone(),
                duration,
            });
            events.push(Event {
                time: entry.start,
                kind: EventKind::Start,
            });
            events.push(Event {
                time: entry.end,
                kind: EventKind::End,
            });

            cpu += duration;
            first_start = first_start.min(entry.start);
            last_end = last_end.max(entry.end);
        }

        let wall = last_end - first_start;
        let average = cpu / count as f64;
        let efficiency = if wall == 0.0 { 0.0 } else { cpu / wall };

        let variance = durations
            .iter()
            .map(|d| (d - average) * (d - average))
            .sum::<f64>()
            / count as f64;

        durations.sort_by(f64::total_cmp);
        // Stable, so equal durations keep their input order.
        targets.sort_by(|a, b| b.duration.total_cmp(&a.duration));

        let slowest = targets.iter().take(OUTLIER_COUNT).cloned().collect();
        let fastest = targets.iter().rev().take(OUTLIER_COUNT).cloned().collect();

        Self {
            target_count: count,
            durations: DurationStats {
                min: durations[0],
                max: durations[count - 1],
                average,
                median: durations[count / 2],
                p95: durations[percentile_index(count, 0.95)],
                std_dev: variance.sqrt(),
            },
            outliers: Outliers { fastest, slowest },
            parallelism: Parallelism {
                cores: peak_concurrency(events),
                efficiency,
            },
            time: TimeTotals { cpu, wall },
            execution: ExecutionWindow {
                start: first_start,
                end: last_end,
            },
        }
    }
}

/// Nearest-rank style index with no interpolation. `count` must be non-zero.
fn percentile_index(count: usize, fraction: f64) -> usize {
    ((count as f64 * fraction) as usize).min(count - 1)
}

/// Sweep-line over start/end events; returns the highest running count.
fn peak_concurrency(mut events: Vec<Event>) -> usize {
    events.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.kind.cmp(&b.kind)));

    let mut current: i64 = 0;
    let mut peak: i64 = 0;
    for event in &events {
        match event.kind {
            EventKind::Start => current += 1,
            EventKind::End => current -= 1,
        }
        peak = peak.max(current);
    }
    peak as usize
}

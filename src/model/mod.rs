//! Aggregation model: build statistics, lane layout, and the combined view
//! embedded into the HTML timeline.

pub mod lanes;
pub mod stats;

pub use lanes::{BuildLane, LaneLayout, layout};
pub use stats::BuildStatistics;

use serde::Serialize;
use std::path::Path;

/// Number of slowest targets listed in the bottleneck table.
const BOTTLENECKS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub id: usize,
    /// Full target path, shown on hover.
    pub title: String,
    /// File name only, drawn inside the bar.
    pub content: String,
    pub group: usize,
    pub start_ms: f64,
    pub end_ms: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BottleneckView {
    pub rank: usize,
    pub target: String,
    pub full_target: String,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub targets: usize,
    pub wall_time: f64,
    pub cpu_time: f64,
    pub average_time: f64,
    pub cores: usize,
    pub efficiency: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub summary: SummaryView,
    pub lanes: Vec<BuildLane>,
    pub tasks: Vec<TaskView>,
    pub bottlenecks: Vec<BottleneckView>,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Combine statistics and lane layout into the timeline payload.
/// Timestamps are scaled to milliseconds for the chart.
pub fn build_report_data(stats: &BuildStatistics, layout: &LaneLayout) -> ReportData {
    let tasks = layout
        .tasks
        .iter()
        .map(|task| TaskView {
            id: task.id,
            title: task.target.clone(),
            content: file_name(&task.target),
            group: task.lane,
            start_ms: task.start * 1000.0,
            end_ms: task.end * 1000.0,
            duration: task.end - task.start,
        })
        .collect();

    let bottlenecks = stats
        .outliers
        .slowest
        .iter()
        .take(BOTTLENECKS)
        .enumerate()
        .map(|(idx, slow)| BottleneckView {
            rank: idx + 1,
            target: file_name(&slow.target),
            full_target: slow.target.clone(),
            duration: slow.duration,
        })
        .collect();

    ReportData {
        summary: SummaryView {
            targets: stats.target_count,
            wall_time: stats.time.wall,
            cpu_time: stats.time.cpu,
            average_time: stats.durations.average,
            cores: stats.parallelism.cores,
            efficiency: stats.parallelism.efficiency,
        },
        lanes: layout.lanes.clone(),
        tasks,
        bottlenecks,
        min_ms: stats.execution.start * 1000.0,
        max_ms: stats.execution.end * 1000.0,
    }
}

fn file_name(target: &str) -> String {
    Path::new(target)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogEntry;
    use pretty_assertions::assert_eq;

    fn entry(target: &str, start: f64, end: f64) -> LogEntry {
        LogEntry {
            start,
            end,
            target: target.into(),
            hash: format!("hash-{target}"),
        }
    }

    #[test]
    fn report_scales_to_milliseconds() {
        let entries = [
            entry("obj/src/a.o", 10.0, 12.0),
            entry("obj/src/b.o", 11.0, 11.5),
        ];
        let stats = BuildStatistics::compute(&entries);
        let data = build_report_data(&stats, &layout(&entries));

        assert_eq!(data.min_ms, 10_000.0);
        assert_eq!(data.max_ms, 12_000.0);
        assert_eq!(data.lanes.len(), 2);
        assert_eq!(data.tasks[1].content, "b.o");
        assert_eq!(data.tasks[1].title, "obj/src/b.o");
        assert_eq!(data.tasks[1].group, 1);
        assert_eq!(data.tasks[1].start_ms, 11_000.0);
        assert_eq!(data.tasks[1].end_ms, 11_500.0);
        assert_eq!(data.summary.cores, 2);
    }

    #[test]
    fn bottlenecks_are_ranked_slowest_first() {
        let entries = [entry("fast", 0.0, 1.0), entry("dir/slow", 0.0, 9.0)];
        let stats = BuildStatistics::compute(&entries);
        let data = build_report_data(&stats, &layout(&entries));

        let ranked: Vec<(usize, &str, &str)> = data
            .bottlenecks
            .iter()
            .map(|b| (b.rank, b.target.as_str(), b.full_target.as_str()))
            .collect();
        assert_eq!(ranked, vec![(1, "slow", "dir/slow"), (2, "fast", "fast")]);
    }

    #[test]
    fn file_name_falls_back_to_target() {
        assert_eq!(file_name("a/b/c.o"), "c.o");
        assert_eq!(file_name(".."), "..");
    }
}

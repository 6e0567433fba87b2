//! Text summaries of [`BuildStatistics`].

use super::format_duration;
use crate::model::BuildStatistics;
use crate::model::stats::TargetTime;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatisticsFormat {
    /// Full distribution, outliers and parallelism analysis
    #[default]
    Detailed,
    /// Four-line overview
    Brief,
}

impl StatisticsFormat {
    pub fn render(self, stats: &BuildStatistics) -> String {
        match self {
            Self::Detailed => render_detailed(stats),
            Self::Brief => render_brief(stats),
        }
    }
}

fn render_detailed(stats: &BuildStatistics) -> String {
    let d = &stats.durations;
    let mut lines = vec![
        "Build Statistics Summary:".to_string(),
        "=========================".to_string(),
        format!("Total targets:       {}", stats.target_count),
        format!("Average build time:  {}", format_duration(d.average)),
        format!("Median build time:   {}", format_duration(d.median)),
        format!("Standard deviation:  {}", format_duration(d.std_dev)),
        format!("95th percentile:     {}", format_duration(d.p95)),
        format!("Minimum build time:  {}", format_duration(d.min)),
        format!("Maximum build time:  {}", format_duration(d.max)),
        format!("CPU time:            {}", format_duration(stats.time.cpu)),
        format!("Wall time:           {}", format_duration(stats.time.wall)),
        String::new(),
        "Slowest targets:".to_string(),
    ];
    lines.extend(stats.outliers.slowest.iter().map(target_line));
    lines.push(String::new());
    lines.push("Fastest targets:".to_string());
    lines.extend(stats.outliers.fastest.iter().map(target_line));
    lines.extend([
        String::new(),
        "Parallelization Analysis:".to_string(),
        "=========================".to_string(),
        format!("Estimated cores used: {}", stats.parallelism.cores),
        format!(
            "Parallelization efficiency: {}",
            percent(stats.parallelism.efficiency)
        ),
    ]);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_brief(stats: &BuildStatistics) -> String {
    format!(
        "Build Overview:\n\
         - {} targets built\n\
         - Total time: {}\n\
         - Average: {}\n\
         - Slowest: {}\n",
        stats.target_count,
        format_duration(stats.time.wall),
        format_duration(stats.durations.average),
        format_duration(stats.durations.max),
    )
}

fn target_line(t: &TargetTime) -> String {
    format!("  {} ({})", t.target, format_duration(t.duration))
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

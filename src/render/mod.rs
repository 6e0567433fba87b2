//! Output layers over the model: entry listings, statistics summaries and the
//! HTML timeline.

pub mod entries;
pub mod html;
pub mod summary;

pub use entries::OutputFormat;
pub use html::render_html_report;
pub use summary::StatisticsFormat;

use std::time::Duration;

/// Human-readable duration at millisecond resolution, e.g. `1m 3s 250ms`.
pub fn format_duration(seconds: f64) -> String {
    let millis = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    humantime::format_duration(Duration::from_millis(millis)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_round_to_millis() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(1.5), "1s 500ms");
        assert_eq!(format_duration(63.2504), "1m 3s 250ms");
        assert_eq!(format_duration(3600.0), "1h");
    }

    #[test]
    fn nonsense_durations_clamp_to_zero() {
        assert_eq!(format_duration(-2.0), "0s");
        assert_eq!(format_duration(f64::NAN), "0s");
    }
}

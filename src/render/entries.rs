//! Listings of raw log entries.

use super::format_duration;
use crate::log::LogEntry;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `target (duration)` per line
    #[default]
    Console,
    /// Pretty-printed array of objects with sorted keys
    Json,
    /// Comma-separated with a header row
    Csv,
}

const CSV_HEADER: [&str; 5] = ["target", "start", "end", "duration (ms)", "hash"];

impl OutputFormat {
    pub fn render(self, entries: &[LogEntry]) -> anyhow::Result<String> {
        Ok(match self {
            Self::Console => render_console(entries),
            Self::Json => render_json(entries)?,
            Self::Csv => render_csv(entries)?,
        })
    }
}

fn render_console(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} ({})\n", e.target, format_duration(e.duration())))
        .collect()
}

fn render_json(entries: &[LogEntry]) -> serde_json::Result<String> {
    // Going through `Value` sorts object keys.
    let value = serde_json::to_value(entries)?;
    let mut out = serde_json::to_string_pretty(&value)?;
    out.push('\n');
    Ok(out)
}

fn render_csv(entries: &[LogEntry]) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for e in entries {
        writer.write_record([
            e.target.clone(),
            e.start.to_string(),
            e.end.to_string(),
            ((e.duration() * 1000.0).round() as i64).to_string(),
            e.hash.clone(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries() -> Vec<LogEntry> {
        vec![
            LogEntry {
                start: 100.0,
                end: 101.5,
                target: "obj/a.o".into(),
                hash: "aa".into(),
            },
            LogEntry {
                start: 100.25,
                end: 100.5,
                target: "weird,\"name\"".into(),
                hash: "bb".into(),
            },
        ]
    }

    #[test]
    fn console_listing() {
        let out = OutputFormat::Console.render(&entries()).unwrap();
        assert_eq!(out, "obj/a.o (1s 500ms)\nweird,\"name\" (250ms)\n");
    }

    #[test]
    fn csv_quotes_special_fields() {
        let out = OutputFormat::Csv.render(&entries()).unwrap();
        assert_eq!(
            out,
            "target,start,end,duration (ms),hash\n\
             obj/a.o,100,101.5,1500,aa\n\
             \"weird,\"\"name\"\"\",100.25,100.5,250,bb\n"
        );
    }

    #[test]
    fn csv_quotes_embedded_newlines() {
        let entry = LogEntry {
            start: 1.0,
            end: 2.0,
            target: "two\nlines".into(),
            hash: "cc".into(),
        };
        let out = OutputFormat::Csv.render(&[entry]).unwrap();
        assert_eq!(
            out,
            "target,start,end,duration (ms),hash\n\"two\nlines\",1,2,1000,cc\n"
        );
    }

    #[test]
    fn json_has_sorted_keys() {
        let out = OutputFormat::Json.render(&entries()[..1]).unwrap();
        assert_eq!(
            out,
            "[\n  {\n    \"end\": 101.5,\n    \"hash\": \"aa\",\n    \"start\": 100.0,\n    \"target\": \"obj/a.o\"\n  }\n]\n"
        );
    }

    #[test]
    fn empty_listings() {
        assert_eq!(OutputFormat::Console.render(&[]).unwrap(), "");
        assert_eq!(OutputFormat::Json.render(&[]).unwrap(), "[]\n");
        assert_eq!(
            OutputFormat::Csv.render(&[]).unwrap(),
            "target,start,end,duration (ms),hash\n"
        );
    }
}

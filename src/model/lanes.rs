//! Gantt lane assignment.
//!
//! Overlapping entries get different lanes; a lane freed by a finished entry
//! is handed to the next one that starts, lowest index first. The resulting
//! lane count equals the peak overlap.

use crate::log::LogEntry;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildTask {
    /// Index of the entry in the input slice.
    pub id: usize,
    pub target: String,
    pub lane: usize,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildLane {
    pub id: usize,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaneLayout {
    /// In input order.
    pub tasks: Vec<BuildTask>,
    /// Dense, numbered from 0.
    pub lanes: Vec<BuildLane>,
}

/// At equal timestamps `Start` sorts first: an entry starting exactly when
/// another ends takes a fresh lane instead of inheriting the freed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Start,
    End,
}

struct Event {
    id: usize,
    time: f64,
    kind: EventKind,
}

/// Assign every entry a lane.
///
/// # Panics
///
/// If an end event is seen for an entry that never started. Events are
/// built in pairs here, so that means the ordering itself is broken.
pub fn layout(entries: &[LogEntry]) -> LaneLayout {
    let mut events = Vec::with_capacity(entries.len() * 2);
    for (id, entry) in entries.iter().enumerate() {
        events.push(Event {
            id,
            time: entry.start,
            kind: EventKind::Start,
        });
        events.push(Event {
            id,
            time: entry.end,
            kind: EventKind::End,
        });
    }
    events.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.kind.cmp(&b.kind)));

    let mut free: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    let mut allocated = 0usize;
    // entry id -> (lane, start)
    let mut active: HashMap<usize, (usize, f64)> = HashMap::with_capacity(entries.len());
    let mut tasks = Vec::with_capacity(entries.len());

    for event in events {
        match event.kind {
            EventKind::Start => {
                let lane = match free.pop() {
                    Some(Reverse(lane)) => lane,
                    None => {
                        allocated += 1;
                        allocated - 1
                    }
                };
                active.insert(event.id, (lane, event.time));
            }
            EventKind::End => {
                let (lane, start) = active
                    .remove(&event.id)
                    .unwrap_or_else(|| panic!("task {} ended without starting", event.id));
                free.push(Reverse(lane));
                tasks.push(BuildTask {
                    id: event.id,
                    target: entries[event.id].target.clone(),
                    lane,
                    start,
                    end: event.time,
                });
            }
        }
    }

    tasks.sort_by_key(|task| task.id);
    let lanes = (0..allocated)
        .map(|id| BuildLane {
            id,
            label: format!("Lane {}", id + 1),
        })
        .collect();

    LaneLayout { tasks, lanes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(target: &str, start: f64, end: f64) -> LogEntry {
        LogEntry {
            start,
            end,
            target: target.into(),
            hash: format!("hash-{target}"),
        }
    }

    fn lanes_of(layout: &LaneLayout) -> Vec<usize> {
        layout.tasks.iter().map(|t| t.lane).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(layout(&[]), LaneLayout::default());
    }

    #[test]
    fn sequential_intervals_share_a_lane() {
        let result = layout(&[entry("a", 0.0, 5.0), entry("b", 6.0, 10.0)]);
        assert_eq!(lanes_of(&result), vec![0, 0]);
        assert_eq!(result.lanes.len(), 1);
    }

    #[test]
    fn touching_intervals_take_a_fresh_lane() {
        let result = layout(&[entry("a", 0.0, 5.0), entry("b", 5.0, 10.0)]);
        assert_eq!(lanes_of(&result), vec![0, 1]);
        assert_eq!(result.lanes.len(), 2);
    }

    #[test]
    fn overlapping_intervals_get_distinct_lanes() {
        let result = layout(&[entry("a", 0.0, 10.0), entry("b", 3.0, 8.0)]);
        assert_eq!(lanes_of(&result), vec![0, 1]);
        assert_eq!(
            result.lanes,
            vec![
                BuildLane {
                    id: 0,
                    label: "Lane 1".into()
                },
                BuildLane {
                    id: 1,
                    label: "Lane 2".into()
                },
            ]
        );
    }

    #[test]
    fn lowest_free_lane_is_reused_first() {
        // a:0, b:1, c:2 all overlap; a and b finish, d takes lane 0.
        let result = layout(&[
            entry("a", 0.0, 4.0),
            entry("b", 1.0, 3.0),
            entry("c", 2.0, 10.0),
            entry("d", 5.0, 6.0),
            entry("e", 5.5, 7.0),
        ]);
        assert_eq!(lanes_of(&result), vec![0, 1, 2, 0, 1]);
        assert_eq!(result.lanes.len(), 3);
    }

    #[test]
    fn tasks_come_back_in_input_order() {
        let result = layout(&[entry("late", 10.0, 20.0), entry("early", 0.0, 30.0)]);
        let ids: Vec<usize> = result.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(result.tasks[0].target, "late");
        assert_eq!(lanes_of(&result), vec![1, 0]);
        assert_eq!(result.tasks[1].start, 0.0);
        assert_eq!(result.tasks[1].end, 30.0);
    }

    #[test]
    fn zero_length_entry_occupies_a_lane() {
        let result = layout(&[entry("a", 1.0, 1.0)]);
        assert_eq!(lanes_of(&result), vec![0]);
        assert_eq!(result.lanes.len(), 1);
    }
}

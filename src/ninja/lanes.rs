//! Greedy reconstruction of parallel execution lanes.
//!
//! The log records when each task ran but not which worker ran it. Laying the
//! intervals out on lanes where no two assigned intervals overlap gives the
//! trace viewer a plausible worker/CPU swimlane per task.

use super::parse::LogEntry;

/// Assign each entry to the lowest-numbered lane that is free at its begin
/// time, allocating a new lane when none is. Input must be sorted by
/// `begin_ms`; the result is index-aligned with `entries`.
///
/// A lane is free once its previous task's end is at or before the candidate's
/// begin, so back-to-back tasks (end == next begin) share a lane. Entries with
/// equal begin times land on adjacent lanes in whatever order the sort left
/// them; which simultaneous task gets the lower lane is an approximation, not
/// a claim about the real scheduler's decisions.
pub fn assign_lanes(entries: &[LogEntry]) -> Vec<usize> {
    // end_ms of the most recently assigned task on each lane
    let mut lanes: Vec<i64> = Vec::new();

    entries
        .iter()
        .map(|entry| {
            match lanes.iter().position(|&end| end <= entry.begin_ms) {
                Some(lane) => {
                    lanes[lane] = entry.end_ms;
                    lane
                }
                None => {
                    lanes.push(entry.end_ms);
                    lanes.len() - 1
                }
            }
        })
        .collect()
}

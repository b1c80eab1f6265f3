//! Overlap layout engine
//!
//! Assigns each leave request a vertical display slot so that requests
//! sharing a calendar day never land in the same row. Greedy first-fit
//! over intervals sorted by start date is optimal for interval graphs:
//! the number of slots used equals the largest number of requests
//! overlapping on any single day.
//!
//! The assignment is a pure function of the input set, so re-renders
//! over the same requests always produce the same rows.

use crate::database::models::TimeOffRequest;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Slot assignments keyed by request id.
pub type SlotMap = HashMap<String, usize>;

/// Assign a slot to every request in the set.
///
/// Sort order: start date ascending, longer requests first, input
/// order as the final tie-break (the sort is stable); each request
/// then takes the smallest slot unused by any overlapping request
/// already placed.
pub fn assign_slots(requests: &[TimeOffRequest]) -> SlotMap {
    let mut ordered: Vec<&TimeOffRequest> = requests.iter().collect();
    ordered.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| duration_days(b).cmp(&duration_days(a)))
    });

    let mut placed: Vec<(&TimeOffRequest, usize)> = Vec::with_capacity(ordered.len());
    let mut slots = SlotMap::with_capacity(ordered.len());

    for request in ordered {
        let mut slot = 0;
        loop {
            let taken = placed.iter().any(|(other, occupied)| {
                *occupied == slot && other.overlaps(request.start_date, request.end_date)
            });
            if !taken {
                break;
            }
            slot += 1;
        }

        placed.push((request, slot));
        slots.insert(request.id.clone(), slot);
    }

    slots
}

/// Filter to one user's requests, then lay them out. Requests of other
/// users never reach the packing step.
pub fn assign_slots_for_user(requests: &[TimeOffRequest], user_id: &str) -> SlotMap {
    let mine: Vec<TimeOffRequest> = requests
        .iter()
        .filter(|request| request.user_id == user_id)
        .cloned()
        .collect();
    assign_slots(&mine)
}

/// Total number of display rows the assignment needs.
pub fn slot_count(slots: &SlotMap) -> usize {
    slots.values().map(|slot| slot + 1).max().unwrap_or(0)
}

/// The requests covering one calendar day, in input order.
pub fn requests_on_day<'a>(
    requests: &'a [TimeOffRequest],
    day: NaiveDate,
) -> Vec<&'a TimeOffRequest> {
    requests
        .iter()
        .filter(|request| request.covers(day))
        .collect()
}

/// Render rows for one day: index `i` holds the request drawn in slot
/// `i`, or `None` for a blank placeholder keeping bars vertically
/// aligned across days.
pub fn day_rows<'a>(
    requests: &'a [TimeOffRequest],
    slots: &SlotMap,
    day: NaiveDate,
) -> Vec<Option<&'a TimeOffRequest>> {
    let mut rows: Vec<Option<&TimeOffRequest>> = vec![None; slot_count(slots)];
    for request in requests_on_day(requests, day) {
        if let Some(&slot) = slots.get(&request.id) {
            rows[slot] = Some(request);
        }
    }
    rows
}

fn duration_days(request: &TimeOffRequest) -> i64 {
    (request.end_date - request.start_date).num_days()
}

//! Intra-day visit ordering and neighborhood-switch counting.

use crate::traits::Visit;

/// Order one caregiver's visits for a single day to keep neighborhood changes low.
///
/// Starts from the earliest visit, then repeatedly takes the earliest
/// follow-up in the same neighborhood that starts at or after the current
/// visit ends. Without one, the earliest time-compatible visit anywhere; if
/// every remaining visit conflicts, the earliest remaining visit. Ties go to
/// input order.
pub fn order_day<'a, V: Visit>(visits: &[&'a V]) -> Vec<&'a V> {
    let mut remaining: Vec<&'a V> = visits.to_vec();
    let mut ordered = Vec::with_capacity(remaining.len());

    let Some(first) = earliest(&remaining, |_| true) else {
        return ordered;
    };
    let mut current = remaining.remove(first);
    ordered.push(current);

    while !remaining.is_empty() {
        let free_after = current.end();
        let next = earliest(&remaining, |v| {
            v.neighborhood() == current.neighborhood() && v.start() >= free_after
        })
        .or_else(|| earliest(&remaining, |v| v.start() >= free_after))
        .or_else(|| earliest(&remaining, |_| true));

        // `remaining` is non-empty, so the last fallback always matches.
        let Some(index) = next else {
            break;
        };
        current = remaining.remove(index);
        ordered.push(current);
    }

    ordered
}

/// Adjacent-pair neighborhood changes along `ordered`.
pub fn switch_count<V: Visit>(ordered: &[&V]) -> usize {
    ordered
        .windows(2)
        .filter(|pair| pair[0].neighborhood() != pair[1].neighborhood())
        .count()
}

/// Switches incurred by one day's visits taken in start order.
pub fn day_switches<V: Visit>(visits: &[&V]) -> usize {
    if visits.len() < 2 {
        return 0;
    }
    let mut chronological = visits.to_vec();
    chronological.sort_by_key(|visit| visit.start());
    switch_count(&chronological)
}

/// Index of the earliest-starting visit matching `keep`; first wins on ties.
fn earliest<V: Visit>(visits: &[&V], keep: impl Fn(&V) -> bool) -> Option<usize> {
    visits
        .iter()
        .enumerate()
        .filter(|(_, visit)| keep(**visit))
        .min_by_key(|(_, visit)| visit.start())
        .map(|(index, _)| index)
}

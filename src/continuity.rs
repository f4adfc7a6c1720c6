//! Continuity-of-care scoring for finished schedules.
//!
//! Read-only benchmarks; the solver never consults them.

use std::collections::{HashMap, HashSet};

use crate::solver::Assignment;
use crate::traits::{Id, Visit};

/// Best achievable continuity: every customer served by a single caregiver.
///
/// Per customer with `n` visits the ideal is `1.0` for `n == 1`, else
/// `1 - 1/n`. Returns the unweighted mean over customers, or `1.0` when
/// there are no visits.
pub fn max_continuity_score<V: Visit>(visits: &[V]) -> f64 {
    let counts = visits_per_customer(visits);
    mean(counts.iter().map(|&(_, n)| per_customer(n, 1)))
}

/// Continuity actually achieved by `assignments`.
///
/// Same formula as [`max_continuity_score`] with the number of distinct
/// caregivers in place of `1`. A customer with no assigned visit scores `0.0`.
pub fn continuity_score<V, CaregiverId>(
    visits: &[V],
    assignments: &[Assignment<V::Id, CaregiverId>],
) -> f64
where
    V: Visit,
    CaregiverId: Id,
{
    let served_by: HashMap<&V::Id, &CaregiverId> = assignments
        .iter()
        .map(|a| (&a.visit_id, &a.caregiver_id))
        .collect();

    let mut caregivers: HashMap<&V::CustomerId, HashSet<&CaregiverId>> = HashMap::new();
    for visit in visits {
        let seen = caregivers.entry(visit.customer()).or_default();
        if let Some(caregiver) = served_by.get(visit.id()) {
            seen.insert(*caregiver);
        }
    }

    let counts = visits_per_customer(visits);
    mean(counts.iter().map(|(customer, n)| {
        let distinct = caregivers.get(customer).map_or(0, HashSet::len);
        if distinct == 0 {
            0.0
        } else {
            per_customer(*n, distinct)
        }
    }))
}

fn per_customer(visits: usize, caregivers: usize) -> f64 {
    if visits == 1 {
        1.0
    } else {
        1.0 - caregivers as f64 / visits as f64
    }
}

/// Visit counts per customer, in order of first appearance.
fn visits_per_customer<V: Visit>(visits: &[V]) -> Vec<(&V::CustomerId, usize)> {
    let mut index: HashMap<&V::CustomerId, usize> = HashMap::new();
    let mut counts: Vec<(&V::CustomerId, usize)> = Vec::new();
    for visit in visits {
        let customer = visit.customer();
        match index.get(customer) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(customer, counts.len());
                counts.push((customer, 1));
            }
        }
    }
    counts
}

fn mean(scores: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = scores.fold((0.0, 0usize), |(sum, n), score| (sum + score, n + 1));
    if n == 0 { 1.0 } else { sum / n as f64 }
}

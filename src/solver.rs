//! Greedy caregiver assignment.
//!
//! Visits are grouped by customer in input order. Each customer's visits are
//! first offered as one block to a single caregiver; if nobody can take the
//! whole block, every visit is placed on its own. Decisions are never
//! revisited once committed.
//!
//! Cost is roughly `customers x caregivers x visits_per_customer` for block
//! simulation plus `unassigned_visits x caregivers` for the fallback.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::Weekday;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

use crate::eligibility::check;
use crate::ledger::{CaregiverBook, Ledger};
use crate::route::{day_switches, order_day};
use crate::traits::{Caregiver, Visit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Reject malformed visits and caregivers before solving.
    pub validate_input: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            validate_input: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment<VisitId, CaregiverId> {
    pub visit_id: VisitId,
    pub caregiver_id: CaregiverId,
}

/// Input rejected at the solve boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    InvalidVisitWindow { visit: String },
    DuplicateVisit { visit: String },
    InvalidMaxHours { caregiver: String, max_hours: f64 },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::InvalidVisitWindow { visit } => {
                write!(f, "visit {} must end after it starts", visit)
            }
            SolveError::DuplicateVisit { visit } => {
                write!(f, "visit {} appears more than once", visit)
            }
            SolveError::InvalidMaxHours {
                caregiver,
                max_hours,
            } => write!(
                f,
                "caregiver {} has invalid max hours {}",
                caregiver, max_hours
            ),
        }
    }
}

impl std::error::Error for SolveError {}

/// Assign visits to caregivers with default options.
///
/// Input order matters: customers are processed in order of first
/// appearance and ties between caregivers go to the earlier one.
pub fn solve<V, C>(
    visits: &[V],
    caregivers: &[C],
) -> Result<Vec<Assignment<V::Id, C::Id>>, SolveError>
where
    V: Visit,
    C: Caregiver,
{
    solve_with_options(visits, caregivers, &SolveOptions::default())
}

pub fn solve_with_options<V, C>(
    visits: &[V],
    caregivers: &[C],
    options: &SolveOptions,
) -> Result<Vec<Assignment<V::Id, C::Id>>, SolveError>
where
    V: Visit,
    C: Caregiver,
{
    run(visits, caregivers, options, Planner::block_scores)
}

/// Like [`solve_with_options`], but simulates each customer block across
/// caregivers on the rayon pool. Output is identical to the sequential path.
pub fn solve_parallel<V, C>(
    visits: &[V],
    caregivers: &[C],
    options: &SolveOptions,
) -> Result<Vec<Assignment<V::Id, C::Id>>, SolveError>
where
    V: Visit + Sync,
    C: Caregiver + Sync,
{
    run(visits, caregivers, options, Planner::block_scores_parallel)
}

fn run<'a, V, C>(
    visits: &'a [V],
    caregivers: &'a [C],
    options: &SolveOptions,
    scan: impl Fn(&Planner<'a, V, C>, &[&'a V]) -> Vec<Option<BlockScore>>,
) -> Result<Vec<Assignment<V::Id, C::Id>>, SolveError>
where
    V: Visit,
    C: Caregiver,
{
    let _span = debug_span!(
        "solve",
        visits = visits.len(),
        caregivers = caregivers.len()
    )
    .entered();

    if options.validate_input {
        validate(visits, caregivers)?;
    }

    let mut planner = Planner {
        caregivers,
        ledger: Ledger::new(caregivers.len()),
        booked: Vec::with_capacity(visits.len()),
    };

    for block in group_by_customer(visits) {
        let scores = scan(&planner, block.as_slice());
        if let Some(caregiver) = planner.best_for_block(&block, scores) {
            planner.commit_block(&block, caregiver);
            continue;
        }
        debug!(
            customer = ?block[0].customer(),
            "no caregiver can take every visit; placing individually"
        );
        for visit in block {
            if let Some(caregiver) = planner.best_for_visit(visit) {
                planner.assign(visit, caregiver);
            } else {
                debug!(visit = ?visit.id(), "no eligible caregiver");
            }
        }
    }

    debug!(
        assigned = planner.booked.len(),
        unassigned = visits.len() - planner.booked.len(),
        "solve finished"
    );

    Ok(planner.into_assignments())
}

/// Ids of visits absent from `assignments`, in input order.
pub fn unassigned_visits<'a, V, CaregiverId>(
    visits: &'a [V],
    assignments: &[Assignment<V::Id, CaregiverId>],
) -> Vec<&'a V::Id>
where
    V: Visit,
{
    let assigned: HashSet<&V::Id> = assignments.iter().map(|a| &a.visit_id).collect();
    visits
        .iter()
        .map(|visit| visit.id())
        .filter(|id| !assigned.contains(id))
        .collect()
}

struct Planner<'a, V, C> {
    caregivers: &'a [C],
    ledger: Ledger<'a, V>,
    /// Committed (visit, caregiver index) pairs in commit order.
    booked: Vec<(&'a V, usize)>,
}

impl<'a, V, C> Planner<'a, V, C>
where
    V: Visit + Sync,
    C: Caregiver + Sync,
{
    fn block_scores_parallel(&self, block: &[&'a V]) -> Vec<Option<BlockScore>> {
        (0..self.caregivers.len())
            .into_par_iter()
            .map(|index| {
                simulate_block(&self.caregivers[index], self.ledger.book(index), block)
            })
            .collect()
    }
}

impl<'a, V, C> Planner<'a, V, C>
where
    V: Visit,
    C: Caregiver,
{
    /// The only mutation point: record the pair and update the ledger.
    fn assign(&mut self, visit: &'a V, caregiver: usize) {
        self.booked.push((visit, caregiver));
        self.ledger.record(caregiver, visit);
    }

    /// Simulated score of the whole block for every caregiver, in input order.
    fn block_scores(&self, block: &[&'a V]) -> Vec<Option<BlockScore>> {
        self.caregivers
            .iter()
            .enumerate()
            .map(|(index, caregiver)| {
                simulate_block(caregiver, self.ledger.book(index), block)
            })
            .collect()
    }

    /// Caregiver with the best block score; the earliest wins ties.
    fn best_for_block(&self, block: &[&'a V], scores: Vec<Option<BlockScore>>) -> Option<usize> {
        let (index, score) = pick_first_min(scores, BlockScore::compare)?;
        debug!(
            customer = ?block[0].customer(),
            caregiver = ?self.caregivers[index].id(),
            switches = score.switches,
            hours = score.hours,
            continuity = score.continuity,
            "block assigned"
        );
        Some(index)
    }

    /// Book a block day by day in routed order.
    fn commit_block(&mut self, block: &[&'a V], caregiver: usize) {
        let mut days: Vec<(Weekday, Vec<&'a V>)> = Vec::new();
        for &visit in block {
            let weekday = visit.weekday();
            match days.iter_mut().find(|(day, _)| *day == weekday) {
                Some((_, day_visits)) => day_visits.push(visit),
                None => days.push((weekday, vec![visit])),
            }
        }
        for (_, day_visits) in days {
            for visit in order_day(&day_visits) {
                self.assign(visit, caregiver);
            }
        }
    }

    /// Best eligible caregiver for one visit: travel continuity, then fewer hours.
    fn best_for_visit(&self, visit: &'a V) -> Option<usize> {
        let weekday = visit.weekday();
        let scores = self.caregivers.iter().enumerate().map(|(index, caregiver)| {
            let hours = self.ledger.hours(index);
            let day = self.ledger.day_visits(index, weekday);
            if let Err(reason) = check(caregiver, visit, hours, day) {
                trace!(visit = ?visit.id(), caregiver = ?caregiver.id(), %reason, "ineligible");
                return None;
            }
            let same_neighborhood = day
                .iter()
                .max_by_key(|booked| booked.end())
                .is_some_and(|last| last.neighborhood() == visit.neighborhood());
            Some(VisitScore {
                travel_bonus: same_neighborhood,
                hours,
            })
        });
        pick_first_min(scores, VisitScore::compare).map(|(index, _)| index)
    }

    fn into_assignments(self) -> Vec<Assignment<V::Id, C::Id>> {
        let mut booked = self.booked;
        booked.sort_by_key(|(visit, _)| visit.start());
        booked
            .into_iter()
            .map(|(visit, caregiver)| Assignment {
                visit_id: visit.id().clone(),
                caregiver_id: self.caregivers[caregiver].id().clone(),
            })
            .collect()
    }
}

/// Ranking for a caregiver taking a whole customer block.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlockScore {
    /// Neighborhood switches across the days the block touches.
    switches: usize,
    /// Hours already booked before the block.
    hours: f64,
    /// Visits of this customer already booked with the caregiver.
    continuity: usize,
}

impl BlockScore {
    fn compare(&self, other: &Self) -> Ordering {
        self.switches
            .cmp(&other.switches)
            .then(self.hours.total_cmp(&other.hours))
            .then(other.continuity.cmp(&self.continuity))
    }
}

/// Ranking for a caregiver taking a single visit.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VisitScore {
    /// Last visit that day ends in the same neighborhood.
    travel_bonus: bool,
    hours: f64,
}

impl VisitScore {
    fn compare(&self, other: &Self) -> Ordering {
        other
            .travel_bonus
            .cmp(&self.travel_bonus)
            .then(self.hours.total_cmp(&other.hours))
    }
}

/// Dry-run the block against a scratch copy of one caregiver's book.
fn simulate_block<'a, V, C>(
    caregiver: &C,
    book: &CaregiverBook<'a, V>,
    block: &[&'a V],
) -> Option<BlockScore>
where
    V: Visit,
    C: Caregiver,
{
    let first = block.first()?;
    let mut scratch = book.clone();
    let mut touched: Vec<Weekday> = Vec::new();

    for &visit in block {
        let weekday = visit.weekday();
        if let Err(reason) = check(caregiver, visit, scratch.hours, scratch.days.day(weekday)) {
            trace!(visit = ?visit.id(), caregiver = ?caregiver.id(), %reason, "block rejected");
            return None;
        }
        scratch.record(visit);
        if !touched.contains(&weekday) {
            touched.push(weekday);
        }
    }

    let switches = touched
        .iter()
        .map(|&weekday| day_switches(scratch.days.day(weekday)))
        .sum();

    Some(BlockScore {
        switches,
        hours: book.hours,
        continuity: book.count_customer(first.customer()),
    })
}

/// Smallest score and its position; the earliest wins ties.
fn pick_first_min<S>(
    scores: impl IntoIterator<Item = Option<S>>,
    compare: impl Fn(&S, &S) -> Ordering,
) -> Option<(usize, S)> {
    let mut best: Option<(usize, S)> = None;
    for (index, score) in scores.into_iter().enumerate() {
        let Some(score) = score else {
            continue;
        };
        let better = match &best {
            Some((_, current)) => compare(&score, current) == Ordering::Less,
            None => true,
        };
        if better {
            best = Some((index, score));
        }
    }
    best
}

/// Customer blocks in order of first appearance, each sorted by start.
fn group_by_customer<V: Visit>(visits: &[V]) -> Vec<Vec<&V>> {
    let mut index: HashMap<&V::CustomerId, usize> = HashMap::new();
    let mut blocks: Vec<Vec<&V>> = Vec::new();
    for visit in visits {
        let slot = *index.entry(visit.customer()).or_insert_with(|| {
            blocks.push(Vec::new());
            blocks.len() - 1
        });
        blocks[slot].push(visit);
    }
    for block in &mut blocks {
        block.sort_by_key(|visit| visit.start());
    }
    blocks
}

fn validate<V, C>(visits: &[V], caregivers: &[C]) -> Result<(), SolveError>
where
    V: Visit,
    C: Caregiver,
{
    let mut seen = HashSet::with_capacity(visits.len());
    for visit in visits {
        if visit.end() <= visit.start() {
            return Err(SolveError::InvalidVisitWindow {
                visit: format!("{:?}", visit.id()),
            });
        }
        if !seen.insert(visit.id()) {
            return Err(SolveError::DuplicateVisit {
                visit: format!("{:?}", visit.id()),
            });
        }
    }
    for caregiver in caregivers {
        let max_hours = caregiver.max_hours();
        if max_hours.is_nan() || max_hours < 0.0 {
            return Err(SolveError::InvalidMaxHours {
                caregiver: format!("{:?}", caregiver.id()),
                max_hours,
            });
        }
    }
    Ok(())
}

//! Hard-constraint checks for placing one visit on one caregiver.

use std::fmt;

use crate::traits::{AvailabilityWindow, Caregiver, Visit};

/// Why a caregiver cannot take a visit. Ordinary outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    MissingSkill,
    Unavailable,
    Overlap,
    HoursExceeded,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Ineligibility::MissingSkill => "missing required skill",
            Ineligibility::Unavailable => "no availability window covers the visit",
            Ineligibility::Overlap => "overlaps an assigned visit",
            Ineligibility::HoursExceeded => "would exceed max hours",
        };
        f.write_str(text)
    }
}

/// Check every constraint, reporting the first one that fails.
///
/// `day_visits` are the caregiver's visits already booked on the visit's
/// weekday; `hours_so_far` is their accumulated total.
pub fn check<V, C>(
    caregiver: &C,
    visit: &V,
    hours_so_far: f64,
    day_visits: &[&V],
) -> Result<(), Ineligibility>
where
    V: Visit,
    C: Caregiver,
{
    if !caregiver.has_skill(visit.required_skill()) {
        return Err(Ineligibility::MissingSkill);
    }
    if !caregiver.availability().iter().any(|window| window.covers(visit)) {
        return Err(Ineligibility::Unavailable);
    }
    if day_visits.iter().any(|booked| visit.overlaps(booked)) {
        return Err(Ineligibility::Overlap);
    }
    if hours_so_far + visit.duration_hours() > caregiver.max_hours() {
        return Err(Ineligibility::HoursExceeded);
    }
    Ok(())
}

pub fn eligible<V, C>(caregiver: &C, visit: &V, hours_so_far: f64, day_visits: &[&V]) -> bool
where
    V: Visit,
    C: Caregiver,
{
    check(caregiver, visit, hours_so_far, day_visits).is_ok()
}

//! Core domain traits for the care planner.
//!
//! These are intentionally minimal. Concrete apps should implement them for
//! their own visit and caregiver records.

use std::fmt::Debug;
use std::hash::Hash;

use chrono::{Datelike, NaiveDateTime, Weekday};

/// Unique identifier for planner entities.
pub trait Id: Clone + Eq + Hash + Debug {}

impl<T> Id for T where T: Clone + Eq + Hash + Debug {}

/// A single home-care visit to be staffed.
pub trait Visit {
    type Id: Id;
    type CustomerId: Id;

    fn id(&self) -> &Self::Id;

    /// Client receiving the visit.
    fn customer(&self) -> &Self::CustomerId;

    /// Wall-clock start. Must be strictly before `end`.
    fn start(&self) -> NaiveDateTime;

    fn end(&self) -> NaiveDateTime;

    /// Capability tag a caregiver must hold.
    fn required_skill(&self) -> &str;

    /// Location bucket used for travel scoring.
    fn neighborhood(&self) -> &str;

    /// True iff `[start, end)` intersects `[other.start, other.end)`.
    fn overlaps(&self, other: &Self) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    fn duration_hours(&self) -> f64 {
        (self.end() - self.start()).num_seconds() as f64 / 3600.0
    }

    /// Day bucket for overlap and routing checks.
    fn weekday(&self) -> Weekday {
        self.start().weekday()
    }
}

/// A time span during which a caregiver can work.
pub trait AvailabilityWindow {
    fn covers<V: Visit + ?Sized>(&self, visit: &V) -> bool;
}

/// The worker who performs visits.
pub trait Caregiver {
    type Id: Id;
    type Window: AvailabilityWindow;

    fn id(&self) -> &Self::Id;

    /// Capability tags held by this caregiver.
    fn skills(&self) -> &[String];

    fn availability(&self) -> &[Self::Window];

    /// Weekly cap on assigned hours.
    fn max_hours(&self) -> f64;

    fn has_skill(&self, skill: &str) -> bool {
        self.skills().iter().any(|held| held == skill)
    }
}

//! Run-scoped bookkeeping of caregiver hours and per-day visits.
//!
//! A [`Ledger`] lives for exactly one solve call. Caregivers are addressed by
//! their position in the input slice, which keeps iteration order identical to
//! input order.

use chrono::Weekday;

use crate::traits::Visit;

/// Visits assigned to one caregiver, bucketed by weekday (Monday first).
#[derive(Debug)]
pub struct DayBook<'a, V> {
    days: [Vec<&'a V>; 7],
}

impl<V> Default for DayBook<'_, V> {
    fn default() -> Self {
        Self {
            days: Default::default(),
        }
    }
}

impl<V> Clone for DayBook<'_, V> {
    fn clone(&self) -> Self {
        Self {
            days: self.days.clone(),
        }
    }
}

impl<'a, V> DayBook<'a, V> {
    pub fn day(&self, weekday: Weekday) -> &[&'a V] {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn push(&mut self, weekday: Weekday, visit: &'a V) {
        self.days[weekday.num_days_from_monday() as usize].push(visit);
    }

    /// All visits, Monday through Sunday, each day in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &'a V> + '_ {
        self.days.iter().flatten().copied()
    }
}

/// One caregiver's slice of the ledger.
#[derive(Debug)]
pub struct CaregiverBook<'a, V> {
    pub hours: f64,
    pub days: DayBook<'a, V>,
}

impl<V> Default for CaregiverBook<'_, V> {
    fn default() -> Self {
        Self {
            hours: 0.0,
            days: DayBook::default(),
        }
    }
}

impl<V> Clone for CaregiverBook<'_, V> {
    fn clone(&self) -> Self {
        Self {
            hours: self.hours,
            days: self.days.clone(),
        }
    }
}

impl<'a, V: Visit> CaregiverBook<'a, V> {
    /// Book a visit: add its duration and append it to its weekday.
    pub fn record(&mut self, visit: &'a V) {
        self.hours += visit.duration_hours();
        self.days.push(visit.weekday(), visit);
    }

    /// Number of booked visits belonging to `customer`.
    pub fn count_customer(&self, customer: &V::CustomerId) -> usize {
        self.days
            .iter()
            .filter(|visit| visit.customer() == customer)
            .count()
    }
}

#[derive(Debug)]
pub struct Ledger<'a, V> {
    books: Vec<CaregiverBook<'a, V>>,
}

impl<'a, V: Visit> Ledger<'a, V> {
    /// Empty ledger for `caregivers` caregivers.
    pub fn new(caregivers: usize) -> Self {
        Self {
            books: (0..caregivers).map(|_| CaregiverBook::default()).collect(),
        }
    }

    pub fn book(&self, caregiver: usize) -> &CaregiverBook<'a, V> {
        &self.books[caregiver]
    }

    pub fn hours(&self, caregiver: usize) -> f64 {
        self.books[caregiver].hours
    }

    pub fn day_visits(&self, caregiver: usize, weekday: Weekday) -> &[&'a V] {
        self.books[caregiver].days.day(weekday)
    }

    pub fn record(&mut self, caregiver: usize, visit: &'a V) {
        self.books[caregiver].record(visit);
    }
}

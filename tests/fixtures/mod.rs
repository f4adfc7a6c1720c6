//! Test fixtures for care-planner.
//!
//! Builders for visits and caregivers with sensible defaults, plus a
//! schedule checker for the hard constraints.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use care_planner::solver::Assignment;
use care_planner::traits::{AvailabilityWindow, Caregiver, Visit};
use care_planner::window::WeeklyWindow;

pub type TestAssignment = Assignment<String, String>;

/// 2024-01-01 is a Monday; day 1..=7 covers one week.
pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid fixture timestamp")
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid fixture time")
}

pub const MON: u32 = 1;
pub const TUE: u32 = 2;
pub const WED: u32 = 3;
pub const THU: u32 = 4;
pub const FRI: u32 = 5;

/// Builder for test visits: Monday 09:00-10:00, personal care, downtown.
#[derive(Clone, Debug)]
pub struct TestVisit {
    pub id: String,
    pub customer: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub skill: String,
    pub neighborhood: String,
}

impl TestVisit {
    pub fn new(id: &str, customer: &str) -> Self {
        Self {
            id: id.to_string(),
            customer: customer.to_string(),
            start: at(MON, 9, 0),
            end: at(MON, 10, 0),
            skill: "personal_care".to_string(),
            neighborhood: "downtown".to_string(),
        }
    }

    /// Whole-hour slot on `day`.
    pub fn on(mut self, day: u32, from: u32, to: u32) -> Self {
        self.start = at(day, from, 0);
        self.end = at(day, to, 0);
        self
    }

    pub fn between(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn skill(mut self, skill: &str) -> Self {
        self.skill = skill.to_string();
        self
    }

    pub fn neighborhood(mut self, neighborhood: &str) -> Self {
        self.neighborhood = neighborhood.to_string();
        self
    }
}

impl Visit for TestVisit {
    type Id = String;
    type CustomerId = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn customer(&self) -> &String {
        &self.customer
    }

    fn start(&self) -> NaiveDateTime {
        self.start
    }

    fn end(&self) -> NaiveDateTime {
        self.end
    }

    fn required_skill(&self) -> &str {
        &self.skill
    }

    fn neighborhood(&self) -> &str {
        &self.neighborhood
    }
}

/// Builder for test caregivers: personal care, every day 07:00-21:00, 40h cap.
#[derive(Clone, Debug)]
pub struct TestCaregiver {
    pub id: String,
    pub skills: Vec<String>,
    pub availability: Vec<WeeklyWindow>,
    pub max_hours: f64,
}

impl TestCaregiver {
    pub fn new(id: &str) -> Self {
        let week = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        Self {
            id: id.to_string(),
            skills: vec!["personal_care".to_string()],
            availability: week
                .into_iter()
                .map(|day| WeeklyWindow::new(day, time(7, 0), time(21, 0)))
                .collect(),
            max_hours: 40.0,
        }
    }

    pub fn skill(mut self, skill: &str) -> Self {
        self.skills.push(skill.to_string());
        self
    }

    /// Replace the default skill set.
    pub fn only_skills(mut self, skills: &[&str]) -> Self {
        self.skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn max_hours(mut self, hours: f64) -> Self {
        self.max_hours = hours;
        self
    }

    /// Drop every availability window.
    pub fn unavailable(mut self) -> Self {
        self.availability.clear();
        self
    }

    pub fn available(mut self, weekday: Weekday, from: u32, to: u32) -> Self {
        self.availability
            .push(WeeklyWindow::new(weekday, time(from, 0), time(to, 0)));
        self
    }
}

impl Caregiver for TestCaregiver {
    type Id = String;
    type Window = WeeklyWindow;

    fn id(&self) -> &String {
        &self.id
    }

    fn skills(&self) -> &[String] {
        &self.skills
    }

    fn availability(&self) -> &[WeeklyWindow] {
        &self.availability
    }

    fn max_hours(&self) -> f64 {
        self.max_hours
    }
}

/// Visit held behind an `Rc`, for hosts whose domain types are not `Sync`.
#[derive(Clone, Debug)]
pub struct SharedVisit(pub Rc<TestVisit>);

impl Visit for SharedVisit {
    type Id = String;
    type CustomerId = String;

    fn id(&self) -> &String {
        self.0.id()
    }

    fn customer(&self) -> &String {
        self.0.customer()
    }

    fn start(&self) -> NaiveDateTime {
        self.0.start()
    }

    fn end(&self) -> NaiveDateTime {
        self.0.end()
    }

    fn required_skill(&self) -> &str {
        self.0.required_skill()
    }

    fn neighborhood(&self) -> &str {
        Visit::neighborhood(&*self.0)
    }
}

/// Caregiver held behind an `Rc`.
#[derive(Clone, Debug)]
pub struct SharedCaregiver(pub Rc<TestCaregiver>);

impl Caregiver for SharedCaregiver {
    type Id = String;
    type Window = WeeklyWindow;

    fn id(&self) -> &String {
        self.0.id()
    }

    fn skills(&self) -> &[String] {
        self.0.skills()
    }

    fn availability(&self) -> &[WeeklyWindow] {
        self.0.availability()
    }

    fn max_hours(&self) -> f64 {
        Caregiver::max_hours(&*self.0)
    }
}

/// Caregiver id serving `visit_id`, if any.
pub fn caregiver_of<'a>(assignments: &'a [TestAssignment], visit_id: &str) -> Option<&'a str> {
    assignments
        .iter()
        .find(|a| a.visit_id == visit_id)
        .map(|a| a.caregiver_id.as_str())
}

/// Visit ids served by `caregiver_id`, in output order.
pub fn visits_of<'a>(assignments: &'a [TestAssignment], caregiver_id: &str) -> Vec<&'a str> {
    assignments
        .iter()
        .filter(|a| a.caregiver_id == caregiver_id)
        .map(|a| a.visit_id.as_str())
        .collect()
}

/// Assert every hard constraint on a finished schedule.
pub fn assert_feasible(
    visits: &[TestVisit],
    caregivers: &[TestCaregiver],
    assignments: &[TestAssignment],
) {
    let visit_by_id: HashMap<&str, &TestVisit> =
        visits.iter().map(|v| (v.id.as_str(), v)).collect();
    let caregiver_by_id: HashMap<&str, &TestCaregiver> =
        caregivers.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut seen = HashSet::new();
    let mut hours: HashMap<&str, f64> = HashMap::new();
    let mut days: HashMap<(&str, Weekday), Vec<&TestVisit>> = HashMap::new();

    for assignment in assignments {
        assert!(
            seen.insert(assignment.visit_id.as_str()),
            "visit {} assigned twice",
            assignment.visit_id
        );
        let visit = visit_by_id[assignment.visit_id.as_str()];
        let caregiver = caregiver_by_id[assignment.caregiver_id.as_str()];

        assert!(
            caregiver.skills.contains(&visit.skill),
            "{} lacks skill for {}",
            caregiver.id,
            visit.id
        );
        assert!(
            caregiver.availability.iter().any(|w| w.covers(visit)),
            "{} not available for {}",
            caregiver.id,
            visit.id
        );

        let day = days
            .entry((caregiver.id.as_str(), visit.start.weekday()))
            .or_default();
        for other in day.iter() {
            assert!(
                !visit.overlaps(other),
                "{} double-booked: {} and {}",
                caregiver.id,
                visit.id,
                other.id
            );
        }
        day.push(visit);

        let total = hours.entry(caregiver.id.as_str()).or_default();
        *total += visit.duration_hours();
        assert!(
            *total <= caregiver.max_hours + 1e-9,
            "{} over max hours",
            caregiver.id
        );
    }
}

/// Deterministic synthetic week: `customers` clients with a few visits each.
pub fn synthetic_week(customers: usize) -> Vec<TestVisit> {
    let hoods = ["north", "south", "east", "west"];
    let skills = ["personal_care", "personal_care", "dementia", "wound_care"];
    let mut visits = Vec::new();
    for c in 0..customers {
        let per_customer = 1 + c % 4;
        for k in 0..per_customer {
            let day = 1 + ((c + 2 * k) % 5) as u32;
            let from = 7 + ((c * 3 + k * 5) % 12) as u32;
            let length = 1 + (c + k) as u32 % 2;
            visits.push(
                TestVisit::new(&format!("v{}-{}", c, k), &format!("c{}", c))
                    .on(day, from, from + length)
                    .skill(skills[c % skills.len()])
                    .neighborhood(hoods[(c + k) % hoods.len()]),
            );
        }
    }
    visits
}

pub fn synthetic_staff(count: usize) -> Vec<TestCaregiver> {
    (0..count)
        .map(|i| {
            let caregiver = TestCaregiver::new(&format!("cg{}", i)).max_hours(6.0 + (i % 3) as f64 * 4.0);
            match i % 3 {
                0 => caregiver.skill("dementia"),
                1 => caregiver.skill("wound_care"),
                _ => caregiver,
            }
        })
        .collect()
}

//! care-planner core
//!
//! Greedy home-care visit assignment: continuity of care first, travel
//! efficiency second, under hard skill/availability/overlap/hours constraints.

pub mod traits;
pub mod window;
pub mod ledger;
pub mod eligibility;
pub mod route;
pub mod solver;
pub mod continuity;

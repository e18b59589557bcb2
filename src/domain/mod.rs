//! Domain models for career-span
//!
//! Contains the month calendar and the overlap analysis, without any I/O
//! concerns. Everything here is a pure function of its inputs.

mod month;
mod engagement;
mod overlap;
mod stats;

pub use month::{
    enumerate_months, month_distance_inclusive, MonthError, MonthSpan, MonthToken, YearsMonths,
};
pub use engagement::{Engagement, EngagementId};
pub use overlap::{analyze_overlaps, unique_months, CoverageRange, OverlapAnalysis};
pub use stats::{career_stats, CareerStats};

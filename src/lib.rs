//! career-span - career duration calculator
//!
//! Takes a list of work engagements, each spanning a range of months, and
//! reports how much calendar time they cover once overlapping months are
//! counted only once. Stretches where several engagements ran at the same
//! time are reported as coverage ranges along with who contributed to them.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    analyze_overlaps, career_stats, CareerStats, CoverageRange, Engagement, EngagementId,
    MonthError, MonthToken, OverlapAnalysis, YearsMonths,
};

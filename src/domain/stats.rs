//! Career statistics
//!
//! Turns an [`OverlapAnalysis`] into the summary shown to users: project
//! count plus total and deduplicated careers as years and months.

use serde::Serialize;

use super::engagement::Engagement;
use super::month::{MonthError, YearsMonths};
use super::overlap::{analyze_overlaps, OverlapAnalysis};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CareerStats {
    pub total_projects: usize,

    /// Sum of every engagement's length, overlaps counted twice
    pub total: YearsMonths,

    /// Calendar coverage with overlaps removed
    pub unique: YearsMonths,

    /// `total - unique`, in months
    pub overlap_months: u32,
}

impl CareerStats {
    /// Builds statistics from an analysis of `total_projects` engagements
    pub fn from_analysis(total_projects: usize, analysis: &OverlapAnalysis) -> Self {
        Self {
            total_projects,
            total: YearsMonths::from_months(analysis.total_months),
            unique: YearsMonths::from_months(analysis.unique_months),
            overlap_months: analysis.overlap_months,
        }
    }

    /// Overlap expressed as years and months
    pub fn overlap(&self) -> YearsMonths {
        YearsMonths::from_months(self.overlap_months)
    }

    pub fn is_empty(&self) -> bool {
        self.total_projects == 0
    }
}

/// Analyzes `engagements` and summarizes the result
pub fn career_stats(engagements: &[Engagement]) -> Result<CareerStats, MonthError> {
    let analysis = analyze_overlaps(engagements)?;
    Ok(CareerStats::from_analysis(engagements.len(), &analysis))
}

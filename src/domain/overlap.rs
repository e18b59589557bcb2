//! Overlap analysis
//!
//! Expands every engagement into the months it covers, deduplicates them
//! into a single timeline and finds the stretches where two or more
//! engagements ran at the same time.
//!
//! ## Figures
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `total_months` | Sum of each engagement's inclusive length |
//! | `unique_months` | Distinct months covered by any engagement |
//! | `overlap_months` | `total_months - unique_months` |
//!
//! `overlap_months` is a double-counting measure: a month shared by three
//! engagements adds two to it. It is therefore not the number of months
//! inside [`CoverageRange`]s; that figure is [`OverlapAnalysis::range_months`].

use serde::Serialize;
use std::collections::BTreeMap;

use super::engagement::{Engagement, EngagementId};
use super::month::{MonthError, MonthSpan, MonthToken};

/// A maximal run of consecutive months shared by the same engagements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageRange {
    pub start: MonthToken,
    /// Inclusive
    pub end: MonthToken,
    /// Sorted, at least two entries
    pub contributors: Vec<EngagementId>,
}

impl CoverageRange {
    /// Inclusive number of months in the range
    pub fn len(&self) -> u32 {
        (self.end.index() - self.start.index() + 1) as u32
    }

    pub fn months(&self) -> Vec<MonthToken> {
        super::month::enumerate_months(self.start, self.end)
    }

    /// Names of the contributing engagements, falling back to the id
    pub fn contributor_names<'a>(&'a self, engagements: &'a [Engagement]) -> Vec<&'a str> {
        self.contributors
            .iter()
            .map(|id| {
                engagements
                    .iter()
                    .find(|e| &e.id == id)
                    .map(|e| e.name.as_str())
                    .unwrap_or(id.as_str())
            })
            .collect()
    }
}

/// Result of analyzing one engagement snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverlapAnalysis {
    pub total_months: u32,
    pub unique_months: u32,
    pub overlap_months: u32,
    pub overlap_ranges: Vec<CoverageRange>,
}

impl OverlapAnalysis {
    /// Months that fall inside some coverage range
    ///
    /// Differs from `overlap_months` whenever three or more engagements
    /// coincide in a month.
    pub fn range_months(&self) -> u32 {
        self.overlap_ranges.iter().map(CoverageRange::len).sum()
    }

    pub fn has_overlaps(&self) -> bool {
        !self.overlap_ranges.is_empty()
    }
}

/// Month index -> engagements covering that month, in input order
type Timeline<'a> = BTreeMap<i64, Vec<&'a EngagementId>>;

/// Analyzes a snapshot of engagements
///
/// Every engagement's months are validated before anything is counted, so
/// a single malformed or reversed range fails the whole analysis.
pub fn analyze_overlaps(engagements: &[Engagement]) -> Result<OverlapAnalysis, MonthError> {
    let spans = spans_of(engagements)?;

    let total_months: u32 = spans.iter().map(|(_, span)| span.len()).sum();

    let timeline = build_timeline(&spans);
    let unique_months = timeline.len() as u32;

    Ok(OverlapAnalysis {
        total_months,
        unique_months,
        overlap_months: total_months - unique_months,
        overlap_ranges: coverage_ranges(&timeline),
    })
}

/// Distinct months covered by at least one engagement, ascending
pub fn unique_months(engagements: &[Engagement]) -> Result<Vec<MonthToken>, MonthError> {
    let spans = spans_of(engagements)?;

    Ok(build_timeline(&spans)
        .keys()
        .copied()
        .map(MonthToken::from_index)
        .collect())
}

fn spans_of(engagements: &[Engagement]) -> Result<Vec<(&EngagementId, MonthSpan)>, MonthError> {
    engagements
        .iter()
        .map(|e| e.span().map(|span| (&e.id, span)))
        .collect()
}

fn build_timeline<'a>(spans: &[(&'a EngagementId, MonthSpan)]) -> Timeline<'a> {
    let mut timeline = Timeline::new();
    for (id, span) in spans {
        for index in span.start().index()..=span.end().index() {
            timeline.entry(index).or_default().push(*id);
        }
    }
    timeline
}

/// Run-length encodes the multiply-covered months
///
/// A range continues only while months are consecutive and the sorted
/// contributor set is unchanged; either break starts a new range.
fn coverage_ranges(timeline: &Timeline<'_>) -> Vec<CoverageRange> {
    let mut ranges = Vec::new();
    let mut open: Option<(i64, i64, Vec<EngagementId>)> = None;

    for (&index, ids) in timeline.iter().filter(|(_, ids)| ids.len() > 1) {
        let mut contributors: Vec<EngagementId> = ids.iter().map(|id| (*id).clone()).collect();
        contributors.sort();

        let extends = matches!(
            &open,
            Some((_, end, current)) if index == *end + 1 && *current == contributors
        );

        if extends {
            if let Some((_, end, _)) = open.as_mut() {
                *end = index;
            }
        } else if let Some(range) = open.replace((index, index, contributors)) {
            ranges.push(close(range));
        }
    }

    if let Some(range) = open {
        ranges.push(close(range));
    }

    ranges
}

fn close((start, end, contributors): (i64, i64, Vec<EngagementId>)) -> CoverageRange {
    CoverageRange {
        start: MonthToken::from_index(start),
        end: MonthToken::from_index(end),
        contributors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engagement(id: &str, start: &str, end: &str) -> Engagement {
        Engagement::new(id, format!("Project {}", id), start, end)
    }

    fn m(s: &str) -> MonthToken {
        s.parse().unwrap()
    }

    fn ids(list: &[&str]) -> Vec<EngagementId> {
        list.iter().map(|s| EngagementId::from(*s)).collect()
    }

    #[test]
    fn three_overlapping_engagements() {
        let engagements = vec![
            engagement("1", "2023-04", "2023-09"),
            engagement("2", "2023-08", "2023-12"),
            engagement("3", "2023-10", "2023-11"),
        ];

        let analysis = analyze_overlaps(&engagements).unwrap();

        assert_eq!(analysis.total_months, 13);
        assert_eq!(analysis.unique_months, 9);
        assert_eq!(analysis.overlap_months, 4);

        assert_eq!(
            analysis.overlap_ranges,
            vec![
                CoverageRange {
                    start: m("2023-08"),
                    end: m("2023-09"),
                    contributors: ids(&["1", "2"]),
                },
                CoverageRange {
                    start: m("2023-10"),
                    end: m("2023-11"),
                    contributors: ids(&["2", "3"]),
                },
            ]
        );
        assert_eq!(analysis.range_months(), 4);
        assert_eq!(
            analysis.overlap_ranges[1].contributor_names(&engagements),
            vec!["Project 2", "Project 3"]
        );
    }

    #[test]
    fn single_engagement_has_no_overlap() {
        let analysis = analyze_overlaps(&[engagement("1", "2023-04", "2023-06")]).unwrap();

        assert_eq!(analysis.total_months, 3);
        assert_eq!(analysis.unique_months, 3);
        assert_eq!(analysis.overlap_months, 0);
        assert!(!analysis.has_overlaps());
    }

    #[test]
    fn identical_ranges_form_one_coverage_range() {
        let engagements = vec![
            engagement("b", "2024-01", "2024-03"),
            engagement("a", "2024-01", "2024-03"),
        ];

        let analysis = analyze_overlaps(&engagements).unwrap();

        assert_eq!(analysis.overlap_months, 3);
        assert_eq!(
            analysis.overlap_ranges,
            vec![CoverageRange {
                start: m("2024-01"),
                end: m("2024-03"),
                contributors: ids(&["a", "b"]),
            }]
        );
    }

    #[test]
    fn malformed_month_fails_whole_analysis() {
        let engagements = vec![
            engagement("1", "2023-04", "2023-06"),
            engagement("2", "2024-13", "2024-14"),
        ];

        assert_eq!(
            analyze_overlaps(&engagements),
            Err(MonthError::Format("2024-13".to_string()))
        );
    }

    #[test]
    fn reversed_range_fails() {
        let engagements = vec![engagement("1", "2024-06", "2024-01")];
        assert_eq!(
            analyze_overlaps(&engagements),
            Err(MonthError::Range {
                start: m("2024-06"),
                end: m("2024-01"),
            })
        );
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(analyze_overlaps(&[]).unwrap(), OverlapAnalysis::default());
    }

    #[test]
    fn contributor_change_without_gap_splits_range() {
        // 1 spans the whole year; 2 and 3 hand over without a gap
        let engagements = vec![
            engagement("1", "2023-01", "2023-12"),
            engagement("2", "2023-03", "2023-05"),
            engagement("3", "2023-06", "2023-08"),
        ];

        let analysis = analyze_overlaps(&engagements).unwrap();

        assert_eq!(analysis.overlap_ranges.len(), 2);
        assert_eq!(analysis.overlap_ranges[0].start, m("2023-03"));
        assert_eq!(analysis.overlap_ranges[0].end, m("2023-05"));
        assert_eq!(analysis.overlap_ranges[1].start, m("2023-06"));
        assert_eq!(analysis.overlap_ranges[1].end, m("2023-08"));
    }

    #[test]
    fn separate_stretches_become_separate_ranges() {
        let engagements = vec![
            engagement("1", "2023-01", "2023-02"),
            engagement("2", "2023-02", "2023-02"),
            engagement("3", "2023-04", "2023-05"),
            engagement("4", "2023-05", "2023-05"),
        ];

        let analysis = analyze_overlaps(&engagements).unwrap();

        assert_eq!(
            analysis.overlap_ranges,
            vec![
                CoverageRange {
                    start: m("2023-02"),
                    end: m("2023-02"),
                    contributors: ids(&["1", "2"]),
                },
                CoverageRange {
                    start: m("2023-05"),
                    end: m("2023-05"),
                    contributors: ids(&["3", "4"]),
                },
            ]
        );
    }

    #[test]
    fn three_way_coincidence_inflates_overlap_months() {
        let engagements = vec![
            engagement("1", "2023-01", "2023-01"),
            engagement("2", "2023-01", "2023-01"),
            engagement("3", "2023-01", "2023-01"),
        ];

        let analysis = analyze_overlaps(&engagements).unwrap();

        assert_eq!(analysis.total_months, 3);
        assert_eq!(analysis.unique_months, 1);
        assert_eq!(analysis.overlap_months, 2);
        assert_eq!(analysis.range_months(), 1);
        assert_eq!(analysis.overlap_ranges[0].contributors, ids(&["1", "2", "3"]));
    }

    #[test]
    fn ranges_cross_year_boundary() {
        let engagements = vec![
            engagement("1", "2023-11", "2024-02"),
            engagement("2", "2023-12", "2024-01"),
        ];

        let analysis = analyze_overlaps(&engagements).unwrap();

        assert_eq!(analysis.overlap_ranges.len(), 1);
        assert_eq!(analysis.overlap_ranges[0].start, m("2023-12"));
        assert_eq!(analysis.overlap_ranges[0].end, m("2024-01"));
        assert_eq!(analysis.overlap_ranges[0].len(), 2);
    }

    #[test]
    fn unique_months_are_sorted_and_deduplicated() {
        let engagements = vec![
            engagement("1", "2023-03", "2023-04"),
            engagement("2", "2023-01", "2023-03"),
        ];

        let months: Vec<String> = unique_months(&engagements)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(months, vec!["2023-01", "2023-02", "2023-03", "2023-04"]);
    }

    #[test]
    fn analysis_is_repeatable() {
        let engagements = vec![
            engagement("1", "2023-04", "2023-09"),
            engagement("2", "2023-08", "2023-12"),
        ];
        assert_eq!(
            analyze_overlaps(&engagements).unwrap(),
            analyze_overlaps(&engagements).unwrap()
        );
    }
}

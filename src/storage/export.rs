//! Result export
//!
//! Writes the analyzed engagement list back out, either as a CSV sheet
//! with a trailing summary block or as a JSON document.
//!
//! The CSV layout matches the input sheet so it opens cleanly in the same
//! spreadsheet:
//!
//! ```text
//! 사업명,시작년월,종료년월,기간,담당업무,발주처,기술스택,근무형태
//! 프로젝트 A,2023-04,2023-09,6개월,...
//!
//! 경력 통계
//! 총 경력 기간 (중복 포함),1년 1개월
//! 실제 경력 기간 (중복 제외),0년 9개월
//! 중복 기간,0년 4개월
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::{CareerStats, Engagement, OverlapAnalysis, YearsMonths};

const COLUMNS: [&str; 8] = [
    "사업명",
    "시작년월",
    "종료년월",
    "기간",
    "담당업무",
    "발주처",
    "기술스택",
    "근무형태",
];

/// Export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Everything needed to write one results file
pub struct ResultsExport<'a> {
    pub engagements: &'a [Engagement],
    pub analysis: &'a OverlapAnalysis,
    pub stats: &'a CareerStats,
    /// Append the overlap ranges after the summary (CSV only)
    pub include_ranges: bool,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    generated_at: DateTime<Local>,
    engagements: &'a [Engagement],
    analysis: &'a OverlapAnalysis,
    range_months: u32,
    stats: &'a CareerStats,
}

impl ResultsExport<'_> {
    /// Default file name, dated today: `경력분석결과_2024-05-01.csv`
    pub fn default_file_name(format: ExportFormat) -> String {
        format!(
            "경력분석결과_{}.{}",
            Local::now().format("%Y-%m-%d"),
            format.extension()
        )
    }

    /// Writes the results to `path`, replacing it atomically
    pub fn write_to_path(&self, path: &Path, format: ExportFormat) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = path.with_extension(format!("{}.tmp", format.extension()));
        {
            let file = File::create(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
            let mut writer = BufWriter::new(file);

            match format {
                ExportFormat::Csv => self.write_csv(&mut writer)?,
                ExportFormat::Json => self.write_json(&mut writer)?,
            }

            writer.flush().context("Failed to flush results file")?;
        }

        fs::rename(&temp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })
    }

    /// Writes the engagement rows followed by the summary block
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

        csv.write_record(COLUMNS)?;
        for engagement in self.engagements {
            let duration = format!("{}개월", engagement.duration_months()?);
            csv.write_record([
                engagement.name.as_str(),
                engagement.start_month.as_str(),
                engagement.end_month.as_str(),
                duration.as_str(),
                engagement.role.as_str(),
                engagement.client.as_str(),
                engagement.skills.as_str(),
                engagement.employment_type.as_deref().unwrap_or(""),
            ])?;
        }

        let summary = [
            ("총 경력 기간 (중복 포함)", YearsMonths::from_months(self.analysis.total_months)),
            ("실제 경력 기간 (중복 제외)", YearsMonths::from_months(self.analysis.unique_months)),
            ("중복 기간", YearsMonths::from_months(self.analysis.overlap_months)),
        ];

        csv.write_record(blank_row())?;
        csv.write_record(padded(&["경력 통계"]))?;
        for (label, duration) in summary {
            let duration = duration.to_string();
            csv.write_record(padded(&[label, duration.as_str()]))?;
        }

        if self.include_ranges && self.analysis.has_overlaps() {
            csv.write_record(blank_row())?;
            csv.write_record(padded(&["중복 구간"]))?;
            for (n, range) in self.analysis.overlap_ranges.iter().enumerate() {
                let cells = [
                    format!("구간 {}", n + 1),
                    format!("{} ~ {}", range.start, range.end),
                    format!("{}개월", range.len()),
                    range.contributor_names(self.engagements).join(", "),
                ];
                csv.write_record(padded(&cells.each_ref().map(String::as_str)))?;
            }
        }

        csv.flush().context("Failed to write CSV results")?;
        Ok(())
    }

    /// Writes the engagements, analysis and statistics as one JSON document
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        let doc = JsonExport {
            generated_at: Local::now(),
            engagements: self.engagements,
            analysis: self.analysis,
            range_months: self.analysis.range_months(),
            stats: self.stats,
        };
        serde_json::to_writer_pretty(&mut writer, &doc).context("Failed to serialize results")?;
        writeln!(writer).context("Failed to write JSON results")?;
        Ok(())
    }
}

fn blank_row() -> [&'static str; COLUMNS.len()] {
    [""; COLUMNS.len()]
}

/// Pads a short summary row to the sheet width
fn padded(cells: &[&str]) -> Vec<String> {
    let mut row: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
    row.resize(COLUMNS.len(), String::new());
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analyze_overlaps;
    use tempfile::TempDir;

    fn sample() -> Vec<Engagement> {
        vec![
            Engagement::new("1", "프로젝트 A", "2023-04", "2023-09")
                .with_details("퍼블리싱", "클라이언트 A", "HTML, CSS")
                .with_employment_type("프리랜서"),
            Engagement::new("2", "프로젝트 B", "2023-08", "2023-12"),
            Engagement::new("3", "프로젝트 C", "2023-10", "2023-11"),
        ]
    }

    fn render(include_ranges: bool) -> String {
        let engagements = sample();
        let analysis = analyze_overlaps(&engagements).unwrap();
        let stats = CareerStats::from_analysis(engagements.len(), &analysis);
        let export = ResultsExport {
            engagements: &engagements,
            analysis: &analysis,
            stats: &stats,
            include_ranges,
        };

        let mut buf = Vec::new();
        export.write_csv(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_has_rows_and_summary() {
        let text = render(false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "사업명,시작년월,종료년월,기간,담당업무,발주처,기술스택,근무형태");
        assert_eq!(
            lines[1],
            "프로젝트 A,2023-04,2023-09,6개월,퍼블리싱,클라이언트 A,\"HTML, CSS\",프리랜서"
        );
        assert_eq!(lines[2], "프로젝트 B,2023-08,2023-12,5개월,,,,");
        assert_eq!(lines[4], ",,,,,,,");
        assert_eq!(lines[5], "경력 통계,,,,,,,");
        assert_eq!(lines[6], "총 경력 기간 (중복 포함),1년 1개월,,,,,,");
        assert_eq!(lines[7], "실제 경력 기간 (중복 제외),0년 9개월,,,,,,");
        assert_eq!(lines[8], "중복 기간,0년 4개월,,,,,,");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn csv_can_include_ranges() {
        let text = render(true);

        assert!(text.contains("중복 구간"));
        assert!(text.contains("구간 1,2023-08 ~ 2023-09,2개월,\"프로젝트 A, 프로젝트 B\""));
        assert!(text.contains("구간 2,2023-10 ~ 2023-11,2개월,\"프로젝트 B, 프로젝트 C\""));
    }

    #[test]
    fn json_contains_analysis_and_stats() {
        let engagements = sample();
        let analysis = analyze_overlaps(&engagements).unwrap();
        let stats = CareerStats::from_analysis(engagements.len(), &analysis);
        let export = ResultsExport {
            engagements: &engagements,
            analysis: &analysis,
            stats: &stats,
            include_ranges: false,
        };

        let mut buf = Vec::new();
        export.write_json(&mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(json["analysis"]["total_months"], 13);
        assert_eq!(json["analysis"]["overlap_ranges"][0]["start"], "2023-08");
        assert_eq!(json["range_months"], 4);
        assert_eq!(json["stats"]["unique"]["months"], 9);
        assert_eq!(json["engagements"][0]["startMonth"], "2023-04");
    }

    #[test]
    fn write_to_path_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("results.csv");

        let engagements = sample();
        let analysis = analyze_overlaps(&engagements).unwrap();
        let stats = CareerStats::from_analysis(engagements.len(), &analysis);
        ResultsExport {
            engagements: &engagements,
            analysis: &analysis,
            stats: &stats,
            include_ranges: false,
        }
        .write_to_path(&path, ExportFormat::Csv)
        .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("사업명"));
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn default_file_name_is_dated() {
        let name = ResultsExport::default_file_name(ExportFormat::Json);
        assert!(name.starts_with("경력분석결과_"));
        assert!(name.ends_with(".json"));
    }
}

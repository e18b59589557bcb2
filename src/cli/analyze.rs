//! Analysis commands (analyze, export)
//!
//! Both read the whole engagement file first, then run the overlap
//! analysis once over the complete list.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::{analyze_overlaps, CareerStats, Engagement, OverlapAnalysis, YearsMonths};
use crate::storage::{EngagementReader, ExportFormat, InputFormat, ResultsExport, Settings};

/// Where and how `export` writes its results
pub struct ExportOptions {
    pub destination: Option<PathBuf>,
    pub format: ExportFormat,
    pub include_ranges: bool,
}

/// Reads engagements, reporting skipped rows in verbose mode
fn load(
    output: &Output,
    path: &Path,
    input_format: Option<InputFormat>,
    settings: &Settings,
) -> Result<Vec<Engagement>> {
    let reader = EngagementReader::new(path, input_format, &settings.import)?;
    output.verbose_ctx(
        "import",
        &format!("Reading {} as {}", path.display(), reader.format().as_str()),
    );

    let report = reader.read()?;

    if let Some(header_row) = report.header_row {
        output.verbose_ctx("import", &format!("Header found at row {}", header_row + 1));
    }
    for skipped in &report.skipped {
        output.verbose_ctx(
            "import",
            &format!(
                "Row {}: skipped '{}' ({})",
                skipped.line,
                skipped.name,
                skipped.reason.as_str()
            ),
        );
    }
    if !report.skipped.is_empty() {
        output.warn(&format!(
            "{} row(s) without start or end month were skipped",
            report.skipped.len()
        ));
    }

    output.verbose_ctx(
        "import",
        &format!("Imported {} engagement(s)", report.engagements.len()),
    );
    Ok(report.engagements)
}

fn run_analysis(
    output: &Output,
    path: &Path,
    engagements: &[Engagement],
) -> Result<(OverlapAnalysis, CareerStats)> {
    let analysis = analyze_overlaps(engagements)
        .with_context(|| match engagements.iter().find(|e| e.span().is_err()) {
            Some(bad) => format!(
                "Failed to analyze engagements from {}: engagement '{}' ({})",
                path.display(),
                bad.name,
                bad.id
            ),
            None => format!("Failed to analyze engagements from {}", path.display()),
        })?;
    let stats = CareerStats::from_analysis(engagements.len(), &analysis);

    if output.is_verbose() {
        for engagement in engagements {
            if let Ok(months) = engagement.duration_months() {
                output.verbose_ctx(
                    "analyze",
                    &format!(
                        "{}: {} ~ {} ({}개월)",
                        engagement.name, engagement.start_month, engagement.end_month, months
                    ),
                );
            }
        }
        output.verbose_ctx(
            "analyze",
            &format!(
                "total={} unique={} overlap={} ranges={}",
                analysis.total_months,
                analysis.unique_months,
                analysis.overlap_months,
                analysis.overlap_ranges.len()
            ),
        );
    }

    Ok((analysis, stats))
}

/// Prints career statistics and overlap ranges for a file
pub fn analyze(
    output: &Output,
    path: &Path,
    input_format: Option<InputFormat>,
    settings: &Settings,
) -> Result<()> {
    let engagements = load(output, path, input_format, settings)?;
    let (analysis, stats) = run_analysis(output, path, &engagements)?;

    if output.is_json() {
        let ranges: Vec<_> = analysis
            .overlap_ranges
            .iter()
            .map(|range| {
                serde_json::json!({
                    "start": range.start,
                    "end": range.end,
                    "months": range.len(),
                    "contributors": range.contributors,
                    "names": range.contributor_names(&engagements),
                })
            })
            .collect();

        output.data(&serde_json::json!({
            "stats": stats,
            "total_months": analysis.total_months,
            "unique_months": analysis.unique_months,
            "overlap_months": analysis.overlap_months,
            "range_months": analysis.range_months(),
            "overlap_ranges": ranges,
        }))?;
        return Ok(());
    }

    println!("경력 분석 결과 (프로젝트 {}개)", stats.total_projects);
    output.blank();
    println!(
        "총 경력 기간 (중복 포함): {} ({}개월)",
        stats.total, analysis.total_months
    );
    println!(
        "실제 경력 기간 (중복 제외): {} ({}개월)",
        stats.unique, analysis.unique_months
    );
    println!(
        "중복 기간: {} ({}개월)",
        stats.overlap(),
        analysis.overlap_months
    );
    output.blank();

    if analysis.overlap_ranges.is_empty() {
        println!("중복 구간 없음");
        return Ok(());
    }

    println!("중복 구간:");
    for (n, range) in analysis.overlap_ranges.iter().enumerate() {
        println!(
            "  구간 {}: {} ~ {} ({}개월, 프로젝트 {}개 중복) {}",
            n + 1,
            range.start,
            range.end,
            range.len(),
            range.contributors.len(),
            range.contributor_names(&engagements).join(", ")
        );
    }
    // Counted separately from the overlap period above; they differ when
    // three or more engagements share a month
    println!(
        "중복 구간에 포함된 개월수: {} ({}개월)",
        YearsMonths::from_months(analysis.range_months()),
        analysis.range_months()
    );

    Ok(())
}

/// Analyzes a file and writes the results file
pub fn export(
    output: &Output,
    path: &Path,
    input_format: Option<InputFormat>,
    options: ExportOptions,
    settings: &Settings,
) -> Result<()> {
    let engagements = load(output, path, input_format, settings)?;
    let (analysis, stats) = run_analysis(output, path, &engagements)?;

    let destination = options
        .destination
        .unwrap_or_else(|| PathBuf::from(ResultsExport::default_file_name(options.format)));
    output.verbose_ctx(
        "export",
        &format!(
            "Writing {} results to {}",
            options.format.extension(),
            destination.display()
        ),
    );

    ResultsExport {
        engagements: &engagements,
        analysis: &analysis,
        stats: &stats,
        include_ranges: options.include_ranges,
    }
    .write_to_path(&destination, options.format)?;

    output.success(&format!("Exported results to {}", destination.display()));
    Ok(())
}

//! Input sheet template
//!
//! A ready-to-fill CSV with the expected header, three example rows, room
//! for more and a short usage note that the importer stops at.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;

const HEADER: [&str; 8] = [
    "사업명",
    "시작년월",
    "종료년월",
    "기간",
    "담당업무",
    "발주처",
    "비고(기술기능)",
    "근무형태",
];

const EXAMPLES: [[&str; 7]; 3] = [
    ["프로젝트 A", "2023-04", "2023-09", "퍼블리싱", "클라이언트 A", "HTML, CSS, JavaScript", "프리랜서"],
    ["프로젝트 B", "2023-08", "2023-12", "퍼블리싱", "클라이언트 B", "HTML, CSS, JavaScript, JSP", "프리랜서"],
    ["프로젝트 C", "2024-01", "2024-05", "React 개발", "클라이언트 C", "React, TypeScript, styled-components", "프리랜서"],
];

const BLANK_ROWS: usize = 5;

const USAGE: [&str; 7] = [
    "사용법:",
    "1. 시작년월과 종료년월은 반드시 텍스트 형식으로 입력하세요",
    "2. 예시: 2023-04, 2024-12 (대시 포함, 월은 두 자리)",
    "3. 엑셀이 자동으로 날짜로 변환하지 않도록 주의하세요",
    "4. 근무형태: 프리랜서, 정규직, 계약직 등을 입력하세요",
    "5. 기간 열은 자동으로 계산됩니다",
    "6. 파일을 저장한 후 분석 명령에 전달하세요",
];

/// Default file name, dated today: `경력사항_템플릿_2024-05-01.csv`
pub fn default_file_name() -> String {
    format!("경력사항_템플릿_{}.csv", Local::now().format("%Y-%m-%d"))
}

/// Spreadsheet formula rendering a row's duration as `N년 M개월`
fn duration_formula(row: usize) -> String {
    format!(
        "=DATEDIF(B{r},C{r},\"y\")&\"년 \"&DATEDIF(B{r},C{r},\"ym\")+1&\"개월\"",
        r = row
    )
}

/// Writes the template sheet
pub fn write_template<W: Write>(writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    csv.write_record(HEADER)?;

    for (i, [name, start, end, role, client, skills, kind]) in EXAMPLES.iter().enumerate() {
        // Sheet rows are 1-based and the header occupies row 1
        let formula = duration_formula(i + 2);
        csv.write_record([*name, *start, *end, formula.as_str(), *role, *client, *skills, *kind])?;
    }

    for _ in 0..BLANK_ROWS {
        csv.write_record([""; HEADER.len()])?;
    }

    csv.write_record([""; HEADER.len()])?;
    for line in USAGE {
        csv.write_record([line])?;
    }

    csv.flush().context("Failed to write template")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::config::ImportConfig;
    use crate::storage::import::{parse_rows, read_rows};

    fn render() -> String {
        let mut buf = Vec::new();
        write_template(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn starts_with_header() {
        let text = render();
        assert!(text.starts_with("사업명,시작년월,종료년월,기간,담당업무,발주처,비고(기술기능),근무형태\n"));
    }

    #[test]
    fn formula_references_its_own_row() {
        assert_eq!(
            duration_formula(2),
            "=DATEDIF(B2,C2,\"y\")&\"년 \"&DATEDIF(B2,C2,\"ym\")+1&\"개월\""
        );
    }

    #[test]
    fn template_imports_as_its_examples() {
        let text = render();
        let rows = read_rows(text.as_bytes(), b',').unwrap();
        let report = parse_rows(&rows, &ImportConfig::default()).unwrap();

        let names: Vec<&str> = report.engagements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["프로젝트 A", "프로젝트 B", "프로젝트 C"]);
        assert!(report.skipped.is_empty());
        assert_eq!(report.engagements[2].skills, "React, TypeScript, styled-components");
    }
}

//! Output rendering: the SQL patch for collect mode and the fixed-width
//! summary table for validate mode.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::candidates::Candidate;
use crate::errors::AppError;
use crate::validation::ValidationResult;

pub const REGISTRY_TABLE: &str = "job_data_source_company";

const SUMMARY_HEADERS: [&str; 6] = ["Company", "Source", "Sample", "Status", "Base URL", "Error"];

/// Renders the insert patch. One idempotent statement per accepted company;
/// the timestamp is injected so rendering stays deterministic under test.
pub fn render_insert_statements(companies: &[Candidate], generated_at: DateTime<Utc>) -> String {
    if companies.is_empty() {
        return "-- no new companies\n".to_string();
    }

    let mut lines = vec![format!(
        "-- generated at {} UTC",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )];

    for company in companies {
        lines.push(format!(
            "INSERT IGNORE INTO {REGISTRY_TABLE} (data_source_code, reference, display_name) \
             VALUES ('{}','{}','{}');",
            company.source_code,
            escape_sql(&company.reference),
            escape_sql(&company.display_name),
        ));
    }

    lines.join("\n") + "\n"
}

pub fn write_insert_statements(
    path: &Path,
    companies: &[Candidate],
    generated_at: DateTime<Utc>,
) -> Result<(), AppError> {
    std::fs::write(path, render_insert_statements(companies, generated_at))?;
    info!(
        entries = companies.len(),
        path = %path.display(),
        "Wrote insert patch"
    );
    Ok(())
}

fn escape_sql(value: &str) -> String {
    value.replace('\'', "''")
}

/// Renders validation results as a fixed-width table. Column widths are the
/// max content width per column across header and rows; the header is
/// separated by a rule line.
pub fn render_summary_table(results: &[ValidationResult]) -> String {
    let mut rows: Vec<Vec<String>> =
        vec![SUMMARY_HEADERS.iter().map(|h| h.to_string()).collect()];
    rows.extend(results.iter().map(ValidationResult::as_row));

    let widths: Vec<usize> = (0..SUMMARY_HEADERS.len())
        .map(|col| rows.iter().map(|row| row[col].len()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for (idx, row) in rows.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect();
        out.push_str(&line.join(" | "));
        out.push('\n');
        if idx == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;

    use super::*;
    use crate::probes::{ProbeOutcome, Vendor};

    fn company(source: &str, reference: &str, display_name: &str) -> Candidate {
        Candidate {
            source_code: source.to_string(),
            reference: reference.to_string(),
            display_name: display_name.to_string(),
            extra: HashMap::new(),
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 4, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_empty_input_emits_the_no_new_companies_comment() {
        let sql = render_insert_statements(&[], generated_at());
        assert_eq!(sql, "-- no new companies\n");
    }

    #[test]
    fn test_statements_carry_timestamp_header_and_values() {
        let sql = render_insert_statements(
            &[company("greenhouse", "stripe", "Stripe")],
            generated_at(),
        );
        let lines: Vec<&str> = sql.lines().collect();
        assert_eq!(lines[0], "-- generated at 2024-05-04 12:30:00 UTC");
        assert_eq!(
            lines[1],
            "INSERT IGNORE INTO job_data_source_company \
             (data_source_code, reference, display_name) \
             VALUES ('greenhouse','stripe','Stripe');"
        );
    }

    #[test]
    fn test_single_quotes_are_doubled() {
        let sql = render_insert_statements(
            &[company("lever", "o'reilly", "O'Reilly")],
            generated_at(),
        );
        assert!(sql.contains("'o''reilly'"));
        assert!(sql.contains("'O''Reilly'"));
    }

    #[test]
    fn test_one_statement_per_company() {
        let sql = render_insert_statements(
            &[
                company("greenhouse", "stripe", "Stripe"),
                company("lever", "netflix", "Netflix"),
            ],
            generated_at(),
        );
        assert_eq!(sql.lines().count(), 3);
        assert!(sql.ends_with(";\n"));
    }

    #[test]
    fn test_write_insert_statements_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patch.sql");

        write_insert_statements(&path, &[], generated_at()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "-- no new companies\n");
    }

    fn result(company: &str, vendor: Vendor, base: &str, outcome: ProbeOutcome) -> ValidationResult {
        ValidationResult {
            company: company.to_string(),
            vendor,
            base_url: base.to_string(),
            outcome,
        }
    }

    #[test]
    fn test_summary_table_column_widths_fit_content() {
        let results = vec![
            result(
                "okx",
                Vendor::SmartRecruiters,
                "https://api.smartrecruiters.com/v1/companies/okx",
                ProbeOutcome::pass(42, 200),
            ),
            result(
                "bitget",
                Vendor::Recruitee,
                "https://bitget.recruitee.com/api",
                ProbeOutcome::denied(404),
            ),
        ];
        let table = render_summary_table(&results);
        let lines: Vec<&str> = table.lines().collect();

        // header, rule, two rows
        assert_eq!(lines.len(), 4);

        // every column is exactly as wide as its widest cell
        let header_cells: Vec<&str> = lines[0].split(" | ").collect();
        assert_eq!(header_cells[0].len(), "Company".len().max("bitget".len()));
        assert_eq!(
            header_cells[1].len(),
            "smartrecruiters".len() // widest source beats the header
        );
        assert!(lines[1].starts_with("-------"));
        assert!(lines[1].contains("-+-"));
    }

    #[test]
    fn test_summary_table_failing_row_shows_status_code() {
        let results = vec![result(
            "bitget",
            Vendor::Workable,
            "https://apply.workable.com/api/v3/accounts/bitget",
            ProbeOutcome::denied(404),
        )];
        let table = render_summary_table(&results);
        assert!(table.contains("fail (404)"));
        assert!(table.contains("HTTP 404"));
    }

    #[test]
    fn test_summary_table_unknown_sample_renders_a_dash() {
        let results = vec![result(
            "okx",
            Vendor::SmartRecruiters,
            "base",
            ProbeOutcome::denied(500),
        )];
        let table = render_summary_table(&results);
        let row = table.lines().nth(2).unwrap();
        let cells: Vec<&str> = row.split(" | ").map(str::trim).collect();
        assert_eq!(cells[2], "-");
    }

    #[test]
    fn test_summary_table_ok_row() {
        let results = vec![result(
            "okx",
            Vendor::SmartRecruiters,
            "base",
            ProbeOutcome::pass(17, 200),
        )];
        let table = render_summary_table(&results);
        let row = table.lines().nth(2).unwrap();
        let cells: Vec<&str> = row.split(" | ").map(str::trim).collect();
        assert_eq!(cells[2], "17");
        assert_eq!(cells[3], "ok");
        assert_eq!(cells[5], "");
    }
}

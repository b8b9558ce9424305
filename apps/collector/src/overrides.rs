//! Tolerant reader for the `companyOverrides:` block of the aggregator's
//! application configuration.
//!
//! This is deliberately a narrow line scanner, not a document parser: it
//! recognizes exactly the five indentation levels the block uses and
//! ignores everything else. Malformed content degrades to partial or empty
//! results; callers rely on that leniency, so only an unreadable file is an
//! error.
//!
//! ```yaml
//! companyOverrides:
//!   okx:
//!     sources:
//!       smartrecruiters:
//!         enabled: true
//!         options:
//!           company: "okx"
//! ```

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::errors::AppError;
use crate::probes::Vendor;

const BLOCK_MARKER: &str = "companyOverrides:";
pub const OPTION_COMPANY: &str = "company";
pub const OPTION_BASE_URL: &str = "baseUrl";

/// Per-company, per-source override state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideEntry {
    pub enabled: bool,
    pub options: HashMap<String, String>,
}

impl OverrideEntry {
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// company key -> source name -> entry, in file order.
pub type OverrideMap = IndexMap<String, IndexMap<String, OverrideEntry>>;

/// One enabled override selected for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTarget {
    /// Company label for the vendor API: the `company` option if present,
    /// the override key otherwise.
    pub company: String,
    pub vendor: Vendor,
    /// `baseUrl` option, verbatim. `None` means use the vendor default.
    pub base_url: Option<String>,
}

pub fn parse_override_file(path: &Path) -> Result<OverrideMap, AppError> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        AppError::Config(format!(
            "configuration file not readable: {}: {err}",
            path.display()
        ))
    })?;
    Ok(parse_overrides(&text))
}

/// Scans the override block out of the surrounding document. State is just
/// (inside block, base indent, current company, current source); any line
/// that does not fit the expected shape at its level is skipped.
pub fn parse_overrides(text: &str) -> OverrideMap {
    let mut overrides = OverrideMap::new();
    let mut inside = false;
    let mut base_indent = 0usize;
    let mut current_company: Option<String> = None;
    let mut current_source: Option<String> = None;

    for raw_line in text.lines() {
        let stripped = raw_line.trim();

        if !inside {
            if stripped == BLOCK_MARKER {
                inside = true;
                base_indent = indent_of(raw_line);
            }
            continue;
        }

        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }

        let indent = indent_of(raw_line);
        if indent <= base_indent {
            break;
        }

        if indent == base_indent + 2 {
            if let Some(company) = stripped.strip_suffix(':') {
                current_company = Some(company.to_string());
                overrides.entry(company.to_string()).or_default();
                current_source = None;
            }
            continue;
        }

        let Some(company) = current_company.clone() else {
            continue;
        };

        if indent == base_indent + 4 {
            if stripped == "sources:" {
                current_source = None;
            }
            continue;
        }

        if indent == base_indent + 6 {
            if let Some(source) = stripped.strip_suffix(':') {
                current_source = Some(source.to_string());
                overrides
                    .entry(company)
                    .or_default()
                    .entry(source.to_string())
                    .or_default();
            }
            continue;
        }

        let Some(source) = current_source.clone() else {
            continue;
        };

        if indent == base_indent + 8 {
            if let Some(value) = stripped.strip_prefix("enabled:") {
                if let Some(entry) = entry_mut(&mut overrides, &company, &source) {
                    entry.enabled = value.trim().eq_ignore_ascii_case("true");
                }
            }
            // "options:" itself carries no data; pairs follow at a deeper
            // indent.
            continue;
        }

        if indent >= base_indent + 10 {
            if let Some((key, value)) = stripped.split_once(':') {
                if let Some(entry) = entry_mut(&mut overrides, &company, &source) {
                    entry.options.insert(
                        key.trim().to_string(),
                        value.trim().trim_matches('"').to_string(),
                    );
                }
            }
        }
    }

    overrides
}

/// Selects the enabled overrides that point at a vendor with a sampling
/// endpoint, optionally restricted to a company filter (case-insensitive
/// match on the override key).
pub fn validation_targets(config: &OverrideMap, companies: &[String]) -> Vec<ValidationTarget> {
    let requested: Vec<String> = companies.iter().map(|c| c.to_lowercase()).collect();

    let mut targets = Vec::new();
    for (company_key, sources) in config {
        if !requested.is_empty() && !requested.contains(&company_key.to_lowercase()) {
            continue;
        }
        for (source_name, entry) in sources {
            let Some(vendor) = Vendor::from_code(source_name) else {
                debug!(source = %source_name, "override source has no known vendor");
                continue;
            };
            if !vendor.supports_sampling() || !entry.enabled {
                continue;
            }
            let company = entry
                .option(OPTION_COMPANY)
                .unwrap_or(company_key.as_str())
                .to_string();
            targets.push(ValidationTarget {
                company,
                vendor,
                base_url: entry.option(OPTION_BASE_URL).map(str::to_string),
            });
        }
    }
    targets
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn entry_mut<'a>(
    overrides: &'a mut OverrideMap,
    company: &str,
    source: &str,
) -> Option<&'a mut OverrideEntry> {
    overrides.get_mut(company)?.get_mut(source)
}

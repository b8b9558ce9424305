//! Candidate company loading. The candidate file is a YAML document keyed
//! by data source code:
//!
//! ```yaml
//! greenhouse:
//!   - reference: stripe
//!     display_name: Stripe
//! lever:
//!   - reference: netflix
//! ```

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::errors::AppError;

/// A company proposed for registry inclusion. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source_code: String,
    pub reference: String,
    pub display_name: String,
    pub extra: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct CandidateEntry {
    reference: String,
    display_name: Option<String>,
    #[serde(default)]
    extra: HashMap<String, String>,
}

/// Loads candidates in file order: source blocks first, entries within each
/// block second. Reconciliation preserves this order in its output.
pub fn load_candidates(path: &Path) -> Result<Vec<Candidate>, AppError> {
    let text = std::fs::read_to_string(path).map_err(|err| AppError::Candidates {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    parse_candidates(&text).map_err(|err| AppError::Candidates {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn parse_candidates(text: &str) -> Result<Vec<Candidate>, serde_yaml::Error> {
    let raw: IndexMap<String, Option<Vec<CandidateEntry>>> = serde_yaml::from_str(text)?;

    let mut result = Vec::new();
    for (source_code, entries) in raw {
        for entry in entries.unwrap_or_default() {
            let display_name = entry
                .display_name
                .unwrap_or_else(|| entry.reference.clone());
            result.push(Candidate {
                source_code: source_code.clone(),
                reference: entry.reference,
                display_name,
                extra: entry.extra,
            });
        }
    }
    Ok(result)
}

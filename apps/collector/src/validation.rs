//! Validate mode: sample every enabled SmartRecruiters/Workable/Recruitee
//! override and report per-source health.

use std::path::Path;

use futures::stream::{self, StreamExt};
use tracing::info;

use crate::errors::AppError;
use crate::overrides::{parse_override_file, validation_targets, ValidationTarget};
use crate::probes::{validators, ProbeClient, ProbeOutcome, Vendor};

/// Outcome of sampling one override.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub company: String,
    pub vendor: Vendor,
    /// The base URL actually used: override when present, vendor default
    /// otherwise.
    pub base_url: String,
    pub outcome: ProbeOutcome,
}

impl ValidationResult {
    pub fn as_row(&self) -> Vec<String> {
        let status = if self.outcome.success {
            "ok".to_string()
        } else {
            format!("fail ({})", self.outcome.status)
        };
        let sample = if self.outcome.sample >= 0 {
            self.outcome.sample.to_string()
        } else {
            "-".to_string()
        };
        vec![
            self.company.clone(),
            self.vendor.code().to_string(),
            sample,
            status,
            self.base_url.clone(),
            self.outcome.error.clone().unwrap_or_default(),
        ]
    }
}

/// Parses the override block and samples every selected target. Only an
/// unreadable configuration file is an error; per-target failures land in
/// the result list.
pub async fn run(
    config_path: &Path,
    companies: &[String],
    client: &ProbeClient,
    concurrency: usize,
) -> Result<Vec<ValidationResult>, AppError> {
    let overrides = parse_override_file(config_path)?;
    let targets = validation_targets(&overrides, companies);
    info!(targets = targets.len(), "Validating enabled overrides");

    let results = stream::iter(targets)
        .map(|target| validate_target(client, target))
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    Ok(results.into_iter().flatten().collect())
}

async fn validate_target(
    client: &ProbeClient,
    target: ValidationTarget,
) -> Option<ValidationResult> {
    let base_url = target
        .base_url
        .clone()
        .unwrap_or_else(|| validators::default_base(target.vendor, &target.company));
    let outcome = validators::sample(client, target.vendor, &base_url).await?;
    Some(ValidationResult {
        company: target.company,
        vendor: target.vendor,
        base_url,
        outcome,
    })
}

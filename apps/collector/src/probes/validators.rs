//! Existence samplers used by override validation: ask each vendor for a
//! single posting and judge the board live iff it returned evidence of at
//! least one. No relevance matching here, the question is "is this board
//! wired up at all", not "is it hiring engineers".

use serde::Deserialize;

use super::{Fetched, ProbeClient, ProbeOutcome, Vendor};

#[derive(Debug, Deserialize)]
struct PostingsEnvelope {
    #[serde(default, rename = "totalFound")]
    total_found: i64,
}

#[derive(Debug, Deserialize)]
struct JobsEnvelope {
    #[serde(default)]
    jobs: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OffersEnvelope {
    #[serde(default)]
    offers: Vec<serde_json::Value>,
}

/// Default API base for a company on a vendor, used when the override block
/// does not carry a `baseUrl` option.
pub fn default_base(vendor: Vendor, company: &str) -> String {
    match vendor {
        Vendor::SmartRecruiters => {
            format!("https://api.smartrecruiters.com/v1/companies/{company}")
        }
        Vendor::Workable => format!("https://apply.workable.com/api/v3/accounts/{company}"),
        Vendor::Recruitee => format!("https://{company}.recruitee.com/api"),
        // Board-scan vendors have their URLs built inside their probes.
        Vendor::Greenhouse => format!("https://boards-api.greenhouse.io/v1/boards/{company}"),
        Vendor::Lever => format!("https://api.lever.co/v0/postings/{company}"),
    }
}

/// Runs the sample request for a vendor. `None` for vendors without a
/// sampling endpoint (they are scanned, not sampled).
pub async fn sample(client: &ProbeClient, vendor: Vendor, base: &str) -> Option<ProbeOutcome> {
    match vendor {
        Vendor::SmartRecruiters => Some(sample_smartrecruiters(client, base).await),
        Vendor::Workable => Some(sample_workable(client, base).await),
        Vendor::Recruitee => Some(sample_recruitee(client, base).await),
        Vendor::Greenhouse | Vendor::Lever => None,
    }
}

pub async fn sample_smartrecruiters(client: &ProbeClient, base: &str) -> ProbeOutcome {
    let url = format!("{}/postings", base.trim_end_matches('/'));
    match client
        .get_json::<PostingsEnvelope>(&url, &single_item_query())
        .await
    {
        Ok(Fetched::Body { status, payload }) => {
            if payload.total_found > 0 {
                ProbeOutcome::pass(payload.total_found, status)
            } else {
                ProbeOutcome::no_match(status, "no postings returned")
            }
        }
        Ok(Fetched::Denied { status }) => ProbeOutcome::denied(status),
        Err(err) => ProbeOutcome::transport(&err),
    }
}

pub async fn sample_workable(client: &ProbeClient, base: &str) -> ProbeOutcome {
    let url = format!("{}/jobs", base.trim_end_matches('/'));
    match client
        .get_json::<JobsEnvelope>(&url, &single_item_query())
        .await
    {
        Ok(Fetched::Body { status, payload }) => {
            if payload.jobs.is_empty() {
                ProbeOutcome::no_match(status, "no jobs returned")
            } else {
                ProbeOutcome::pass(payload.jobs.len() as i64, status)
            }
        }
        Ok(Fetched::Denied { status }) => ProbeOutcome::denied(status),
        Err(err) => ProbeOutcome::transport(&err),
    }
}

pub async fn sample_recruitee(client: &ProbeClient, base: &str) -> ProbeOutcome {
    let url = format!("{}/offers/", base.trim_end_matches('/'));
    match client
        .get_json::<OffersEnvelope>(&url, &single_item_query())
        .await
    {
        Ok(Fetched::Body { status, payload }) => {
            if payload.offers.is_empty() {
                ProbeOutcome::no_match(status, "no offers returned")
            } else {
                ProbeOutcome::pass(payload.offers.len() as i64, status)
            }
        }
        Ok(Fetched::Denied { status }) => ProbeOutcome::denied(status),
        Err(err) => ProbeOutcome::transport(&err),
    }
}

fn single_item_query() -> [(&'static str, String); 1] {
    [("limit", "1".to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bases_per_vendor() {
        assert_eq!(
            default_base(Vendor::SmartRecruiters, "okx"),
            "https://api.smartrecruiters.com/v1/companies/okx"
        );
        assert_eq!(
            default_base(Vendor::Workable, "bitget"),
            "https://apply.workable.com/api/v3/accounts/bitget"
        );
        assert_eq!(
            default_base(Vendor::Recruitee, "kraken"),
            "https://kraken.recruitee.com/api"
        );
    }

    #[test]
    fn test_postings_envelope_reads_camel_case_total() {
        let parsed: PostingsEnvelope =
            serde_json::from_str(r#"{"totalFound": 42, "content": []}"#).unwrap();
        assert_eq!(parsed.total_found, 42);
    }

    #[test]
    fn test_jobs_envelope_defaults_to_empty() {
        let parsed: JobsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(parsed.jobs.is_empty());
    }

    #[test]
    fn test_offers_envelope_counts_items() {
        let parsed: OffersEnvelope =
            serde_json::from_str(r#"{"offers": [{"id": 1}, {"id": 2}]}"#).unwrap();
        assert_eq!(parsed.offers.len(), 2);
    }
}

//! Lever postings probe. In JSON mode the API returns a bare array; the
//! posting title lives in the `text` field.

use serde::Deserialize;
use tracing::debug;

use super::{Fetched, ProbeClient, ProbeOutcome};
use crate::relevance::RoleMatcher;

const POSTINGS_API: &str = "https://api.lever.co/v0/postings";

#[derive(Debug, Deserialize)]
struct Posting {
    #[serde(default)]
    text: String,
}

pub async fn probe(client: &ProbeClient, matcher: &RoleMatcher, slug: &str) -> ProbeOutcome {
    let url = format!("{POSTINGS_API}/{slug}");
    let query = [("mode", "json".to_string())];
    match client.get_json::<Vec<Posting>>(&url, &query).await {
        Ok(Fetched::Body { status, payload }) => outcome(matcher, &payload, status),
        Ok(Fetched::Denied { status }) => {
            debug!(slug, status, "lever postings denied");
            ProbeOutcome::denied(status)
        }
        Err(err) => ProbeOutcome::transport(&err),
    }
}

fn outcome(matcher: &RoleMatcher, postings: &[Posting], status: u16) -> ProbeOutcome {
    let matched = postings
        .iter()
        .filter(|posting| matcher.matches(&posting.text))
        .count() as i64;
    if matched > 0 {
        ProbeOutcome::pass(matched, status)
    } else {
        ProbeOutcome::no_match(status, "no matching titles")
    }
}

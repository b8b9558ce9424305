//! Greenhouse board probe: one request, no pagination. The boards API
//! returns every published job in a single envelope.

use serde::Deserialize;
use tracing::debug;

use super::{Fetched, ProbeClient, ProbeOutcome};
use crate::relevance::RoleMatcher;

const BOARDS_API: &str = "https://boards-api.greenhouse.io/v1/boards";

#[derive(Debug, Deserialize)]
struct Board {
    #[serde(default)]
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
struct Job {
    #[serde(default)]
    title: String,
}

pub async fn probe(client: &ProbeClient, matcher: &RoleMatcher, slug: &str) -> ProbeOutcome {
    let url = format!("{BOARDS_API}/{slug}/jobs");
    match client.get_json::<Board>(&url, &[]).await {
        Ok(Fetched::Body { status, payload }) => outcome(matcher, &payload, status),
        Ok(Fetched::Denied { status }) => {
            debug!(slug, status, "greenhouse board denied");
            ProbeOutcome::denied(status)
        }
        Err(err) => ProbeOutcome::transport(&err),
    }
}

fn outcome(matcher: &RoleMatcher, board: &Board, status: u16) -> ProbeOutcome {
    let matched = board
        .jobs
        .iter()
        .filter(|job| matcher.matches(&job.title))
        .count() as i64;
    if matched > 0 {
        ProbeOutcome::pass(matched, status)
    } else {
        ProbeOutcome::no_match(status, "no matching titles")
    }
}

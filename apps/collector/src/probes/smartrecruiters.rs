//! SmartRecruiters postings probe. The only paginated vendor: postings come
//! in pages of up to 50 with a `paging` envelope, and the scan stops the
//! moment a page contains a relevant title.
//!
//! The page loop is written against [`PostingPages`] so the termination
//! rules (server-reported limits, early exit) are unit-testable without a
//! live endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{Fetched, ProbeClient, ProbeError, ProbeOutcome};
use crate::relevance::RoleMatcher;

const COMPANIES_API: &str = "https://api.smartrecruiters.com/v1/companies";
pub const PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct PostingsPage {
    #[serde(default)]
    pub content: Vec<Posting>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Posting {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default, rename = "totalElements")]
    pub total_elements: u64,
}

/// One page of postings at a requested offset. Implemented over HTTP in
/// production and by in-memory stubs in tests.
#[async_trait]
pub trait PostingPages {
    async fn page(&self, offset: u64, limit: u64) -> Result<Fetched<PostingsPage>, ProbeError>;
}

struct HttpPostingPages<'a> {
    client: &'a ProbeClient,
    slug: &'a str,
}

#[async_trait]
impl PostingPages for HttpPostingPages<'_> {
    async fn page(&self, offset: u64, limit: u64) -> Result<Fetched<PostingsPage>, ProbeError> {
        let url = format!("{COMPANIES_API}/{}/postings", self.slug);
        let query = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        self.client.get_json(&url, &query).await
    }
}

pub async fn probe(client: &ProbeClient, matcher: &RoleMatcher, slug: &str) -> ProbeOutcome {
    let outcome = scan(&HttpPostingPages { client, slug }, matcher).await;
    debug!(slug, success = outcome.success, "smartrecruiters scan finished");
    outcome
}

/// Walks pages until a title matches or the server-reported window is
/// exhausted. The next offset is derived from the paging the server sent
/// back, not the requested limit, so server-side clamping cannot loop or
/// skip postings.
pub async fn scan<P: PostingPages + ?Sized>(pages: &P, matcher: &RoleMatcher) -> ProbeOutcome {
    let mut offset = 0u64;
    loop {
        match pages.page(offset, PAGE_SIZE).await {
            Ok(Fetched::Body { status, payload }) => {
                let matched = payload
                    .content
                    .iter()
                    .filter(|posting| matcher.matches(&posting.name))
                    .count() as i64;
                if matched > 0 {
                    return ProbeOutcome::pass(matched, status);
                }

                let paging = &payload.paging;
                let limit = if paging.limit == 0 {
                    payload.content.len() as u64
                } else {
                    paging.limit
                };
                if limit == 0 || paging.offset + limit >= paging.total_elements {
                    return ProbeOutcome::no_match(status, "no matching titles");
                }
                offset = paging.offset + limit;
            }
            Ok(Fetched::Denied { status }) => return ProbeOutcome::denied(status),
            Err(err) => return ProbeOutcome::transport(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serves a fixed page sequence and records every requested offset.
    struct StubPages {
        pages: Vec<PostingsPage>,
        requests: Mutex<Vec<(u64, u64)>>,
    }

    impl StubPages {
        fn new(pages: Vec<PostingsPage>) -> Self {
            Self {
                pages,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(u64, u64)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PostingPages for StubPages {
        async fn page(
            &self,
            offset: u64,
            limit: u64,
        ) -> Result<Fetched<PostingsPage>, ProbeError> {
            let mut requests = self.requests.lock().unwrap();
            requests.push((offset, limit));
            let page = self.pages[requests.len() - 1].clone();
            Ok(Fetched::Body {
                status: 200,
                payload: page,
            })
        }
    }

    fn page(titles: &[&str], offset: u64, limit: u64, total: u64) -> PostingsPage {
        PostingsPage {
            content: titles
                .iter()
                .map(|t| Posting {
                    name: t.to_string(),
                })
                .collect(),
            paging: Paging {
                offset,
                limit,
                total_elements: total,
            },
        }
    }

    #[tokio::test]
    async fn test_two_pages_without_match_issue_exactly_two_requests() {
        let titles_a: Vec<&str> = vec!["Sales Lead"; 50];
        let titles_b: Vec<&str> = vec!["Account Manager"; 25];
        let stub = StubPages::new(vec![
            page(&titles_a, 0, 50, 75),
            page(&titles_b, 50, 25, 75),
        ]);

        let outcome = scan(&stub, &RoleMatcher::default()).await;

        assert!(!outcome.success);
        assert_eq!(stub.requests(), vec![(0, 50), (50, 50)]);
    }

    #[tokio::test]
    async fn test_match_on_first_page_stops_the_scan() {
        let stub = StubPages::new(vec![
            page(&["Software Engineer II"], 0, 50, 75),
            page(&["never fetched"], 50, 25, 75),
        ]);

        let outcome = scan(&stub, &RoleMatcher::default()).await;

        assert!(outcome.success);
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_next_offset_follows_server_clamped_limit() {
        // Requested 50, server clamps to 20: the second request must start
        // at 20, not 50.
        let stub = StubPages::new(vec![
            page(&["Barista"], 0, 20, 30),
            page(&["Cook"], 20, 10, 30),
        ]);

        let outcome = scan(&stub, &RoleMatcher::default()).await;

        assert!(!outcome.success);
        assert_eq!(stub.requests(), vec![(0, 50), (20, 50)]);
    }

    #[tokio::test]
    async fn test_missing_limit_falls_back_to_page_length() {
        let mut first = page(&["Waiter", "Cleaner"], 0, 0, 3);
        first.paging.limit = 0;
        let stub = StubPages::new(vec![first, page(&["Chef"], 2, 1, 3)]);

        let outcome = scan(&stub, &RoleMatcher::default()).await;

        assert!(!outcome.success);
        assert_eq!(stub.requests(), vec![(0, 50), (2, 50)]);
    }

    #[tokio::test]
    async fn test_empty_board_terminates_without_looping() {
        let stub = StubPages::new(vec![page(&[], 0, 0, 0)]);

        let outcome = scan(&stub, &RoleMatcher::default()).await;

        assert!(!outcome.success);
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_match_on_second_page_passes() {
        let titles_a: Vec<&str> = vec!["Sales Lead"; 50];
        let stub = StubPages::new(vec![
            page(&titles_a, 0, 50, 75),
            page(&["DevOps Engineer"], 50, 25, 75),
        ]);

        let outcome = scan(&stub, &RoleMatcher::default()).await;

        assert!(outcome.success);
        assert_eq!(outcome.sample, 1);
        assert_eq!(stub.requests().len(), 2);
    }

    #[test]
    fn test_paging_envelope_deserializes_camel_case_total() {
        let parsed: PostingsPage = serde_json::from_str(
            r#"{"content": [{"name": "QA"}], "paging": {"offset": 0, "limit": 50, "totalElements": 120}}"#,
        )
        .unwrap();
        assert_eq!(parsed.paging.total_elements, 120);
        assert_eq!(parsed.content.len(), 1);
    }
}

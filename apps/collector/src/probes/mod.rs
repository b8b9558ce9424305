//! Vendor probes: the single point of contact with ATS vendor APIs.
//!
//! Every probe yields a `ProbeOutcome` and never an error: a non-2xx
//! response, a timeout, or a malformed body is a normal "board not
//! reachable" result for one candidate, not a reason to abort the batch.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::candidates::Candidate;
use crate::relevance::RoleMatcher;

pub mod greenhouse;
pub mod lever;
pub mod smartrecruiters;
pub mod validators;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
const USER_AGENT: &str = concat!("jobsource-collector/", env!("CARGO_PKG_VERSION"));

/// The closed set of ATS vendors this tool knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Greenhouse,
    Lever,
    SmartRecruiters,
    Workable,
    Recruitee,
}

impl Vendor {
    /// Parses a wire identifier as used in the registry, the candidate file
    /// and the override block. Anything else is an unknown source.
    pub fn from_code(code: &str) -> Option<Vendor> {
        match code {
            "greenhouse" => Some(Vendor::Greenhouse),
            "lever" => Some(Vendor::Lever),
            "smartrecruiters" => Some(Vendor::SmartRecruiters),
            "workable" => Some(Vendor::Workable),
            "recruitee" => Some(Vendor::Recruitee),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Vendor::Greenhouse => "greenhouse",
            Vendor::Lever => "lever",
            Vendor::SmartRecruiters => "smartrecruiters",
            Vendor::Workable => "workable",
            Vendor::Recruitee => "recruitee",
        }
    }

    /// Vendors that expose a cheap single-item sample endpoint, used by the
    /// override validation path.
    pub fn supports_sampling(self) -> bool {
        matches!(
            self,
            Vendor::SmartRecruiters | Vendor::Workable | Vendor::Recruitee
        )
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Transport-level probe failure. Stays local to this module: callers see a
/// failed `ProbeOutcome`, never this error.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("http transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON body: {0}")]
    Body(#[from] serde_json::Error),
}

/// Result of probing one vendor for one company.
///
/// `status` is the HTTP status code, or -1 when the request never produced
/// one (timeout, refused connection). `sample` is the evidence behind the
/// outcome: matched-title count for relevance probes, returned-sample size
/// or server-reported total for existence probes, -1 when unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub success: bool,
    pub sample: i64,
    pub status: i32,
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn pass(sample: i64, status: u16) -> Self {
        Self {
            success: true,
            sample,
            status: i32::from(status),
            error: None,
        }
    }

    /// The vendor answered but nothing qualified.
    pub fn no_match(status: u16, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            sample: 0,
            status: i32::from(status),
            error: Some(detail.into()),
        }
    }

    /// Non-2xx response: company not found or API unavailable.
    pub fn denied(status: u16) -> Self {
        Self {
            success: false,
            sample: -1,
            status: i32::from(status),
            error: Some(format!("HTTP {status}")),
        }
    }

    /// The request never completed or the body was not parseable.
    pub fn transport(err: &ProbeError) -> Self {
        Self {
            success: false,
            sample: -1,
            status: -1,
            error: Some(err.to_string()),
        }
    }
}

/// A successfully issued GET, classified by status class.
#[derive(Debug)]
pub enum Fetched<T> {
    /// 2xx with a decoded body.
    Body { status: u16, payload: T },
    /// Anything else; the body is not consulted.
    Denied { status: u16 },
}

/// Thin reqwest wrapper shared by all probes: bounded per-request timeout,
/// stable user-agent, JSON decoding split out from status handling so
/// malformed bodies are distinguishable from unreachable boards.
#[derive(Clone)]
pub struct ProbeClient {
    client: Client,
}

impl ProbeClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Fetched<T>, ProbeError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Ok(Fetched::Denied {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload = serde_json::from_str(&body)?;
        Ok(Fetched::Body {
            status: status.as_u16(),
            payload,
        })
    }
}

impl Default for ProbeClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

/// Uniform probe interface over the non-uniform vendor APIs. Reconciliation
/// is written against this trait so tests can inject deterministic stubs.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, vendor: Vendor, candidate: &Candidate) -> ProbeOutcome;
}

/// The production prober: dispatches per vendor over HTTP.
///
/// Greenhouse/Lever/SmartRecruiters boards are scanned for role-relevant
/// titles; Workable/Recruitee only expose sample endpoints, so candidates
/// there pass on board existence alone.
pub struct HttpProber {
    client: ProbeClient,
    matcher: RoleMatcher,
}

impl HttpProber {
    pub fn new(client: ProbeClient, matcher: RoleMatcher) -> Self {
        Self { client, matcher }
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, vendor: Vendor, candidate: &Candidate) -> ProbeOutcome {
        let reference = candidate.reference.as_str();
        debug!(vendor = %vendor, reference, "issuing probe");

        match vendor {
            Vendor::Greenhouse => greenhouse::probe(&self.client, &self.matcher, reference).await,
            Vendor::Lever => lever::probe(&self.client, &self.matcher, reference).await,
            Vendor::SmartRecruiters => {
                smartrecruiters::probe(&self.client, &self.matcher, reference).await
            }
            Vendor::Workable => {
                let base = validators::default_base(Vendor::Workable, reference);
                validators::sample_workable(&self.client, &base).await
            }
            Vendor::Recruitee => {
                let base = validators::default_base(Vendor::Recruitee, reference);
                validators::sample_recruitee(&self.client, &base).await
            }
        }
    }
}

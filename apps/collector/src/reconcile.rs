//! Reconciliation: diff the candidate list against the registry and keep
//! the candidates whose boards prove out.
//!
//! Probes are independent, read-only and idempotent, so they run through a
//! bounded order-preserving stream; each candidate's outcome is computed
//! without looking at any other's.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::candidates::Candidate;
use crate::db::ExistingSet;
use crate::probes::{Probe, Vendor};

/// Partitions candidates into accepted (new and probed successfully) and
/// rejected, returning the accepted subset in input order.
///
/// A candidate whose `(source, lowercased reference)` is already tracked is
/// skipped without a probe. A candidate with an unrecognized source code is
/// rejected without a probe. Everything else is accepted iff its probe
/// outcome is a success; probe failures never abort the batch.
pub async fn reconcile(
    existing: &ExistingSet,
    candidates: &[Candidate],
    prober: &dyn Probe,
    concurrency: usize,
) -> Vec<Candidate> {
    let decisions: Vec<Option<Candidate>> = stream::iter(candidates)
        .map(|candidate| async move {
            let key = (
                candidate.source_code.clone(),
                candidate.reference.to_lowercase(),
            );
            if existing.contains(&key) {
                info!(
                    source = %candidate.source_code,
                    reference = %candidate.reference,
                    "already tracked, skipping"
                );
                return None;
            }

            let Some(vendor) = Vendor::from_code(&candidate.source_code) else {
                warn!(
                    source = %candidate.source_code,
                    reference = %candidate.reference,
                    "unsupported data source"
                );
                return None;
            };

            let outcome = prober.probe(vendor, candidate).await;
            info!(
                source = %candidate.source_code,
                reference = %candidate.reference,
                success = outcome.success,
                status = outcome.status,
                "probe finished"
            );
            if outcome.success {
                Some(candidate.clone())
            } else {
                if let Some(detail) = &outcome.error {
                    warn!(
                        source = %candidate.source_code,
                        reference = %candidate.reference,
                        detail,
                        "probe rejected candidate"
                    );
                }
                None
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    decisions.into_iter().flatten().collect()
}

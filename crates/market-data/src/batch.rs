//! Concurrent fan-out for batch lookups.
//!
//! Every item runs on its own tokio task so one item's blocking I/O never
//! serializes behind another's, and one item's failure never aborts its
//! siblings. No ordering is guaranteed across outcomes; every input is
//! accounted for exactly once.

use std::future::Future;

use log::error;

use crate::errors::MarketDataError;

/// One failed batch item, tagged with the key that produced it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchError {
    pub key: String,
    pub error: String,
}

/// Collected outcomes of a batch run.
#[derive(Debug)]
pub struct BatchOutcome<T> {
    pub results: Vec<T>,
    pub errors: Vec<BatchError>,
}

/// Run `op` for every item concurrently and collect per-item outcomes.
///
/// `Ok(Some(value))` lands in `results`; `Ok(None)` becomes an error entry
/// with the synthetic `not_found` message; an `Err` or a panicked task
/// becomes an error entry with the failure message.
pub async fn run_batch<T, F, Fut>(items: Vec<String>, not_found: &str, op: F) -> BatchOutcome<T>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Option<T>, MarketDataError>> + Send + 'static,
{
    let handles: Vec<_> = items
        .into_iter()
        .map(|item| {
            let task = tokio::spawn(op(item.clone()));
            (item, task)
        })
        .collect();

    let mut outcome = BatchOutcome {
        results: Vec::new(),
        errors: Vec::new(),
    };

    for (key, handle) in handles {
        match handle.await {
            Ok(Ok(Some(value))) => outcome.results.push(value),
            Ok(Ok(None)) => outcome.errors.push(BatchError {
                key,
                error: not_found.to_string(),
            }),
            Ok(Err(e)) => {
                error!("Batch item {} failed: {}", key, e);
                outcome.errors.push(BatchError {
                    key,
                    error: e.to_string(),
                });
            }
            Err(e) => {
                error!("Batch task for {} aborted: {}", key, e);
                outcome.errors.push(BatchError {
                    key,
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mixed_batch_accounts_for_every_item() {
        let items = vec!["ONE".to_string(), "TWO".to_string(), "THREE".to_string()];

        let outcome = run_batch(items, "not found", |item| async move {
            match item.as_str() {
                "TWO" => Err(MarketDataError::ProviderError {
                    provider: "MOCK".to_string(),
                    message: "simulated crash".to_string(),
                }),
                other => Ok(Some(other.to_string())),
            }
        })
        .await;

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].key, "TWO");
        assert!(outcome.errors[0].error.contains("simulated crash"));
    }

    #[tokio::test]
    async fn test_absent_result_becomes_not_found_error() {
        let outcome: BatchOutcome<String> =
            run_batch(vec!["MISSING".to_string()], "No quote data available", |_| async {
                Ok(None)
            })
            .await;

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].key, "MISSING");
        assert_eq!(outcome.errors[0].error, "No quote data available");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let outcome: BatchOutcome<String> =
            run_batch(Vec::new(), "not found", |_| async { Ok(None) }).await;

        assert!(outcome.results.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_panicked_item_does_not_sink_siblings() {
        let items = vec!["OK".to_string(), "BOOM".to_string()];

        let outcome = run_batch(items, "not found", |item| async move {
            if item == "BOOM" {
                panic!("poisoned item");
            }
            Ok(Some(item))
        })
        .await;

        assert_eq!(outcome.results, vec!["OK".to_string()]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].key, "BOOM");
    }
}

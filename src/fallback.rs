//! Ordered data-source pipeline
//!
//! Every lookup with a live and a bundled tier is composed as a short
//! ordered list of try-source steps; the first success wins and carries its
//! tier so callers can report provenance instead of nesting error handling.

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use crate::error::Result;

/// Which tier of the source chain produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Live,
    Bundled,
}

/// A value together with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub tier: Tier,
}

impl<T> Sourced<T> {
    pub fn is_live(&self) -> bool {
        self.tier == Tier::Live
    }
}

type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// One try-source step.
pub struct SourceStep<'a, T> {
    tier: Tier,
    fetch: SourceFuture<'a, T>,
}

impl<'a, T> SourceStep<'a, T> {
    pub fn new(tier: Tier, fetch: impl Future<Output = Result<T>> + Send + 'a) -> Self {
        Self {
            tier,
            fetch: Box::pin(fetch),
        }
    }
}

/// Await each step in order; the first `Ok` short-circuits and later steps
/// are never polled. `None` means every tier failed.
pub async fn first_success<T>(steps: Vec<SourceStep<'_, T>>) -> Option<Sourced<T>> {
    for step in steps {
        match step.fetch.await {
            Ok(value) => {
                return Some(Sourced {
                    value,
                    tier: step.tier,
                })
            }
            Err(error) => warn!("{:?} tier failed: {}", step.tier, error),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_first_success_prefers_earlier_tier() {
        let result = first_success(vec![
            SourceStep::new(Tier::Live, async { Ok(1u32) }),
            SourceStep::new(Tier::Bundled, async { Ok(2u32) }),
        ])
        .await;

        assert_eq!(
            result,
            Some(Sourced {
                value: 1,
                tier: Tier::Live
            })
        );
    }

    #[tokio::test]
    async fn test_first_success_falls_through_on_failure() {
        let result = first_success(vec![
            SourceStep::new(Tier::Live, async {
                Err::<u32, _>(EngineError::RateUnavailable("down".into()))
            }),
            SourceStep::new(Tier::Bundled, async { Ok(7u32) }),
        ])
        .await;

        assert_eq!(
            result,
            Some(Sourced {
                value: 7,
                tier: Tier::Bundled
            })
        );
    }

    #[tokio::test]
    async fn test_first_success_exhausted() {
        let result: Option<Sourced<u32>> = first_success(vec![SourceStep::new(Tier::Live, async {
            Err(EngineError::RateUnavailable("down".into()))
        })])
        .await;

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_later_steps_not_polled_after_success() {
        let touched = AtomicBool::new(false);

        let result = first_success(vec![
            SourceStep::new(Tier::Live, async { Ok(5u32) }),
            SourceStep::new(Tier::Bundled, async {
                touched.store(true, Ordering::SeqCst);
                Ok(9u32)
            }),
        ])
        .await;

        assert_eq!(result.unwrap().value, 5);
        assert!(!touched.load(Ordering::SeqCst));
    }
}

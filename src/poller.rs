//! Passive rate board
//!
//! Re-fetches live rates on a fixed interval and publishes the board on a
//! watch channel, so displays subscribe to changes instead of polling
//! ambient state. A failed poll keeps the last known values with the live
//! marker cleared. Teardown aborts the task, so a result arriving after
//! shutdown is never applied.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::RatePair;
use crate::rates::{self, ExchangeRateClient};

/// Trend samples retained for the history endpoint.
pub const HISTORY_CAPACITY: usize = 48;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RateSample {
    pub usd_ngn: f64,
    pub at: DateTime<Utc>,
}

/// The current rate display state plus its recent trend.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RateBoard {
    pub pair: RatePair,
    /// False while showing bundled or last-known values.
    pub live: bool,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<RateSample>,
}

impl RateBoard {
    fn seeded() -> Self {
        Self {
            pair: rates::fallback_pair(),
            live: false,
            updated_at: Utc::now(),
            history: Vec::new(),
        }
    }
}

pub struct RatePoller {
    handle: JoinHandle<()>,
    rx: watch::Receiver<RateBoard>,
}

impl RatePoller {
    /// Spawn the poll loop; the first tick fires immediately.
    pub fn spawn(client: ExchangeRateClient, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(RateBoard::seeded());

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                match client.fetch_pair().await {
                    Ok(pair) => {
                        info!("Rate poll succeeded: 1 USD = {} NGN", pair.usd_ngn);
                        tx.send_modify(|board| {
                            board.pair = pair;
                            board.live = true;
                            board.updated_at = Utc::now();
                            board.history.push(RateSample {
                                usd_ngn: pair.usd_ngn,
                                at: board.updated_at,
                            });
                            if board.history.len() > HISTORY_CAPACITY {
                                board.history.remove(0);
                            }
                        });
                    }
                    Err(error) => {
                        warn!("Rate poll failed, keeping last known values: {}", error);
                        tx.send_modify(|board| {
                            board.live = false;
                        });
                    }
                }
            }
        });

        Self { handle, rx }
    }

    /// Subscribe to board changes.
    pub fn subscribe(&self) -> watch::Receiver<RateBoard> {
        self.rx.clone()
    }

    /// Snapshot of the current board.
    pub fn board(&self) -> RateBoard {
        self.rx.borrow().clone()
    }

    /// Stop polling. Any in-flight fetch dies with the task.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for RatePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_board_is_bundled_and_not_live() {
        let poller = RatePoller::spawn(ExchangeRateClient::new(None), Duration::from_secs(30));

        let board = poller.board();
        assert_eq!(board.pair, rates::fallback_pair());
        assert!(!board.live);
        assert!(board.history.is_empty());

        poller.shutdown();
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_last_known_values() {
        // Unconfigured client: every poll fails.
        let poller = RatePoller::spawn(ExchangeRateClient::new(None), Duration::from_millis(10));
        let mut rx = poller.subscribe();

        // First tick publishes even on failure, with the live marker clear.
        rx.changed().await.unwrap();
        let board = rx.borrow().clone();
        assert!(!board.live);
        assert_eq!(board.pair, rates::fallback_pair());

        poller.shutdown();
    }

    #[tokio::test]
    async fn test_shutdown_stops_publishing() {
        let poller = RatePoller::spawn(ExchangeRateClient::new(None), Duration::from_millis(10));
        let mut rx = poller.subscribe();

        rx.changed().await.unwrap();
        poller.shutdown();

        // Let the abort land, then drain any update that raced with it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = rx.borrow_and_update();

        // The sender side died with the task, so no further change arrives.
        assert!(rx.changed().await.is_err());
    }
}

//! Session-aware periodic refresh of externally sourced data
//!
//! A refresh task re-fetches on a fixed period and publishes the latest value
//! on a watch channel. It tears itself down when the session expires, when
//! the session publisher goes away, or when the handle is cancelled or
//! dropped.

use crate::error::{ProjectionError, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Default period between fetches
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(5 * 60);

/// Session state as published by the authentication layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Expired,
}

/// Latest successfully fetched value
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSnapshot<T> {
    pub value: T,
    pub refreshed_at: DateTime<Utc>,
    /// Count of successful fetches, starting at 1
    pub sequence: u64,
}

/// Why a refresh task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStop {
    SessionExpired,
    /// The session publisher was dropped
    SessionClosed,
    Cancelled,
    /// The task panicked
    Aborted,
}

/// Handle to a running refresh task. Dropping it stops the task.
#[derive(Debug)]
pub struct RefreshHandle<T> {
    snapshots: watch::Receiver<Option<RefreshSnapshot<T>>>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<RefreshStop>,
}

impl<T: Clone> RefreshHandle<T> {
    /// Receiver notified on every successful fetch
    pub fn subscribe(&self) -> watch::Receiver<Option<RefreshSnapshot<T>>> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Option<RefreshSnapshot<T>> {
        self.snapshots.borrow().clone()
    }

    /// Stop the task and wait for it to finish
    pub async fn cancel(self) -> RefreshStop {
        // Fails only if the task already ended
        let _ = self.cancel.send(true);
        self.join().await
    }

    /// Wait for the task to end on its own
    pub async fn join(self) -> RefreshStop {
        let Self { task, cancel, .. } = self;
        let stop = match task.await {
            Ok(stop) => stop,
            Err(e) => {
                warn!("refresh task failed: {}", e);
                RefreshStop::Aborted
            }
        };
        drop(cancel);
        stop
    }
}

/// Spawn a refresh task on the current tokio runtime.
///
/// The first fetch happens immediately, then once per `period`. A failed
/// fetch is logged and the previous snapshot stays published. A zero period
/// is rejected.
pub fn spawn_refresh<T, E, F, Fut>(
    period: Duration,
    mut fetch: F,
    mut session: watch::Receiver<SessionState>,
) -> Result<RefreshHandle<T>>
where
    T: Send + Sync + 'static,
    E: Display + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
{
    if period.is_zero() {
        return Err(ProjectionError::InvalidConfig {
            key: "refresh_period",
            value: format!("{:?}", period),
        });
    }

    let (snapshot_tx, snapshot_rx) = watch::channel(None);
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sequence = 0u64;

        loop {
            if *session.borrow_and_update() == SessionState::Expired {
                debug!("session expired, stopping refresh");
                return RefreshStop::SessionExpired;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    match fetch().await {
                        Ok(value) => {
                            sequence += 1;
                            snapshot_tx.send_replace(Some(RefreshSnapshot {
                                value,
                                refreshed_at: Utc::now(),
                                sequence,
                            }));
                            debug!("refresh #{} published", sequence);
                        }
                        Err(e) => warn!("refresh failed, keeping previous snapshot: {}", e),
                    }
                }
                changed = session.changed() => {
                    if changed.is_err() {
                        debug!("session publisher closed, stopping refresh");
                        return RefreshStop::SessionClosed;
                    }
                }
                _ = cancel_rx.changed() => {
                    // Either an explicit cancel or the handle was dropped
                    return RefreshStop::Cancelled;
                }
            }
        }
    });

    Ok(RefreshHandle {
        snapshots: snapshot_rx,
        cancel: cancel_tx,
        task,
    })
}

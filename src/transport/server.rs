//! Axum-based listener for the peer transport.
//!
//! A single `/round` route backs both Broadcast and AllToAll: each accepts
//! contributions from a known set of sender ranks for the round currently
//! armed, and completes once every expected sender has delivered. Only one
//! round can be armed at a time per peer — `Consensus` and `MentalDeck`
//! never issue overlapping transport calls on the same node, so there is
//! never more than one live collector.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use tokio::sync::{Mutex, Notify};
use tracing::{debug, warn};

use super::codec::{RoundEnvelope, HEADER_CLOCK, HEADER_SENDER_RANK};
use super::logging::log_requests;

const LOG_TARGET: &str = "transport::server";

struct ArmedRound {
    clock: u64,
    expected_senders: BTreeSet<usize>,
    collected: BTreeMap<usize, Vec<u8>>,
}

#[derive(Default)]
struct RoundSlotInner {
    armed: Option<ArmedRound>,
}

/// The single collector a peer's listener can be waiting on at any moment.
pub struct RoundSlot {
    inner: Mutex<RoundSlotInner>,
    notify: Notify,
}

enum DeliverError {
    NotActive,
    ClockMismatch { expected: u64 },
    UnexpectedSender,
}

impl RoundSlot {
    pub fn new() -> Self {
        RoundSlot {
            inner: Mutex::new(RoundSlotInner::default()),
            notify: Notify::new(),
        }
    }

    /// Arm the slot to collect one contribution from each of
    /// `expected_senders` at round `clock`.
    pub async fn arm(&self, clock: u64, expected_senders: BTreeSet<usize>) {
        let mut guard = self.inner.lock().await;
        guard.armed = Some(ArmedRound {
            clock,
            expected_senders,
            collected: BTreeMap::new(),
        });
    }

    /// Disarm unconditionally — used when a call times out so a late
    /// arrival can't wedge a future round.
    pub async fn disarm(&self) {
        let mut guard = self.inner.lock().await;
        guard.armed = None;
    }

    /// Waits until every expected sender for the currently armed round has
    /// delivered, then returns (and clears) the collected contributions.
    pub async fn wait_for_completion(&self) -> BTreeMap<usize, Vec<u8>> {
        loop {
            let notified = self.notify.notified();
            {
                let mut guard = self.inner.lock().await;
                if let Some(armed) = &guard.armed {
                    if armed.expected_senders.is_empty() {
                        let armed = guard.armed.take().expect("checked Some above");
                        return armed.collected;
                    }
                }
            }
            notified.await;
        }
    }

    async fn try_deliver(
        &self,
        clock: u64,
        sender_rank: usize,
        payload: Vec<u8>,
    ) -> Result<(), DeliverError> {
        let mut guard = self.inner.lock().await;
        let armed = guard.armed.as_mut().ok_or(DeliverError::NotActive)?;
        if armed.clock != clock {
            return Err(DeliverError::ClockMismatch {
                expected: armed.clock,
            });
        }
        if !armed.expected_senders.remove(&sender_rank) {
            return Err(DeliverError::UnexpectedSender);
        }
        armed.collected.insert(sender_rank, payload);
        if armed.expected_senders.is_empty() {
            self.notify.notify_waiters();
        }
        Ok(())
    }
}

impl Default for RoundSlot {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ListenerState {
    pub rank: usize,
    pub slot: Arc<RoundSlot>,
}

pub fn build_router(state: Arc<ListenerState>) -> Router {
    Router::new()
        .route("/round", post(handle_round))
        .route_layer(axum::middleware::from_fn(log_requests))
        .with_state(state)
}

async fn handle_round(
    State(state): State<Arc<ListenerState>>,
    headers: HeaderMap,
    Json(envelope): Json<RoundEnvelope>,
) -> StatusCode {
    let header_clock = headers
        .get(HEADER_CLOCK)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let header_sender = headers
        .get(HEADER_SENDER_RANK)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    if header_clock != Some(envelope.clock) || header_sender != Some(envelope.sender_rank) {
        warn!(target: LOG_TARGET, "round envelope header/body mismatch");
        return StatusCode::NOT_ACCEPTABLE;
    }

    match state
        .slot
        .try_deliver(envelope.clock, envelope.sender_rank, envelope.payload)
        .await
    {
        Ok(()) => StatusCode::ACCEPTED,
        Err(DeliverError::NotActive) => {
            debug!(target: LOG_TARGET, rank = state.rank, "round arrived with no pending receive");
            StatusCode::NOT_ACCEPTABLE
        }
        Err(DeliverError::ClockMismatch { expected }) => {
            debug!(
                target: LOG_TARGET,
                rank = state.rank,
                expected,
                got = envelope.clock,
                "round clock mismatch, sender should retry"
            );
            StatusCode::NOT_ACCEPTABLE
        }
        Err(DeliverError::UnexpectedSender) => {
            warn!(
                target: LOG_TARGET,
                rank = state.rank,
                sender = envelope.sender_rank,
                "round delivery from a sender outside the expected set"
            );
            StatusCode::NOT_ACCEPTABLE
        }
    }
}

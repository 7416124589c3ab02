//! Per-peer monotonically increasing round clock.
//!
//! Incremented once per completed Broadcast/AllToAll (data phase plus its
//! trailing barrier). Two honest peers that have participated in the same
//! sequence of rounds always carry equal clocks, which is what the receive
//! handler uses to tell a same-round send from a stale or too-early one.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct PeerClock(AtomicU64);

impl PeerClock {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Advance to the next round. Called once per peer after a Broadcast or
    /// AllToAll (including its barrier) fully completes.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

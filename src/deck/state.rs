//! Per-node deck state: the 53-slot card collection, the working
//! (re-encrypted) deck, and this node's private shuffle key.

use ark_ff::Zero;

use super::group::{GroupElement, Scalar};

pub const DECK_SLOTS: usize = 53;
pub const DECK_SIZE: usize = 52;

/// This node's shuffle secret. Never shared; overwritten with zero on drop
/// since it is the one piece of key material whose leak would let a peer
/// decrypt draws that should stay hidden. `ark_ff::Fr` carries no `Zeroize`
/// impl, so the wipe is a manual `Drop` rather than the crate's usual
/// `#[derive(Zeroize)]`.
#[derive(Clone)]
pub struct ShuffleKey(pub Scalar);

impl ShuffleKey {
    pub fn scalar(&self) -> Scalar {
        self.0
    }
}

impl Drop for ShuffleKey {
    fn drop(&mut self) {
        self.0 = Scalar::zero();
    }
}

/// Per-hand deck state owned exclusively by the `GameOrchestrator`.
///
/// Slot 0 in both arrays is an unused sentinel so that card indices (1..=52)
/// line up directly with array indices, mirroring spec.md's 1-based raw
/// card numbering.
pub struct DeckState {
    pub size: usize,
    pub card_collection: [GroupElement; DECK_SLOTS],
    pub encrypted_deck: [GroupElement; DECK_SLOTS],
    pub secret_key: Option<ShuffleKey>,
    pub last_drawn: usize,
}

impl DeckState {
    pub fn empty() -> Self {
        let sentinel = super::group::generator();
        DeckState {
            size: DECK_SIZE,
            card_collection: [sentinel; DECK_SLOTS],
            encrypted_deck: [sentinel; DECK_SLOTS],
            secret_key: None,
            last_drawn: 0,
        }
    }

    pub fn reset_for_new_hand(&mut self) {
        self.last_drawn = 0;
        self.secret_key = None;
    }
}

impl Default for DeckState {
    fn default() -> Self {
        Self::empty()
    }
}

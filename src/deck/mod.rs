//! Collaborative shuffle, private draw, and joint reveal over a
//! prime-order group (spec.md §4.B). Grounded on the teacher's
//! `src/shuffling`/`src/pedersen_commitment` modules for the group-
//! arithmetic idiom, generalized to this crate's single-curve, no-ZK
//! protocol set.

pub mod draw;
pub mod errors;
pub mod group;
pub mod leave;
pub mod open;
pub mod random_element;
pub mod shuffle;
pub mod state;

use std::sync::Arc;

use rand::RngCore;

pub use draw::raw_to_suit_rank;
pub use errors::DeckError;
pub use state::{DeckState, ShuffleKey, DECK_SIZE, DECK_SLOTS};

use crate::transport::PeerTransport;

/// Per-node handle on the mental-deck protocol suite for one hand. Owns no
/// card secrets across hands: `reset_for_new_hand` wipes `secret_key` and
/// `last_drawn` so a fresh `prepare_deck` + `shuffle` starts clean.
pub struct MentalDeck<T: PeerTransport> {
    transport: Arc<T>,
    state: DeckState,
}

impl<T: PeerTransport> MentalDeck<T> {
    pub fn new(transport: Arc<T>) -> Self {
        MentalDeck {
            transport,
            state: DeckState::empty(),
        }
    }

    pub fn state(&self) -> &DeckState {
        &self.state
    }

    pub fn reset_for_new_hand(&mut self) {
        self.state.reset_for_new_hand();
    }

    /// Runs the Random-Element protocol to populate `cardCollection`.
    pub async fn prepare_deck(&mut self, rng: &mut impl RngCore) -> Result<(), DeckError> {
        self.state.card_collection =
            random_element::generate_card_collection(self.transport.as_ref(), rng).await?;
        Ok(())
    }

    /// Runs the Shuffle protocol once: every peer takes a turn permuting
    /// and re-keying, in ascending rank order.
    pub async fn shuffle(&mut self, rng: &mut impl RngCore) -> Result<(), DeckError> {
        shuffle::shuffle(self.transport.as_ref(), &mut self.state, rng).await
    }

    /// Draws the next card for `drawer`. `Some(raw)` only at the drawer's
    /// own node.
    pub async fn draw_card(&mut self, drawer: usize) -> Result<Option<u8>, DeckError> {
        draw::draw_card(self.transport.as_ref(), &mut self.state, drawer).await
    }

    /// Broadcasts `holder`'s already-drawn raw card to every peer.
    pub async fn open_card(&self, holder: usize, raw_card: Option<u8>) -> Result<u8, DeckError> {
        open::open_card(self.transport.as_ref(), holder, raw_card).await
    }

    /// Removes `leaver`'s contribution from the working deck so undrawn
    /// cards stay decryptable by the remaining peers.
    pub async fn leave(&mut self, leaver: usize) -> Result<(), DeckError> {
        leave::leave(self.transport.as_ref(), &mut self.state, leaver).await
    }

    pub fn rank(&self) -> usize {
        self.transport.rank()
    }
}

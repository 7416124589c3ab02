//! Shuffle protocol (spec.md §4.B): in ascending rank order, each peer
//! permutes and re-keys the working deck, broadcasting the result so every
//! peer ends up holding the identical, fully-shuffled ciphertext deck.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::errors::DeckError;
use super::group::{self, GroupElement, HexElement, Scalar};
use super::state::{DeckState, ShuffleKey, DECK_SIZE, DECK_SLOTS};
use crate::transport::PeerTransport;

#[derive(Serialize, Deserialize)]
struct WireDeck {
    slots: Vec<HexElement>,
}

impl WireDeck {
    fn from_slots(slots: &[GroupElement; DECK_SLOTS]) -> Self {
        WireDeck {
            slots: slots.iter().map(|e| HexElement(*e)).collect(),
        }
    }

    fn into_slots(self) -> Result<[GroupElement; DECK_SLOTS], DeckError> {
        if self.slots.len() != DECK_SLOTS {
            return Err(DeckError::IndexOutOfRange(self.slots.len()));
        }
        let mut out = [group::generator(); DECK_SLOTS];
        for (slot, element) in out.iter_mut().zip(self.slots.into_iter()) {
            *slot = element.0;
        }
        Ok(out)
    }
}

/// Runs one full pass of the Shuffle protocol: every peer in ascending rank
/// order permutes and re-keys the deck in turn, and all peers end up with
/// an identical `encryptedDeck`. `state.secret_key` is set to this node's
/// own fresh `x_j` when it is this peer's turn.
pub async fn shuffle<T: PeerTransport>(
    transport: &T,
    state: &mut DeckState,
    rng: &mut impl RngCore,
) -> Result<(), DeckError> {
    state.encrypted_deck = state.card_collection;

    for turn in 0..transport.peer_count() {
        if turn == transport.rank() {
            let mut permuted = state.encrypted_deck;
            let mut order: Vec<usize> = (1..=DECK_SIZE).collect();
            order.shuffle(rng);

            let x_j: Scalar = group::random_scalar(rng);
            for (slot_index, &source_index) in (1..=DECK_SIZE).zip(order.iter()) {
                permuted[slot_index] = state.encrypted_deck[source_index] * x_j;
            }
            state.encrypted_deck = permuted;
            state.secret_key = Some(ShuffleKey(x_j));

            let wire = WireDeck::from_slots(&state.encrypted_deck);
            let bytes = serde_json::to_vec(&wire).expect("WireDeck serialization is infallible");
            transport.broadcast(bytes, turn).await?;
        } else {
            let received = transport.broadcast(Vec::new(), turn).await?;
            let wire: WireDeck =
                serde_json::from_slice(&received).map_err(|_| DeckError::IndexOutOfRange(0))?;
            state.encrypted_deck = wire.into_slots()?;
        }
    }

    Ok(())
}

//! Draw protocol (spec.md §4.B): sequential de-blinding by every peer but
//! the drawer, followed by the drawer's own private key-strip and a linear
//! search against `cardCollection` to recover the raw card index.

use ark_ff::Field;
use serde::{Deserialize, Serialize};

use super::errors::DeckError;
use super::group::{self, GroupElement, HexElement};
use super::state::DeckState;
use crate::transport::PeerTransport;

#[derive(Serialize, Deserialize)]
struct WireElement {
    value: HexElement,
}

/// Converts a raw 1..52 card index to (suit, rank) per spec.md §3's
/// bijection: `suit = (raw-1)/13`, `rank = ((raw-1) mod 13)+1`.
pub fn raw_to_suit_rank(raw: u8) -> (u8, u8) {
    let zero_based = raw.saturating_sub(1);
    (zero_based / 13, (zero_based % 13) + 1)
}

/// Draws the next card for `drawer`. Returns `Some(raw)` (1..=52) at the
/// drawer's own node; every other node returns `None` (the face-down
/// sentinel).
pub async fn draw_card<T: PeerTransport>(
    transport: &T,
    state: &mut DeckState,
    drawer: usize,
) -> Result<Option<u8>, DeckError> {
    state.last_drawn += 1;
    if state.last_drawn > 52 {
        return Err(DeckError::IndexOutOfRange(state.last_drawn));
    }
    let mut current = state.encrypted_deck[state.last_drawn];

    for peer in 0..transport.peer_count() {
        if peer == drawer {
            continue;
        }
        if peer == transport.rank() {
            let key = state
                .secret_key
                .as_ref()
                .expect("this node's shuffle key must be set before drawing");
            let inverse = key
                .scalar()
                .inverse()
                .expect("shuffle keys are sampled nonzero in the field's prime-order subgroup");
            current = current * inverse;
            let wire = WireElement { value: current.into() };
            let bytes = serde_json::to_vec(&wire).expect("WireElement serialization is infallible");
            current = read_element(&transport.broadcast(bytes, peer).await?)?;
        } else {
            current = read_element(&transport.broadcast(Vec::new(), peer).await?)?;
        }
    }

    if transport.rank() != drawer {
        return Ok(None);
    }

    let key = state
        .secret_key
        .as_ref()
        .expect("the drawer's own shuffle key must be set before drawing");
    let inverse = key
        .scalar()
        .inverse()
        .expect("shuffle keys are sampled nonzero in the field's prime-order subgroup");
    let fully_decrypted = current * inverse;

    for (raw, candidate) in state.card_collection.iter().enumerate().skip(1) {
        if *candidate == fully_decrypted {
            return Ok(Some(raw as u8));
        }
    }
    Err(DeckError::CardNotFound)
}

fn read_element(bytes: &[u8]) -> Result<GroupElement, DeckError> {
    let wire: WireElement =
        serde_json::from_slice(bytes).map_err(|_| DeckError::IndexOutOfRange(0))?;
    Ok(wire.value.0)
}

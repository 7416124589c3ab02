//! Random-Element protocol (spec.md §4.B): collaboratively produce the 52
//! group elements of the shared `cardCollection`, with no peer able to bias
//! any individual element on its own.

use ark_ff::Zero;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::errors::DeckError;
use super::group::{self, GroupElement, HexElement, Scalar};
use super::state::{DECK_SIZE, DECK_SLOTS};
use crate::transport::PeerTransport;

#[derive(Clone, Serialize, Deserialize)]
struct FirstRoundShare {
    g: HexElement,
    g_prime: HexElement,
    h: HexElement,
}

#[derive(Clone, Serialize, Deserialize)]
struct SecondRoundShare {
    h_prime: HexElement,
}

/// Runs the two-round AllToAll exchange once, producing one agreed-upon
/// group element.
async fn agree_one_element<T: PeerTransport>(
    transport: &T,
    rng: &mut impl RngCore,
) -> Result<GroupElement, DeckError> {
    let g_j = group::random_element(rng);
    let h_j = group::random_element(rng);
    let lambda_j: Scalar = group::random_scalar(rng);
    let g_prime = g_j * lambda_j;
    let h_prime = h_j * lambda_j;

    let first = FirstRoundShare {
        g: g_j.into(),
        g_prime: g_prime.into(),
        h: h_j.into(),
    };
    let first_bytes = serde_json::to_vec(&first).expect("FirstRoundShare serialization is infallible");
    // The g/g' pair is exchanged for completeness with §4.B's protocol shape;
    // this implementation (like the spec) does not verify the λ relation —
    // that proof is explicitly out of scope.
    let _first_shares = transport.all_to_all(first_bytes).await?;

    let second = SecondRoundShare { h_prime: h_prime.into() };
    let second_bytes =
        serde_json::to_vec(&second).expect("SecondRoundShare serialization is infallible");
    let second_shares = transport.all_to_all(second_bytes).await?;

    let mut sum = GroupElement::zero();
    for (_, bytes) in second_shares {
        let share: SecondRoundShare =
            serde_json::from_slice(&bytes).map_err(|_| DeckError::CardNotFound)?;
        sum += share.h_prime.0;
    }
    Ok(sum)
}

/// Populates all 52 slots of `cardCollection`, running the protocol once
/// per slot. Slot 0 stays the sentinel.
pub async fn generate_card_collection<T: PeerTransport>(
    transport: &T,
    rng: &mut impl RngCore,
) -> Result<[GroupElement; DECK_SLOTS], DeckError> {
    let mut collection = [group::generator(); DECK_SLOTS];
    for slot in collection.iter_mut().take(DECK_SIZE + 1).skip(1) {
        *slot = agree_one_element(transport, rng).await?;
    }
    Ok(collection)
}

//! Leave protocol (spec.md §4.B): the departing peer broadcasts its
//! key-inverse; every remaining peer rewrites every slot of `encryptedDeck`
//! by that inverse so undrawn cards stay decryptable without the leaver.

use ark_ff::Field;
use serde::{Deserialize, Serialize};

use super::errors::DeckError;
use super::group::{self, Scalar};
use super::state::DeckState;
use crate::transport::PeerTransport;

#[derive(Serialize, Deserialize)]
struct WireScalar {
    value: String,
}

pub async fn leave<T: PeerTransport>(
    transport: &T,
    state: &mut DeckState,
    leaver: usize,
) -> Result<(), DeckError> {
    let payload = if transport.rank() == leaver {
        let key = state
            .secret_key
            .as_ref()
            .expect("a leaving peer must still hold its own shuffle key");
        let inverse = key
            .scalar()
            .inverse()
            .expect("shuffle keys are sampled nonzero in the field's prime-order subgroup");
        let wire = WireScalar {
            value: group::encode_scalar(&inverse),
        };
        serde_json::to_vec(&wire).expect("WireScalar serialization is infallible")
    } else {
        Vec::new()
    };

    let received = transport.broadcast(payload, leaver).await?;
    let wire: WireScalar =
        serde_json::from_slice(&received).map_err(|_| DeckError::IndexOutOfRange(0))?;
    let inverse: Scalar =
        group::decode_scalar(&wire.value).map_err(|_| DeckError::IndexOutOfRange(0))?;

    for slot in state.encrypted_deck.iter_mut().skip(1) {
        *slot = *slot * inverse;
    }

    if transport.rank() == leaver {
        state.secret_key = None;
    }

    Ok(())
}

//! Open (reveal) protocol (spec.md §4.B): a trust-the-holder broadcast of
//! the already-drawn raw card integer. The cryptographic binding lives at
//! the draw's encrypted-slot level; this step is a plain announcement.

use super::errors::DeckError;
use crate::transport::PeerTransport;

/// `holder` calls this with `Some(raw)`; every other peer calls it with
/// `None`. All peers receive the same raw card index (1..=52) back.
pub async fn open_card<T: PeerTransport>(
    transport: &T,
    holder: usize,
    raw_card: Option<u8>,
) -> Result<u8, DeckError> {
    let payload = if transport.rank() == holder {
        vec![raw_card.expect("the holder must supply the raw card it drew")]
    } else {
        Vec::new()
    };
    let received = transport.broadcast(payload, holder).await?;
    received
        .first()
        .copied()
        .ok_or(DeckError::IndexOutOfRange(0))
}

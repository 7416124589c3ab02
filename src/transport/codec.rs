//! Wire envelope for a single transport round.
//!
//! Every Broadcast/AllToAll round (and its trailing empty-payload barrier)
//! is one POST of a [`RoundEnvelope`]. The payload itself is opaque bytes —
//! callers serialize their own `Action`/`Vote`/deck-protocol JSON into it —
//! hex-encoded so the envelope is still readable JSON on the wire, matching
//! the hex-everywhere convention the rest of this crate uses for signatures
//! and hashes.

use serde::{Deserialize, Serialize};

pub const HEADER_CLOCK: &str = "Clock";
pub const HEADER_SENDER_RANK: &str = "SenderRank";
pub const HEADER_RECEIVER_RANK: &str = "ReceiverRank";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundKind {
    /// The data-carrying phase of a Broadcast or AllToAll.
    Data,
    /// The implicit empty-payload barrier that follows every data round.
    Barrier,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundEnvelope {
    pub sender_rank: usize,
    pub clock: u64,
    pub kind: RoundKind,
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
}

mod hex_bytes {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(D::Error::custom)
    }
}

use thiserror::Error;

use crate::transport::TransportError;

/// Deck-protocol failure taxonomy (spec.md §7 "Deck" row).
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("transport failure during deck protocol: {0}")]
    Transport(#[from] TransportError),

    /// The drawer's linear search over `card_collection` found no match for
    /// the fully-decrypted slot value. Per spec.md §4.B/§7 this indicates a
    /// cheating peer (or a bug) rather than a recoverable condition.
    #[error("raw card not found in card collection — cheating peer or protocol bug")]
    CardNotFound,

    #[error("deck index {0} out of range 1..=52")]
    IndexOutOfRange(usize),

    #[error("peer {0} is not a member of this hand's deck group")]
    UnknownPeer(usize),
}

//! Group arithmetic primitives shared by the mental-deck protocol.
//!
//! One prime-order cyclic group is fixed for the lifetime of a process: a
//! standard Edwards curve (`ark-ed-on-bls12-381`). Every card element,
//! blinding factor, and shuffle key lives in this group.

use std::fmt;

use ark_ec::{CurveGroup, PrimeGroup};
use ark_ed_on_bls12_381::{EdwardsProjective, Fr};
use ark_ff::UniformRand;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::RngCore;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// A point in the fixed curve group. Used for encrypted deck slots, blinding
/// contributions, and published shuffle commitments.
pub type GroupElement = EdwardsProjective;

/// A scalar over the curve's prime-order field. Used for shuffle keys,
/// permutation blinding, and the per-peer secret key `x_j`.
pub type Scalar = Fr;

pub fn generator() -> GroupElement {
    GroupElement::generator()
}

pub fn random_scalar<R: RngCore>(rng: &mut R) -> Scalar {
    Scalar::rand(rng)
}

pub fn random_element<R: RngCore>(rng: &mut R) -> GroupElement {
    generator() * random_scalar(rng)
}

/// Hex-encodes a curve point's canonical compressed form, matching the
/// wire encoding the rest of the crate uses for signatures and hashes.
pub fn encode_element(point: &GroupElement) -> String {
    let mut bytes = Vec::new();
    point
        .serialize_compressed(&mut bytes)
        .expect("curve point serialization is infallible for a fixed-size group");
    hex::encode(bytes)
}

pub fn decode_element(hex_str: &str) -> Result<GroupElement, DecodeError> {
    let bytes = hex::decode(hex_str).map_err(|_| DecodeError::BadHex)?;
    GroupElement::deserialize_compressed(&bytes[..]).map_err(|_| DecodeError::BadEncoding)
}

pub fn encode_scalar(scalar: &Scalar) -> String {
    let mut bytes = Vec::new();
    scalar
        .serialize_compressed(&mut bytes)
        .expect("scalar serialization is infallible for a fixed-size field");
    hex::encode(bytes)
}

pub fn decode_scalar(hex_str: &str) -> Result<Scalar, DecodeError> {
    let bytes = hex::decode(hex_str).map_err(|_| DecodeError::BadHex)?;
    Scalar::deserialize_compressed(&bytes[..]).map_err(|_| DecodeError::BadEncoding)
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid hex string")]
    BadHex,
    #[error("hex string does not decode to a valid curve element")]
    BadEncoding,
}

/// Wraps a [`GroupElement`] so it can be embedded directly in `serde`
/// structs as a hex string, matching the hex-everywhere convention used for
/// signatures and hashes elsewhere in the wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexElement(pub GroupElement);

impl Serialize for HexElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_element(&self.0))
    }
}

impl<'de> Deserialize<'de> for HexElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_element(&s).map(HexElement).map_err(D::Error::custom)
    }
}

impl fmt::Display for HexElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode_element(&self.0))
    }
}

impl From<GroupElement> for HexElement {
    fn from(value: GroupElement) -> Self {
        HexElement(value)
    }
}

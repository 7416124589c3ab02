pub mod chaum_pedersen;
pub mod config;
pub mod curve_absorb;
pub mod engine;
pub mod field_conversion;
pub mod field_conversion_gadget;
pub mod game;
pub mod ledger;
pub mod logup;
pub mod macros;
pub mod pedersen_commitment;
pub mod player;
pub mod showdown;
pub mod shuffler;
pub mod shuffling;
pub mod signing;
pub mod vrf;

pub mod db;
pub mod debugging_tools;

#[cfg(test)]
pub mod test_utils;

#[cfg(feature = "gpu")]
pub mod gpu;

pub use config::poseidon_config;
pub use shuffling::*;

//! PIN hashing and verification.

pub mod pin;

pub use pin::*;

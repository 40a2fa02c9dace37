//! Core types for sparse spin-chain states
//!
//! This crate provides the packed spin-configuration type shared by the
//! state engine and the operators built on top of it:
//!
//! - **`SpinConfiguration`**: a fixed 16-byte bit vector of up to 112 spins
//!   with single-instruction equality and a cheap, well-mixed hash. It is the
//!   key type of the sparse-state hash maps, so both operations sit on the
//!   hot path of every diffusion iteration.
//! - **`parse`**: small prefix-parsing helpers used by the text readers for
//!   states and Hamiltonian specifications.

pub mod error;
pub mod parse;
pub mod simd;
pub mod spin;

pub use error::{CoreError, Result};
pub use spin::{Spin, SpinConfiguration, MAX_SPINS};

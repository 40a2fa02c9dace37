//! Packed spin-1/2 configurations
//!
//! A configuration is a fixed-width bit vector of up/down spins packed into
//! a single 16-byte value: 14 payload bytes followed by a little-endian
//! `u16` length in bits. Spin `i` lives in bit `7 - (i % 8)` of byte
//! `i / 8`, so configurations print in site order. Padding bits past the
//! length are always zero, which makes equality a single 128-bit compare
//! and the hash a pure function of the value.
//!
//! Configurations are `Copy` and treated as immutable on hot paths;
//! [`SpinConfiguration::flipped`] and [`SpinConfiguration::flipped_pair`]
//! produce new values instead of mutating in place.

use crate::error::{CoreError, Result};
use crate::simd;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Maximum number of spins a packed configuration can hold
pub const MAX_SPINS: usize = PAYLOAD_BYTES * 8;

/// Number of payload bytes in the packed representation
const PAYLOAD_BYTES: usize = 14;

/// Orientation of a single spin-1/2 site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Spin {
    Down = 0,
    Up = 1,
}

impl Spin {
    /// Map a raw bit to a spin; any non-zero value is `Up`.
    #[inline]
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Spin::Down
        } else {
            Spin::Up
        }
    }

    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Spin::Down => '0',
            Spin::Up => '1',
        }
    }
}

/// A packed, fixed-width vector of spin orientations
///
/// # Example
///
/// ```
/// use spindrift_core::{Spin, SpinConfiguration};
///
/// let spin: SpinConfiguration = "0110".parse().unwrap();
/// assert_eq!(spin.size(), 4);
/// assert_eq!(spin.get(1), Spin::Up);
/// assert_eq!(spin.flipped_pair(0, 1).to_string(), "1010");
/// ```
#[derive(Clone, Copy)]
#[repr(C, align(16))]
pub struct SpinConfiguration {
    /// 14 payload bytes plus the bit length in bytes 14..16 (little endian)
    data: [u8; 16],
}

impl SpinConfiguration {
    /// Create an empty configuration of zero spins.
    #[inline]
    pub fn new() -> Self {
        Self { data: [0; 16] }
    }

    /// Create an all-down configuration of `n` spins.
    ///
    /// # Errors
    /// Returns [`CoreError::TooManySpins`] if `n` exceeds [`MAX_SPINS`].
    pub fn zeros(n: usize) -> Result<Self> {
        if n > MAX_SPINS {
            return Err(CoreError::TooManySpins {
                got: n,
                max: MAX_SPINS,
            });
        }
        let mut config = Self::new();
        config.set_len(n);
        Ok(config)
    }

    /// Create a configuration from a slice of spins.
    ///
    /// # Errors
    /// Returns [`CoreError::TooManySpins`] if the slice is longer than
    /// [`MAX_SPINS`].
    pub fn from_spins(spins: &[Spin]) -> Result<Self> {
        let mut config = Self::zeros(spins.len())?;
        for (i, &spin) in spins.iter().enumerate() {
            config.set(i, spin);
        }
        Ok(config)
    }

    /// Create a configuration from raw bit values; non-zero means up.
    ///
    /// # Errors
    /// Returns [`CoreError::TooManySpins`] if the slice is longer than
    /// [`MAX_SPINS`].
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        let mut config = Self::zeros(bits.len())?;
        for (i, &bit) in bits.iter().enumerate() {
            config.set(i, Spin::from_bit(bit));
        }
        Ok(config)
    }

    /// Number of spins in the configuration.
    #[inline]
    pub fn size(&self) -> usize {
        u16::from_le_bytes([self.data[14], self.data[15]]) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    fn set_len(&mut self, n: usize) {
        let bytes = (n as u16).to_le_bytes();
        self.data[14] = bytes[0];
        self.data[15] = bytes[1];
    }

    /// Read spin `i`.
    ///
    /// Panics if `i` is out of range; index validation is the caller's
    /// responsibility on hot paths.
    #[inline]
    pub fn get(&self, i: usize) -> Spin {
        assert!(i < self.size(), "spin index {} out of range", i);
        Spin::from_bit((self.data[i / 8] >> (7 - i % 8)) & 0x01)
    }

    /// Set spin `i` to `value`.
    #[inline]
    pub fn set(&mut self, i: usize, value: Spin) {
        assert!(i < self.size(), "spin index {} out of range", i);
        let mask = 0x01u8 << (7 - i % 8);
        match value {
            Spin::Down => self.data[i / 8] &= !mask,
            Spin::Up => self.data[i / 8] |= mask,
        }
    }

    /// Flip spin `i` in place.
    #[inline]
    pub fn flip(&mut self, i: usize) {
        assert!(i < self.size(), "spin index {} out of range", i);
        self.data[i / 8] ^= 0x01u8 << (7 - i % 8);
    }

    /// Return a copy with spin `i` flipped.
    #[inline]
    #[must_use]
    pub fn flipped(&self, i: usize) -> Self {
        let mut copy = *self;
        copy.flip(i);
        copy
    }

    /// Return a copy with spins `i` and `j` flipped.
    #[inline]
    #[must_use]
    pub fn flipped_pair(&self, i: usize, j: usize) -> Self {
        let mut copy = *self;
        copy.flip(i);
        copy.flip(j);
        copy
    }

    /// First payload byte; the shard router keys on this.
    #[inline]
    pub fn first_byte(&self) -> u8 {
        self.data[0]
    }

    /// Raw payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..PAYLOAD_BYTES]
    }

    /// Well-mixed 64-bit hash of the packed value.
    ///
    /// Combines the two 64-bit halves with the classic
    /// `h ^= x + 0x9E3779B9 + (h << 6) + (h >> 2)` mixer. Because the
    /// padding bits are zero, equal configurations always hash equally.
    #[inline]
    pub fn hash_value(&self) -> u64 {
        let (lo, hi) = simd::halves(&self.data);
        let mut h = lo;
        h ^= hi
            .wrapping_add(0x9E37_79B9)
            .wrapping_add(h << 6)
            .wrapping_add(h >> 2);
        h
    }

    /// Parse the longest `'0'`/`'1'` prefix of `input` and return the
    /// remaining input.
    ///
    /// Leading whitespace is skipped; parsing stops at the first character
    /// that is not an ASCII digit.
    ///
    /// # Errors
    /// - [`CoreError::InvalidSpinChar`] for digits other than `'0'`/`'1'`
    /// - [`CoreError::TooManySpins`] for prefixes longer than [`MAX_SPINS`]
    pub fn parse_prefix(input: &str) -> Result<(Self, &str)> {
        let rest = input.trim_start();
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits > MAX_SPINS {
            return Err(CoreError::TooManySpins {
                got: digits,
                max: MAX_SPINS,
            });
        }
        let mut config = Self::zeros(digits)?;
        for (i, c) in rest[..digits].char_indices() {
            match c {
                '0' => {}
                '1' => config.set(i, Spin::Up),
                other => return Err(CoreError::InvalidSpinChar(other)),
            }
        }
        Ok((config, &rest[digits..]))
    }

    /// Iterate over the spins in site order.
    pub fn iter(&self) -> impl Iterator<Item = Spin> + '_ {
        (0..self.size()).map(move |i| self.get(i))
    }
}

impl Default for SpinConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SpinConfiguration {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        simd::eq128(&self.data, &other.data)
    }
}

impl Eq for SpinConfiguration {}

impl Hash for SpinConfiguration {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl fmt::Display for SpinConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for spin in self.iter() {
            f.write_str(match spin {
                Spin::Down => "0",
                Spin::Up => "1",
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for SpinConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpinConfiguration(\"{}\")", self)
    }
}

impl FromStr for SpinConfiguration {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let (config, rest) = Self::parse_prefix(s)?;
        if !rest.trim_start().is_empty() {
            return Err(CoreError::TrailingInput(rest.to_string()));
        }
        Ok(config)
    }
}

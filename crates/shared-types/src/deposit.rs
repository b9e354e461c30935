//! # Genesis Deposit Values
//!
//! Typed wrappers for the deposit count and deposit root produced by the
//! genesis merge step. Raw script output never reaches a validator's
//! environment without passing through [`HexValue::parse`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Byte length of a deposit root.
pub const DEPOSIT_ROOT_SIZE: usize = 32;

/// Why a raw deposit value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepositValueError {
    /// Script printed nothing (or only whitespace).
    #[error("{field} is empty")]
    Empty { field: &'static str },

    #[error("{field} is missing the 0x prefix: {value:?}")]
    MissingPrefix { field: &'static str, value: String },

    #[error("{field} is not valid hex: {value:?}")]
    InvalidHex { field: &'static str, value: String },

    #[error("{field} must be {expected} bytes, got {actual}")]
    IncorrectLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// A `0x`-prefixed hex string that is known to decode.
///
/// Quantities such as `0x2a` may carry an odd number of nibbles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexValue(String);

impl HexValue {
    /// Validate raw script output. Trailing newline/whitespace is stripped.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, DepositValueError> {
        let value = raw.trim_end();
        if value.is_empty() {
            return Err(DepositValueError::Empty { field });
        }

        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or_else(|| DepositValueError::MissingPrefix {
                field,
                value: value.to_string(),
            })?;

        if digits.is_empty() || decode_nibbles(digits).is_none() {
            return Err(DepositValueError::InvalidHex {
                field,
                value: value.to_string(),
            });
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decoded bytes (odd nibble counts are left-padded).
    pub fn to_bytes(&self) -> Vec<u8> {
        decode_nibbles(&self.0[2..]).unwrap_or_default()
    }
}

impl fmt::Display for HexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn decode_nibbles(digits: &str) -> Option<Vec<u8>> {
    if digits.len() % 2 == 1 {
        hex::decode(format!("0{}", digits)).ok()
    } else {
        hex::decode(digits).ok()
    }
}

/// Deposit count and root computed once per network by the merge step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenesisDepositData {
    pub deposit_count: HexValue,
    pub deposit_root: HexValue,
}

impl GenesisDepositData {
    /// Validate both raw reads.
    ///
    /// With `strict_root_length` the root must decode to exactly
    /// [`DEPOSIT_ROOT_SIZE`] bytes.
    pub fn from_raw(
        count_raw: &str,
        root_raw: &str,
        strict_root_length: bool,
    ) -> Result<Self, DepositValueError> {
        let deposit_count = HexValue::parse("deposit_count", count_raw)?;
        let deposit_root = HexValue::parse("deposit_root", root_raw)?;

        if strict_root_length {
            let actual = deposit_root.to_bytes().len();
            if actual != DEPOSIT_ROOT_SIZE {
                return Err(DepositValueError::IncorrectLength {
                    field: "deposit_root",
                    expected: DEPOSIT_ROOT_SIZE,
                    actual,
                });
            }
        }

        Ok(Self {
            deposit_count,
            deposit_root,
        })
    }
}

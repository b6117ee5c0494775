//! src/core/block_height.rs
//!
//! The block height reported by a JSON-RPC node as a hex quantity.

use std::fmt;
use std::str::FromStr;

use super::errors::{CheckError, Result};

/// Index of the most recent block, decoded from a JSON-RPC hex quantity.
///
/// Kept signed so that a nonsensical negative answer is still observed and
/// judged as not positive instead of failing to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockHeight(i128);

impl BlockHeight {
    pub const fn new(height: i128) -> Self {
        Self(height)
    }

    pub const fn value(self) -> i128 {
        self.0
    }

    /// Whether the node reported any block at all.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Decodes a hex quantity such as `"0x1a2b3c"`.
    ///
    /// Accepts surrounding whitespace, an optional `+`/`-` sign, an optional
    /// `0x`/`0X` prefix and single `_` separators between digits (or right
    /// after the prefix).
    pub fn from_hex(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digits = match unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
            // "0x_1a" is valid, "_1a" is not
            Some(rest) => rest.strip_prefix('_').unwrap_or(rest),
            None => unsigned,
        };

        if digits.is_empty() {
            return Err(CheckError::invalid_hex(raw, "no digits"));
        }
        if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
            return Err(CheckError::invalid_hex(raw, "misplaced digit separator"));
        }

        let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
        if let Some(bad) = cleaned.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(CheckError::invalid_hex(raw, format!("invalid digit {bad:?}")));
        }

        let magnitude = i128::from_str_radix(&cleaned, 16)
            .map_err(|e| CheckError::invalid_hex(raw, e.to_string()))?;
        Ok(Self(if negative { -magnitude } else { magnitude }))
    }
}

impl FromStr for BlockHeight {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BlockHeight> for i128 {
    fn from(height: BlockHeight) -> Self {
        height.0
    }
}

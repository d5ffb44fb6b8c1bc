// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owned variable names.

use crate::Char16;
use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter, Write};
use core::str::FromStr;

/// A NUL-terminated UCS-2 variable name.
///
/// The gateway copies the caller's name into one of these before calling the
/// firmware, so the firmware never reads caller memory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableName(Vec<Char16>);

impl VariableName {
    /// Wraps `chars` if it ends with its only NUL.
    #[must_use]
    pub fn from_u16_with_nul(chars: Vec<Char16>) -> Option<Self> {
        match chars.iter().position(|&c| c == 0) {
            Some(nul) if nul + 1 == chars.len() => Some(Self(chars)),
            _ => None,
        }
    }

    /// The characters, terminator included.
    #[must_use]
    pub fn as_slice_with_nul(&self) -> &[Char16] {
        &self.0
    }

    /// The characters, terminator excluded.
    #[must_use]
    pub fn as_slice(&self) -> &[Char16] {
        &self.0[..self.num_chars()]
    }

    /// Number of characters, terminator excluded.
    #[must_use]
    pub fn num_chars(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Whether the name has no characters besides the terminator.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_chars() == 0
    }
}

impl FromStr for VariableName {
    type Err = ucs2::Error;

    /// Encodes `name` as UCS-2.
    ///
    /// Fails if `name` has a character outside the Basic Multilingual Plane.
    /// An interior NUL ends the name.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let mut chars = Vec::with_capacity(name.len() + 1);
        ucs2::encode_with(name, |c| {
            chars.push(c);
            Ok(())
        })?;
        if let Some(nul) = chars.iter().position(|&c| c == 0) {
            chars.truncate(nul);
        }
        chars.push(0);
        Ok(Self(chars))
    }
}

impl Display for VariableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut result = Ok(());
        // Lone surrogates decode to invalid UTF-8; print those as U+FFFD.
        let _ = ucs2::decode_with(self.as_slice(), |utf8| {
            result = match core::str::from_utf8(utf8) {
                Ok(s) => f.write_str(s),
                Err(_) => f.write_char(char::REPLACEMENT_CHARACTER),
            };
            result.map_err(|_| ucs2::Error::BufferOverflow)
        });
        result
    }
}

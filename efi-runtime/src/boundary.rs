// SPDX-License-Identifier: MIT OR Apache-2.0

//! The trust boundary between the gateway and its caller.
//!
//! The caller hands the gateway addresses and sizes. Nothing behind those
//! addresses is touched except through a [`UserMemory`] implementation, and
//! every transfer is a sized copy that either completes entirely or has no
//! effect. A transfer that cannot complete is reported as a [`Fault`] value;
//! how the host detects an inaccessible page is its own business.
//!
//! Request blocks always move as a whole, with their exact size checked
//! against the size the command declares. The only variable-length transfers
//! are the ones a block describes itself: a variable's name, read up to its
//! terminator under a length limit, and a variable's data, bounded by the
//! block's `data_size` field.

use crate::ioctl::{IoctlArg, LayoutError};
use crate::Char16;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Debug, Display, Formatter};
use core::ops::Range;
use log::trace;

/// An address in the caller's address space.
///
/// It is only ever used as a number; it is never turned into a Rust pointer.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct UserPtr(u64);

impl UserPtr {
    /// The null address.
    pub const NULL: Self = Self(0);

    /// Wraps a raw caller address.
    #[must_use]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// The raw address.
    #[must_use]
    pub const fn addr(self) -> u64 {
        self.0
    }

    /// True for the null address.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The address `bytes` past this one, or `None` if that wraps around.
    #[must_use]
    pub const fn checked_add(self, bytes: usize) -> Option<Self> {
        match self.0.checked_add(bytes as u64) {
            Some(addr) => Some(Self(addr)),
            None => None,
        }
    }
}

impl Debug for UserPtr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "UserPtr({:#x})", self.0)
    }
}

impl Display for UserPtr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A transfer across the trust boundary that could not be completed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Some byte of `addr..addr + len` is not accessible to the caller.
    Inaccessible {
        /// Start of the region.
        addr: UserPtr,
        /// Length of the region.
        len: usize,
    },

    /// The transfer size is not the exact size of the block.
    SizeMismatch {
        /// Size of the block.
        expected: usize,
        /// Size that was declared.
        actual: usize,
    },

    /// A caller-declared payload length exceeds what the gateway accepts.
    TooLarge {
        /// Declared length.
        len: u64,
        /// Largest accepted length.
        limit: usize,
    },

    /// No terminator was found within the first `limit` characters of the
    /// string at `addr`.
    Unterminated {
        /// Start of the string.
        addr: UserPtr,
        /// Longest accepted string, terminator excluded.
        limit: usize,
    },
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inaccessible { addr, len } => {
                write!(f, "{len} bytes at {addr} are not accessible")
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "transfer of {actual} bytes, block is {expected} bytes")
            }
            Self::TooLarge { len, limit } => {
                write!(f, "payload of {len} bytes exceeds the limit of {limit}")
            }
            Self::Unterminated { addr, limit } => {
                write!(f, "string at {addr} is longer than {limit} characters")
            }
        }
    }
}

impl core::error::Error for Fault {}

impl From<LayoutError> for Fault {
    fn from(err: LayoutError) -> Self {
        Self::SizeMismatch {
            expected: err.expected,
            actual: err.actual,
        }
    }
}

/// Access to the caller's memory.
///
/// Implementations must make both copies atomic: when a copy returns an
/// error, the destination is unchanged. A zero-length copy always succeeds.
pub trait UserMemory {
    /// Fills `dst` with the bytes at `src..src + dst.len()`.
    fn copy_from_user(&self, dst: &mut [u8], src: UserPtr) -> Result<(), Fault>;

    /// Writes `src` to `dst..dst + src.len()`.
    fn copy_to_user(&mut self, dst: UserPtr, src: &[u8]) -> Result<(), Fault>;

    /// Whether `addr..addr + len` can currently be written by
    /// [`copy_to_user`](Self::copy_to_user).
    ///
    /// Used to check every destination of a multi-part write before the
    /// first part is written.
    fn access_ok(&self, addr: UserPtr, len: usize) -> bool;
}

impl<M: UserMemory + ?Sized> UserMemory for &mut M {
    fn copy_from_user(&self, dst: &mut [u8], src: UserPtr) -> Result<(), Fault> {
        (**self).copy_from_user(dst, src)
    }

    fn copy_to_user(&mut self, dst: UserPtr, src: &[u8]) -> Result<(), Fault> {
        (**self).copy_to_user(dst, src)
    }

    fn access_ok(&self, addr: UserPtr, len: usize) -> bool {
        (**self).access_ok(addr, len)
    }
}

/// Caller memory that is one contiguous region starting at `base`.
///
/// Suitable for hosts that have already pinned or mapped the caller's memory
/// into the gateway's address space. The null page is never accessible.
#[derive(Debug)]
pub struct FlatMemory<'a> {
    base: u64,
    bytes: &'a mut [u8],
}

impl<'a> FlatMemory<'a> {
    /// Exposes `bytes` to the gateway as the caller addresses
    /// `base..base + bytes.len()`.
    pub fn new(base: u64, bytes: &'a mut [u8]) -> Self {
        Self { base, bytes }
    }

    /// First address of the region.
    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// The region's current contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }

    fn range(&self, addr: UserPtr, len: usize) -> Option<Range<usize>> {
        if len == 0 {
            return Some(0..0);
        }
        if addr.is_null() {
            return None;
        }
        let start = usize::try_from(addr.addr().checked_sub(self.base)?).ok()?;
        let end = start.checked_add(len)?;
        (end <= self.bytes.len()).then_some(start..end)
    }
}

impl UserMemory for FlatMemory<'_> {
    fn copy_from_user(&self, dst: &mut [u8], src: UserPtr) -> Result<(), Fault> {
        let range = self.range(src, dst.len()).ok_or(Fault::Inaccessible {
            addr: src,
            len: dst.len(),
        })?;
        dst.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn copy_to_user(&mut self, dst: UserPtr, src: &[u8]) -> Result<(), Fault> {
        let range = self.range(dst, src.len()).ok_or(Fault::Inaccessible {
            addr: dst,
            len: src.len(),
        })?;
        self.bytes[range].copy_from_slice(src);
        Ok(())
    }

    fn access_ok(&self, addr: UserPtr, len: usize) -> bool {
        self.range(addr, len).is_some()
    }
}

/// Copies a request block of type `T` in from `src`.
///
/// `size` is the block size the command declares; it must be exactly
/// `T::SIZE`.
pub fn ingest<T, M>(mem: &M, src: UserPtr, size: usize) -> Result<T, Fault>
where
    T: IoctlArg,
    M: UserMemory + ?Sized,
{
    if size != T::SIZE {
        return Err(Fault::SizeMismatch {
            expected: T::SIZE,
            actual: size,
        });
    }

    let mut bytes = vec![0; T::SIZE];
    mem.copy_from_user(&mut bytes, src)?;
    trace!("ingested {size} bytes from {src}");
    Ok(T::read_from(&bytes)?)
}

/// Copies `value` out to `dst` as a block of exactly `size` bytes.
pub fn egress<T, M>(mem: &mut M, dst: UserPtr, size: usize, value: &T) -> Result<(), Fault>
where
    T: IoctlArg,
    M: UserMemory + ?Sized,
{
    let mut bytes = vec![0; size];
    value.write_to(&mut bytes)?;
    mem.copy_to_user(dst, &bytes)?;
    trace!("egressed {size} bytes to {dst}");
    Ok(())
}

/// Copies in a payload of `len` bytes from `src`, refusing payloads longer
/// than `limit`. An empty payload is not read, so `src` may be null.
pub fn ingest_bytes<M>(mem: &M, src: UserPtr, len: u64, limit: usize) -> Result<Vec<u8>, Fault>
where
    M: UserMemory + ?Sized,
{
    let len = usize::try_from(len)
        .ok()
        .filter(|&len| len <= limit)
        .ok_or(Fault::TooLarge { len, limit })?;

    let mut bytes = vec![0; len];
    mem.copy_from_user(&mut bytes, src)?;
    Ok(bytes)
}

/// Copies in the NUL-terminated UCS-2 string at `src`.
///
/// The returned characters include the terminator. At most `max_chars`
/// characters before the terminator are accepted.
pub fn ingest_ucs2<M>(mem: &M, src: UserPtr, max_chars: usize) -> Result<Vec<Char16>, Fault>
where
    M: UserMemory + ?Sized,
{
    const CHAR_SIZE: usize = size_of::<Char16>();

    let mut chars = Vec::new();
    for index in 0..=max_chars {
        let addr = index
            .checked_mul(CHAR_SIZE)
            .and_then(|offset| src.checked_add(offset))
            .ok_or(Fault::Inaccessible {
                addr: src,
                len: usize::MAX,
            })?;

        let mut unit = [0; CHAR_SIZE];
        mem.copy_from_user(&mut unit, addr)?;
        let c = Char16::from_ne_bytes(unit);
        chars.push(c);
        if c == 0 {
            return Ok(chars);
        }
    }

    Err(Fault::Unterminated {
        addr: src,
        limit: max_chars,
    })
}

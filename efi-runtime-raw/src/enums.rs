// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integer newtypes standing in for C enums.
//!
//! Values crossing the gateway come either from firmware or from an untrusted
//! caller, and both may hand back a value that no named variant covers. A Rust
//! enum cannot hold such a value, so these types are modeled as a newtype of
//! the underlying integer with a set of associated constants.

/// Declares a newtype around an integer (or other `Copy` value) with a set of
/// named constants and a `Debug` impl that prints the constant's name.
///
/// ```ignore
/// newtype_enum! {
///     pub enum UnixBool: i32 => {
///         FALSE          =  0,
///         TRUE           =  1,
///         FILE_NOT_FOUND = -1,
///     }
/// }
/// ```
macro_rules! newtype_enum {
    (
        $(#[$type_attrs:meta])*
        $visibility:vis enum $type:ident : $base_integer:ty => $(#[$impl_attrs:meta])* {
            $(
                $(#[$variant_attrs:meta])*
                $variant:ident = $value:expr,
            )*
        }
    ) => {
        $(#[$type_attrs])*
        #[repr(transparent)]
        #[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
        $visibility struct $type(pub $base_integer);

        $(#[$impl_attrs])*
        #[allow(unused)]
        impl $type {
            $(
                $(#[$variant_attrs])*
                pub const $variant: $type = $type($value);
            )*
        }

        impl core::fmt::Debug for $type {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match *self {
                    $(
                        $type::$variant => f.write_str(stringify!($variant)),
                    )*

                    // Unknown values print in tuple struct form.
                    $type(unknown) => {
                        write!(f, "{}({:#x?})", stringify!($type), unknown)
                    }
                }
            }
        }
    }
}

//! Low-level byte order utilities for the snapshot wire format.
//!
//! All fixed-width values on the wire are big-endian. This module provides the
//! [`WireIO`] trait, a unified interface for converting primitive types to and
//! from their big-endian byte representation, plus bounds-checked cursor reads
//! and append-style writes built on top of it.
//!
//! # Key Components
//!
//! - [`WireIO`] - Trait defining big-endian conversion for primitive types
//! - [`read_be_at`] - Read a value at an offset, advancing the offset
//! - [`write_be`] - Append a value to an output buffer
//!
//! Floating point values travel as their IEEE 754 bit pattern, so `f32`/`f64`
//! implement [`WireIO`] directly.
//!
//! # Error Handling
//!
//! [`read_be_at`] returns [`crate::Error::OutOfBounds`] if there are insufficient
//! bytes left in the buffer, which is how truncated streams surface everywhere in
//! the codec.

use crate::{Error::OutOfBounds, Result};

/// Trait for type-specific big-endian binary conversion.
///
/// Implemented for all primitive integer and floating-point types that appear in
/// the snapshot wire format. Each implementation defines a `Bytes` associated
/// type representing the fixed-size byte array for that type (e.g. `[u8; 4]` for
/// `u32`).
///
/// # Thread Safety
///
/// All implementations are pure conversions over primitive types and are safe to
/// call concurrently.
pub trait WireIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read `Self` from a big-endian byte array.
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write `Self` to a big-endian byte array.
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_wire_io {
    ($($ty:ty => $len:literal),* $(,)?) => {
        $(
            impl WireIO for $ty {
                type Bytes = [u8; $len];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_wire_io! {
    u8 => 1, i8 => 1,
    u16 => 2, i16 => 2,
    u32 => 4, i32 => 4,
    u64 => 8, i64 => 8,
    f32 => 4, f64 => 8,
}

/// Safely reads a value of type `T` in big-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes read.
///
/// # Arguments
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (advanced after reading)
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
///
/// # Examples
///
/// ```rust
/// use mapdex::codec::read_be_at;
///
/// let data = [0x00, 0x01, 0x00, 0x02];
/// let mut offset = 0;
///
/// let first: u16 = read_be_at(&data, &mut offset)?;
/// let second: u16 = read_be_at(&data, &mut offset)?;
/// assert_eq!((first, second), (1, 2));
/// assert_eq!(offset, 4);
/// # Ok::<(), mapdex::Error>(())
/// ```
pub fn read_be_at<T: WireIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_be_bytes(read))
}

/// Appends a value of type `T` in big-endian byte order to an output buffer.
///
/// # Examples
///
/// ```rust
/// use mapdex::codec::write_be;
///
/// let mut out = Vec::new();
/// write_be(&mut out, 0x0102u16);
/// write_be(&mut out, 0x03u8);
/// assert_eq!(out, [0x01, 0x02, 0x03]);
/// ```
pub fn write_be<T: WireIO>(out: &mut Vec<u8>, value: T)
where
    T::Bytes: AsRef<[u8]>,
{
    out.extend_from_slice(value.to_be_bytes().as_ref());
}

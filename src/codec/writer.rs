//! Append-only writer for the snapshot wire format.
//!
//! [`ByteWriter`] builds the byte stream for one container encode: fixed-width
//! big-endian primitives, length-prefixed UTF-8 strings, counted sequences, and
//! the tag-based "magic" encodings that collapse a value to a single byte when it
//! matches a known original string.
//!
//! # Wire Rules
//!
//! - Non-null string: `u16` prefix holding `utf8_len + 1`, then the UTF-8 bytes;
//!   maximum payload 65534 bytes
//! - Nullable string: prefix `0` denotes absence, skipping the payload
//! - Sequence: `i32` count, then that many element encodings in order
//! - Magic against an original: tag `1` equals, `2` absent, `3` differs + string
//! - Obf: tag `0` empty, merged defers to magic (context-bound) or tags `2`/`3`
//!   (context-free), tag `4` split + two nullable strings
//!
//! # Error Handling
//!
//! Encoding a well-formed in-memory container cannot fail except for the string
//! length limit: a string longer than 65534 UTF-8 bytes is rejected with
//! [`crate::Error::StringTooLong`] before any of its bytes reach the stream.

use crate::codec::io::{write_be, WireIO};
use crate::mapping::Obf;
use crate::{Error, Result};

/// Longest string payload the `u16` length prefix can represent (the prefix
/// stores `utf8_len + 1`, and `0` is reserved for absence).
pub const MAX_STRING_BYTES: usize = u16::MAX as usize - 1;

/// Tag byte: the value equals the original string it is compared against.
pub(crate) const TAG_SAME: u8 = 1;
/// Tag byte: the value is absent.
pub(crate) const TAG_ABSENT: u8 = 2;
/// Tag byte: the value differs from the original; a non-null string follows.
pub(crate) const TAG_DIFFERENT: u8 = 3;
/// Tag byte: no obfuscated name is known.
pub(crate) const TAG_OBF_EMPTY: u8 = 0;
/// Tag byte: split obfuscation; two nullable strings follow.
pub(crate) const TAG_OBF_SPLIT: u8 = 4;

/// An append-only byte stream writer for one container encode.
///
/// # Examples
///
/// ```rust
/// use mapdex::codec::ByteWriter;
///
/// let mut writer = ByteWriter::new();
/// writer.write_string("1.18.2")?;
/// writer.write_string_opt(None)?;
/// let bytes = writer.into_bytes();
/// assert_eq!(&bytes[..2], &[0x00, 0x07]); // length prefix = 6 + 1
/// # Ok::<(), mapdex::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        ByteWriter::default()
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the accumulated byte stream.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Appends a fixed-width primitive in big-endian byte order.
    pub fn write_be<T: WireIO>(&mut self, value: T)
    where
        T::Bytes: AsRef<[u8]>,
    {
        write_be(&mut self.buf, value);
    }

    /// Appends a boolean as a single `0`/`1` byte.
    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Appends a non-null length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`crate::Error::StringTooLong`] if the string exceeds
    /// [`MAX_STRING_BYTES`] UTF-8 bytes; nothing is written in that case.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        if value.len() > MAX_STRING_BYTES {
            return Err(Error::StringTooLong(value.len()));
        }
        // Cast is safe: len + 1 <= u16::MAX checked above.
        self.write_be((value.len() + 1) as u16);
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// Appends a nullable string; absence is a `0` length prefix with no payload.
    ///
    /// # Errors
    /// Returns [`crate::Error::StringTooLong`] if a present string exceeds
    /// [`MAX_STRING_BYTES`] UTF-8 bytes.
    pub fn write_string_opt(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.write_string(value),
            None => {
                self.write_be(0u16);
                Ok(())
            }
        }
    }

    /// Appends an `i32` element count followed by each element's encoding.
    ///
    /// # Errors
    /// Returns an error if the count overflows `i32` or the element writer fails.
    pub fn write_seq<T>(
        &mut self,
        items: impl ExactSizeIterator<Item = T>,
        mut write_item: impl FnMut(&mut Self, T) -> Result<()>,
    ) -> Result<()> {
        let count = i32::try_from(items.len())
            .map_err(|_| Error::Error(format!("sequence of {} elements overflows i32", items.len())))?;
        self.write_be(count);
        for item in items {
            write_item(self, item)?;
        }
        Ok(())
    }

    /// Appends a value compared against a known original string.
    ///
    /// Encodes tag `1` when the value equals the original, tag `2` when absent,
    /// and tag `3` plus the string when it differs - the common case of a mapped
    /// name matching its intermediary name costs one byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::StringTooLong`] if a differing value exceeds the
    /// string limit.
    pub fn write_magic(&mut self, original: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) if value == original => {
                self.buf.push(TAG_SAME);
                Ok(())
            }
            None => {
                self.buf.push(TAG_ABSENT);
                Ok(())
            }
            Some(value) => {
                self.buf.push(TAG_DIFFERENT);
                self.write_string(value)
            }
        }
    }

    /// Appends an obfuscation variant compared against an original string.
    ///
    /// Empty is tag `0`; a merged name defers entirely to [`Self::write_magic`]
    /// against the original; split is tag `4` plus two nullable strings.
    ///
    /// # Errors
    /// Returns [`crate::Error::StringTooLong`] if any present name exceeds the
    /// string limit.
    pub fn write_magic_obf(&mut self, original: &str, obf: &Obf) -> Result<()> {
        match obf {
            Obf::Empty => {
                self.buf.push(TAG_OBF_EMPTY);
                Ok(())
            }
            Obf::Merged(merged) => self.write_magic(original, merged.as_deref()),
            Obf::Split { client, server } => {
                self.buf.push(TAG_OBF_SPLIT);
                self.write_string_opt(client.as_deref())?;
                self.write_string_opt(server.as_deref())
            }
        }
    }

    /// Appends a standalone obfuscation variant with no original to compare
    /// against.
    ///
    /// This form is intentionally incomplete relative to
    /// [`Self::write_magic_obf`]: with no external reference there is no tag `1`
    /// ("equals the original") case, so a merged name always pays for its string.
    /// The container layout never uses this encoding; it exists for callers that
    /// persist an [`Obf`] outside a container.
    ///
    /// # Errors
    /// Returns [`crate::Error::StringTooLong`] if any present name exceeds the
    /// string limit.
    pub fn write_obf(&mut self, obf: &Obf) -> Result<()> {
        match obf {
            Obf::Empty => {
                self.buf.push(TAG_OBF_EMPTY);
                Ok(())
            }
            Obf::Merged(None) => {
                self.buf.push(TAG_ABSENT);
                Ok(())
            }
            Obf::Merged(Some(merged)) => {
                self.buf.push(TAG_DIFFERENT);
                self.write_string(merged)
            }
            Obf::Split { client, server } => {
                self.buf.push(TAG_OBF_SPLIT);
                self.write_string_opt(client.as_deref())?;
                self.write_string_opt(server.as_deref())
            }
        }
    }
}

//! Cursor-based reader for the snapshot wire format.
//!
//! [`ByteReader`] walks a byte stream produced by [`crate::codec::ByteWriter`],
//! with every read bounds-checked so truncated input surfaces as
//! [`crate::Error::OutOfBounds`] instead of a buffer overrun. Each reader owns a
//! [`crate::codec::StringPool`] for its lifetime: every string read is interned,
//! so identical identifier content anywhere in one stream resolves to a single
//! shared `Arc<str>`.
//!
//! Tag bytes are validated strictly - an unrecognized tag is a
//! [`crate::Error::Malformed`] error, never silently reinterpreted.

use std::sync::Arc;

use crate::codec::io::{read_be_at, WireIO};
use crate::codec::pool::StringPool;
use crate::codec::writer::{TAG_ABSENT, TAG_DIFFERENT, TAG_OBF_EMPTY, TAG_OBF_SPLIT, TAG_SAME};
use crate::mapping::Obf;
use crate::{Error, Result};

/// A bounds-checked cursor over one encoded snapshot byte stream.
///
/// The reader holds the decode session's string pool, so it must be `mut` for
/// all reads and should be dropped once the decode completes; the pool is never
/// reused across sessions.
///
/// # Examples
///
/// ```rust
/// use mapdex::codec::{ByteReader, ByteWriter};
///
/// let mut writer = ByteWriter::new();
/// writer.write_be(42i32);
/// writer.write_string("hello")?;
/// let bytes = writer.into_bytes();
///
/// let mut reader = ByteReader::new(&bytes);
/// assert_eq!(reader.read_be::<i32>()?, 42);
/// assert_eq!(&*reader.read_string()?, "hello");
/// assert!(!reader.has_more_data());
/// # Ok::<(), mapdex::Error>(())
/// ```
#[derive(Debug)]
pub struct ByteReader<'a> {
    /// The binary data being decoded
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
    /// Session-local interning table for decoded strings
    pool: StringPool,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader over a byte stream, with a fresh string pool.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader {
            data,
            position: 0,
            pool: StringPool::new(),
        }
    }

    /// Current position within the stream.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Total length of the underlying stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the stream holds no data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there are unread bytes left.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Reads a fixed-width primitive in big-endian byte order.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the stream is exhausted.
    pub fn read_be<T: WireIO>(&mut self) -> Result<T> {
        read_be_at(self.data, &mut self.position)
    }

    /// Reads a boolean encoded as a single `0`/`1` byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the stream is exhausted.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_be::<u8>()? == 1)
    }

    /// Reads a nullable length-prefixed UTF-8 string, interned through the
    /// session pool. A `0` prefix is absence.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on truncation or
    /// [`crate::Error::Malformed`] if the payload is not valid UTF-8.
    pub fn read_string_opt(&mut self) -> Result<Option<Arc<str>>> {
        let prefix = self.read_be::<u16>()?;
        if prefix == 0 {
            return Ok(None);
        }

        let payload_len = usize::from(prefix) - 1;
        if self.position + payload_len > self.data.len() {
            return Err(Error::OutOfBounds);
        }

        let payload = &self.data[self.position..self.position + payload_len];
        let content = std::str::from_utf8(payload)
            .map_err(|_| malformed_error!("string payload at offset {} is not valid UTF-8", self.position))?;
        self.position += payload_len;

        Ok(Some(self.pool.intern(content)))
    }

    /// Reads a non-null length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the prefix denotes absence, plus
    /// the failure modes of [`Self::read_string_opt`].
    pub fn read_string(&mut self) -> Result<Arc<str>> {
        let offset = self.position;
        self.read_string_opt()?
            .ok_or_else(|| malformed_error!("expected a non-null string at offset {offset}"))
    }

    /// Reads an `i32` element count and decodes that many elements.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a negative count, plus whatever the
    /// element reader fails with.
    pub fn read_seq<T>(
        &mut self,
        mut read_item: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let count = self.read_be::<i32>()?;
        let count = usize::try_from(count)
            .map_err(|_| malformed_error!("negative sequence count {count}"))?;

        // Cap the preallocation so a corrupt count cannot balloon memory before
        // element reads start failing on truncation.
        let mut items = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            items.push(read_item(self)?);
        }
        Ok(items)
    }

    /// Reads a value encoded against a known original string.
    ///
    /// Tag `1` yields the original itself (sharing its instance), tag `2` yields
    /// absence, tag `3` is followed by the value.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unrecognized tag byte.
    pub fn read_magic(&mut self, original: &Arc<str>) -> Result<Option<Arc<str>>> {
        match self.read_be::<u8>()? {
            TAG_SAME => Ok(Some(original.clone())),
            TAG_ABSENT => Ok(None),
            TAG_DIFFERENT => Ok(Some(self.read_string()?)),
            tag => Err(malformed_error!("unrecognized magic tag {tag}")),
        }
    }

    /// Reads an obfuscation variant encoded against a known original string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unrecognized tag byte.
    pub fn read_magic_obf(&mut self, original: &Arc<str>) -> Result<Obf> {
        match self.read_be::<u8>()? {
            TAG_OBF_EMPTY => Ok(Obf::Empty),
            TAG_SAME => Ok(Obf::Merged(Some(original.clone()))),
            TAG_ABSENT => Ok(Obf::Merged(None)),
            TAG_DIFFERENT => Ok(Obf::Merged(Some(self.read_string()?))),
            TAG_OBF_SPLIT => {
                let client = self.read_string_opt()?;
                let server = self.read_string_opt()?;
                Ok(Obf::Split { client, server })
            }
            tag => Err(malformed_error!("unrecognized obf tag {tag}")),
        }
    }

    /// Reads a standalone obfuscation variant with no original to compare
    /// against.
    ///
    /// The context-free form has no tag `1` case (there is no external reference
    /// to equal), so tag `1` here is a malformed stream. See
    /// [`crate::codec::ByteWriter::write_obf`] for the asymmetry.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on an unrecognized tag byte.
    pub fn read_obf(&mut self) -> Result<Obf> {
        match self.read_be::<u8>()? {
            TAG_OBF_EMPTY => Ok(Obf::Empty),
            TAG_ABSENT => Ok(Obf::Merged(None)),
            TAG_DIFFERENT => Ok(Obf::Merged(Some(self.read_string()?))),
            TAG_OBF_SPLIT => {
                let client = self.read_string_opt()?;
                let server = self.read_string_opt()?;
                Ok(Obf::Split { client, server })
            }
            tag => Err(malformed_error!("unrecognized standalone obf tag {tag}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::writer::ByteWriter;

    #[test]
    fn read_string_shares_pool_instance() {
        let mut writer = ByteWriter::new();
        writer.write_string("net/minecraft/class_310").unwrap();
        writer.write_string("net/minecraft/class_310").unwrap();
        let bytes = writer.into_bytes();

        let mut reader = ByteReader::new(&bytes);
        let first = reader.read_string().unwrap();
        let second = reader.read_string().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn read_string_rejects_truncated_payload() {
        // Prefix says 5 payload bytes but only 2 follow.
        let bytes = [0x00, 0x06, b'a', b'b'];
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(reader.read_string(), Err(Error::OutOfBounds)));
    }

    #[test]
    fn read_string_rejects_invalid_utf8() {
        let bytes = [0x00, 0x03, 0xFF, 0xFE];
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(reader.read_string(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn read_magic_same_shares_original() {
        let bytes = [TAG_SAME];
        let mut reader = ByteReader::new(&bytes);
        let original: Arc<str> = Arc::from("Foo");
        let value = reader.read_magic(&original).unwrap().unwrap();
        assert!(Arc::ptr_eq(&value, &original));
    }

    #[test]
    fn read_magic_rejects_unknown_tag() {
        let bytes = [9];
        let mut reader = ByteReader::new(&bytes);
        let original: Arc<str> = Arc::from("Foo");
        assert!(matches!(
            reader.read_magic(&original),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn read_obf_rejects_same_tag() {
        // Tag 1 has no meaning without an original; only the context-bound form
        // may use it.
        let bytes = [TAG_SAME];
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(reader.read_obf(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn read_seq_rejects_negative_count() {
        let mut writer = ByteWriter::new();
        writer.write_be(-1i32);
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(
            reader.read_seq(|r| r.read_be::<u8>()),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn read_seq_huge_count_fails_on_truncation() {
        let mut writer = ByteWriter::new();
        writer.write_be(i32::MAX);
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert!(reader.read_seq(|r| r.read_be::<u8>()).is_err());
    }

    #[test]
    fn read_bool_round_trip() {
        let mut writer = ByteWriter::new();
        writer.write_bool(true);
        writer.write_bool(false);
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert!(reader.read_bool().unwrap());
        assert!(!reader.read_bool().unwrap());
    }
}

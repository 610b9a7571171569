//! Compact binary codec for mapping snapshots.
//!
//! Serializes a full [`crate::mapping::MappingContainer`] to a byte stream and
//! back, bit-exactly, so a data source can persist a built snapshot and restore
//! it without re-fetching. The format leans on two tricks to stay small:
//!
//! - **Magic tags**: wherever a value is compared against a known original (a
//!   mapped or obfuscated name against its intermediary name), equality and
//!   absence each encode as a single tag byte with no payload.
//! - **String interning**: decoding routes every string through a session-local
//!   [`StringPool`], collapsing the heavy duplication of identifier substrings
//!   across thousands of entries into shared allocations.
//!
//! # Architecture
//!
//! - [`io`] (re-exported) - [`WireIO`] trait plus bounds-checked big-endian reads/writes
//! - [`ByteWriter`] - append-only stream builder with the string/sequence/tag rules
//! - [`ByteReader`] - cursor over an encoded stream, owning the decode session's pool
//! - [`encode`] / [`decode`] - the container entry points
//!
//! # Wire Layout
//!
//! ```text
//! container := version:string name:string source:string? class*   (i32-counted)
//! class     := intermediary:string obf:magic_obf mapped:magic method* field*
//! method    := intermediary:string desc:string obf:magic_obf mapped:magic
//! field     := intermediary:string desc:string obf:magic_obf mapped:magic
//! ```
//!
//! There is no version header; producer and consumer must agree on the layout,
//! and any change to it is a breaking format change.
//!
//! # Examples
//!
//! ```rust
//! use mapdex::codec;
//! use mapdex::mapping::{MappingClass, MappingContainer, Obf};
//!
//! let mut container = MappingContainer::new("1.18.2", "Yarn");
//! container.add_class(MappingClass::new(
//!     "net/minecraft/class_310",
//!     Obf::Merged(Some("dyr".into())),
//!     Some("net/minecraft/client/MinecraftClient".into()),
//! ));
//!
//! let bytes = codec::encode(&container)?;
//! let restored = codec::decode(&bytes)?;
//! assert_eq!(restored, container);
//! # Ok::<(), mapdex::Error>(())
//! ```

mod io;
mod pool;
mod reader;
mod writer;

pub use io::{read_be_at, write_be, WireIO};
pub use pool::StringPool;
pub use reader::ByteReader;
pub use writer::{ByteWriter, MAX_STRING_BYTES};

use std::str::FromStr;

use crate::mapping::{MappingClass, MappingContainer, MappingField, MappingMethod, MappingSource};
use crate::Result;

/// Serializes a container to its wire representation.
///
/// Encoding a well-formed container only fails if an identifier exceeds the
/// 65534-byte string limit; see [`ByteWriter::write_string`].
///
/// # Errors
/// Returns [`crate::Error::StringTooLong`] for an oversized identifier.
pub fn encode(container: &MappingContainer) -> Result<Vec<u8>> {
    let mut writer = ByteWriter::new();
    write_container(&mut writer, container)?;
    Ok(writer.into_bytes())
}

/// Deserializes a container from its wire representation.
///
/// Decoding is all-or-nothing: a truncated stream, unrecognized tag byte, bad
/// UTF-8 payload or unknown source name fails the whole call and the partial
/// result is discarded. Bytes after the end of the container are ignored.
/// Every string in the result tree was interned through a pool created for this
/// call alone.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] on truncation and
/// [`crate::Error::Malformed`] for anything the format does not recognize.
pub fn decode(data: &[u8]) -> Result<MappingContainer> {
    let mut reader = ByteReader::new(data);
    read_container(&mut reader)
}

fn write_container(writer: &mut ByteWriter, container: &MappingContainer) -> Result<()> {
    writer.write_string(&container.version)?;
    writer.write_string(&container.name)?;
    writer.write_string_opt(container.source.as_ref().map(AsRef::as_ref))?;
    writer.write_seq(container.classes.values(), write_class)
}

fn write_class(writer: &mut ByteWriter, class: &MappingClass) -> Result<()> {
    writer.write_string(&class.intermediary_name)?;
    writer.write_magic_obf(&class.intermediary_name, &class.obf)?;
    writer.write_magic(&class.intermediary_name, class.mapped_name.as_deref())?;
    writer.write_seq(class.methods.iter(), write_method)?;
    writer.write_seq(class.fields.iter(), write_field)
}

fn write_method(writer: &mut ByteWriter, method: &MappingMethod) -> Result<()> {
    writer.write_string(&method.intermediary_name)?;
    writer.write_string(&method.intermediary_desc)?;
    writer.write_magic_obf(&method.intermediary_name, &method.obf)?;
    writer.write_magic(&method.intermediary_name, method.mapped_name.as_deref())
}

fn write_field(writer: &mut ByteWriter, field: &MappingField) -> Result<()> {
    writer.write_string(&field.intermediary_name)?;
    writer.write_string(&field.intermediary_desc)?;
    writer.write_magic_obf(&field.intermediary_name, &field.obf)?;
    writer.write_magic(&field.intermediary_name, field.mapped_name.as_deref())
}

fn read_container(reader: &mut ByteReader<'_>) -> Result<MappingContainer> {
    let version = reader.read_string()?;
    let name = reader.read_string()?;
    let source = match reader.read_string_opt()? {
        Some(source_name) => Some(
            MappingSource::from_str(&source_name)
                .map_err(|_| malformed_error!("unknown mapping source '{source_name}'"))?,
        ),
        None => None,
    };

    let mut container = MappingContainer::new(version, name);
    container.source = source;
    for class in reader.read_seq(read_class)? {
        container.add_class(class);
    }
    Ok(container)
}

fn read_class(reader: &mut ByteReader<'_>) -> Result<MappingClass> {
    let intermediary_name = reader.read_string()?;
    let obf = reader.read_magic_obf(&intermediary_name)?;
    let mapped_name = reader.read_magic(&intermediary_name)?;

    let mut class = MappingClass::new(intermediary_name, obf, mapped_name);
    class.methods = reader.read_seq(read_method)?;
    class.fields = reader.read_seq(read_field)?;
    Ok(class)
}

fn read_method(reader: &mut ByteReader<'_>) -> Result<MappingMethod> {
    let intermediary_name = reader.read_string()?;
    let intermediary_desc = reader.read_string()?;
    let obf = reader.read_magic_obf(&intermediary_name)?;
    let mapped_name = reader.read_magic(&intermediary_name)?;
    Ok(MappingMethod {
        intermediary_name,
        intermediary_desc,
        obf,
        mapped_name,
    })
}

fn read_field(reader: &mut ByteReader<'_>) -> Result<MappingField> {
    let intermediary_name = reader.read_string()?;
    let intermediary_desc = reader.read_string()?;
    let obf = reader.read_magic_obf(&intermediary_name)?;
    let mapped_name = reader.read_magic(&intermediary_name)?;
    Ok(MappingField {
        intermediary_name,
        intermediary_desc,
        obf,
        mapped_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Obf;
    use std::sync::Arc;

    fn sample_container() -> MappingContainer {
        let mut container =
            MappingContainer::new("1.18.2", "Yarn").with_source(MappingSource::YarnV2);

        let mut client = MappingClass::new(
            "net/minecraft/class_310",
            Obf::Merged(Some("dyr".into())),
            Some("net/minecraft/client/MinecraftClient".into()),
        );
        client.methods.push(MappingMethod {
            intermediary_name: "method_1551".into(),
            intermediary_desc: "()V".into(),
            obf: Obf::Split {
                client: Some("a".into()),
                server: None,
            },
            mapped_name: Some("render".into()),
        });
        client.fields.push(MappingField {
            intermediary_name: "field_1724".into(),
            intermediary_desc: "Z".into(),
            obf: Obf::Empty,
            // Mapped name equals the intermediary: exercises the one-byte tag.
            mapped_name: Some("field_1724".into()),
        });
        container.add_class(client);

        // A class with no mapped name, no members, and a merged-absent obf.
        container.add_class(MappingClass::new(
            "net/minecraft/class_2338",
            Obf::Merged(None),
            None,
        ));

        // Split with both sides present.
        container.add_class(MappingClass::new(
            "net/minecraft/class_1297",
            Obf::Split {
                client: Some("bfj".into()),
                server: Some("axw".into()),
            },
            Some("net/minecraft/entity/Entity".into()),
        ));

        container
    }

    #[test]
    fn round_trip_full_container() {
        let container = sample_container();
        let bytes = encode(&container).unwrap();
        let restored = decode(&bytes).unwrap();
        assert_eq!(restored, container);
    }

    #[test]
    fn round_trip_preserves_class_order() {
        let container = sample_container();
        let restored = decode(&encode(&container).unwrap()).unwrap();
        let keys: Vec<&str> = restored.classes.keys().map(|k| &**k).collect();
        assert_eq!(
            keys,
            [
                "net/minecraft/class_310",
                "net/minecraft/class_2338",
                "net/minecraft/class_1297"
            ]
        );
    }

    #[test]
    fn round_trip_empty_container() {
        let container = MappingContainer::new("22w11a", "Mojang");
        let restored = decode(&encode(&container).unwrap()).unwrap();
        assert_eq!(&*restored.version, "22w11a");
        assert_eq!(&*restored.name, "Mojang");
        assert_eq!(restored.source, None);
        assert!(restored.classes.is_empty());
    }

    #[test]
    fn round_trip_string_at_length_limit() {
        let long_name: String = "y".repeat(MAX_STRING_BYTES);
        let mut container = MappingContainer::new("1.0", "Test");
        container.add_class(MappingClass::new(long_name.as_str(), Obf::Empty, None));

        let restored = decode(&encode(&container).unwrap()).unwrap();
        assert_eq!(&**restored.classes.keys().next().unwrap(), &long_name);
    }

    #[test]
    fn encode_rejects_string_over_limit() {
        let mut container = MappingContainer::new("1.0", "Test");
        container.add_class(MappingClass::new(
            "x".repeat(MAX_STRING_BYTES + 1).as_str(),
            Obf::Empty,
            None,
        ));
        assert!(matches!(
            encode(&container),
            Err(crate::Error::StringTooLong(_))
        ));
    }

    #[test]
    fn decode_rejects_truncated_stream() {
        let bytes = encode(&sample_container()).unwrap();
        for cut in [1, bytes.len() / 2, bytes.len() - 1] {
            assert!(decode(&bytes[..cut]).is_err(), "cut at {cut} should fail");
        }
    }

    #[test]
    fn decode_rejects_unknown_source_name() {
        let mut writer = ByteWriter::new();
        writer.write_string("1.0").unwrap();
        writer.write_string("Test").unwrap();
        writer.write_string_opt(Some("NOT_A_SOURCE")).unwrap();
        writer.write_be(0i32);
        assert!(matches!(
            decode(&writer.into_bytes()),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn decode_interns_repeated_names_within_one_stream() {
        let shared = "net/minecraft/class_310";
        let mut container = MappingContainer::new("1.0", "Test");
        let mut class = MappingClass::new(shared, Obf::Empty, None);
        class.methods.push(MappingMethod {
            intermediary_name: shared.into(),
            intermediary_desc: "()V".into(),
            obf: Obf::Empty,
            mapped_name: None,
        });
        container.add_class(class);

        let restored = decode(&encode(&container).unwrap()).unwrap();
        let class = restored.class(shared).unwrap();
        assert!(Arc::ptr_eq(
            &class.intermediary_name,
            &class.methods[0].intermediary_name
        ));
    }

    #[test]
    fn independent_decodes_never_share_instances() {
        let bytes = encode(&sample_container()).unwrap();
        let first = decode(&bytes).unwrap();
        let second = decode(&bytes).unwrap();

        let a = &first.class("net/minecraft/class_310").unwrap().intermediary_name;
        let b = &second.class("net/minecraft/class_310").unwrap().intermediary_name;
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(a, b));
    }

    #[test]
    fn magic_tag_bytes_are_exact() {
        // original "Foo": absent mapped name -> tag 2; equal -> tag 1; distinct
        // "Bar" -> tag 3 + prefixed bytes.
        let mut container = MappingContainer::new("v", "n");
        container.add_class(MappingClass::new("Foo", Obf::Empty, None));
        let bytes = encode(&container).unwrap();
        // version(3) + name(3) + source(2) + count(4) + "Foo"(5) + obf(1)
        let mapped_tag_at = 3 + 3 + 2 + 4 + 5 + 1;
        assert_eq!(bytes[mapped_tag_at], 2);

        let mut container = MappingContainer::new("v", "n");
        container.add_class(MappingClass::new("Foo", Obf::Empty, Some("Foo".into())));
        assert_eq!(encode(&container).unwrap()[mapped_tag_at], 1);

        let mut container = MappingContainer::new("v", "n");
        container.add_class(MappingClass::new("Foo", Obf::Empty, Some("Bar".into())));
        let bytes = encode(&container).unwrap();
        assert_eq!(bytes[mapped_tag_at], 3);
        assert_eq!(&bytes[mapped_tag_at + 1..mapped_tag_at + 3], &[0x00, 0x04]);
        assert_eq!(&bytes[mapped_tag_at + 3..mapped_tag_at + 6], b"Bar");
    }
}

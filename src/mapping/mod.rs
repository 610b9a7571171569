//! Data model for symbol-mapping snapshots.
//!
//! A snapshot ([`MappingContainer`]) holds every class of one version of one
//! mapping project, with each program element carrying up to three names from the
//! build pipeline: the obfuscated name as shipped ([`Obf`]), the stable
//! intermediary name used as the join key across mapping stages, and an optional
//! human-readable mapped name.
//!
//! # Key Components
//!
//! - [`MappingContainer`] - One immutable snapshot of mapping data
//! - [`MappingClass`] - A class entry with its methods and fields
//! - [`MappingMethod`] / [`MappingField`] - Class members, distinguished by descriptor
//! - [`Obf`] - The obfuscated-name variant (empty, merged, or split client/server)
//! - [`MappingSource`] - The kind of source a container was built from
//!
//! # Identifier Strings
//!
//! All identifier strings are stored as `Arc<str>`. Mapping data repeats the same
//! package prefixes and short names thousands of times across a snapshot; decoding
//! interns every string through a session-local [`crate::codec::StringPool`] so
//! identical content resolves to one shared allocation. Value equality is content
//! equality as usual - sharing is purely a memory optimization.
//!
//! # Immutability
//!
//! A container is owned exclusively by the data source that builds it. Once handed
//! to the [`crate::cache::MappingCache`] it is shared behind an `Arc` and treated
//! as immutable; producing a modified mapping means constructing a new value.

use std::sync::Arc;

use indexmap::IndexMap;
use strum::{AsRefStr, EnumString};

/// The obfuscated-name variant of a program element.
///
/// A build may ship a single merged artifact or separate client and server
/// artifacts, so an element's obfuscated name comes in three mutually exclusive
/// shapes. The variant is fixed at construction and never mutated in place.
///
/// # Examples
///
/// ```rust
/// use mapdex::mapping::Obf;
///
/// let merged = Obf::Merged(Some("a".into()));
/// assert!(merged.is_merged());
/// assert_eq!(merged.merged(), Some("a"));
///
/// let split = Obf::Split { client: Some("b".into()), server: None };
/// assert!(split.is_split());
/// assert_eq!(split.client(), Some("b"));
/// assert_eq!(split.server(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Obf {
    /// No obfuscated name is known.
    #[default]
    Empty,
    /// Client and server share one obfuscated name; the name itself may be absent.
    Merged(Option<Arc<str>>),
    /// Client and server artifacts were obfuscated independently.
    Split {
        /// Obfuscated name in the client artifact, if any.
        client: Option<Arc<str>>,
        /// Obfuscated name in the server artifact, if any.
        server: Option<Arc<str>>,
    },
}

impl Obf {
    /// Returns `true` if no obfuscated name is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Obf::Empty)
    }

    /// Returns `true` if client and server share one obfuscated name.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        matches!(self, Obf::Merged(_))
    }

    /// Returns `true` if client and server were obfuscated independently.
    #[must_use]
    pub fn is_split(&self) -> bool {
        matches!(self, Obf::Split { .. })
    }

    /// The merged obfuscated name, if this variant is merged and the name is present.
    #[must_use]
    pub fn merged(&self) -> Option<&str> {
        match self {
            Obf::Merged(name) => name.as_deref(),
            _ => None,
        }
    }

    /// The client-side obfuscated name, if this variant is split and the name is present.
    #[must_use]
    pub fn client(&self) -> Option<&str> {
        match self {
            Obf::Split { client, .. } => client.as_deref(),
            _ => None,
        }
    }

    /// The server-side obfuscated name, if this variant is split and the name is present.
    #[must_use]
    pub fn server(&self) -> Option<&str> {
        match self {
            Obf::Split { server, .. } => server.as_deref(),
            _ => None,
        }
    }
}

/// The kind of data source a mapping container was built from.
///
/// Encoded on the wire as its `SCREAMING_SNAKE_CASE` name (or absence), so the
/// string form is part of the binary format - renaming a variant is a breaking
/// format change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingSource {
    /// Official vendor mappings published alongside a release.
    Mojang,
    /// Vendor mappings rewired through intermediary names.
    MojangIntermediary,
    /// Vendor mappings rewired through hashed intermediary names.
    MojangHashed,
    /// Community mappings in tiny v1 format.
    YarnV1,
    /// Community mappings in tiny v2 format.
    YarnV2,
    /// Community mappings layered on hashed intermediaries.
    Quilt,
    /// Legacy community mappings distributed as SRG.
    Mcp,
    /// Mappings parsed from a proguard-style text file.
    Proguard,
    /// Mappings recovered from an engima-format archive.
    Engima,
    /// SRG-family mappings (SRG, TSRG, CSRG).
    Srg,
}

/// A method entry of a [`MappingClass`].
///
/// The intermediary descriptor is mandatory: it is what distinguishes overloads
/// that share an intermediary name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingMethod {
    /// Stable intermediary name, the join key across mapping stages.
    pub intermediary_name: Arc<str>,
    /// Intermediary type descriptor (JVM signature string).
    pub intermediary_desc: Arc<str>,
    /// Obfuscated-name variant.
    pub obf: Obf,
    /// Human-readable mapped name, if one has been assigned.
    pub mapped_name: Option<Arc<str>>,
}

/// A field entry of a [`MappingClass`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingField {
    /// Stable intermediary name, the join key across mapping stages.
    pub intermediary_name: Arc<str>,
    /// Intermediary type descriptor (JVM signature string).
    pub intermediary_desc: Arc<str>,
    /// Obfuscated-name variant.
    pub obf: Obf,
    /// Human-readable mapped name, if one has been assigned.
    pub mapped_name: Option<Arc<str>>,
}

/// A class entry of a [`MappingContainer`].
///
/// Methods and fields keep the order in which they were added; that order is
/// what the codec serializes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingClass {
    /// Stable intermediary name, unique within the container.
    pub intermediary_name: Arc<str>,
    /// Obfuscated-name variant.
    pub obf: Obf,
    /// Human-readable mapped name, if one has been assigned.
    pub mapped_name: Option<Arc<str>>,
    /// Methods of this class, in insertion order.
    pub methods: Vec<MappingMethod>,
    /// Fields of this class, in insertion order.
    pub fields: Vec<MappingField>,
}

impl MappingClass {
    /// Creates a class entry with no members.
    #[must_use]
    pub fn new(intermediary_name: impl Into<Arc<str>>, obf: Obf, mapped_name: Option<Arc<str>>) -> Self {
        MappingClass {
            intermediary_name: intermediary_name.into(),
            obf,
            mapped_name,
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }
}

/// One immutable snapshot of mapping data for one version of one source.
///
/// Classes are keyed by intermediary name; keys are unique and iteration order is
/// insertion order, which keeps serialization stable across encode calls.
///
/// # Examples
///
/// ```rust
/// use mapdex::mapping::{MappingClass, MappingContainer, Obf};
///
/// let mut container = MappingContainer::new("1.18.2", "Yarn");
/// container.add_class(MappingClass::new(
///     "net/minecraft/class_310",
///     Obf::Merged(Some("dyr".into())),
///     Some("net/minecraft/client/MinecraftClient".into()),
/// ));
///
/// assert!(container.class("net/minecraft/class_310").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingContainer {
    /// Version label of the snapshot (e.g. a game version string).
    pub version: Arc<str>,
    /// Human-readable name of the mapping project.
    pub name: Arc<str>,
    /// Kind of source this snapshot was built from, if known.
    pub source: Option<MappingSource>,
    /// Classes keyed by intermediary name, in insertion order.
    pub classes: IndexMap<Arc<str>, MappingClass>,
}

impl MappingContainer {
    /// Creates an empty container with the given version label and project name.
    #[must_use]
    pub fn new(version: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        MappingContainer {
            version: version.into(),
            name: name.into(),
            source: None,
            classes: IndexMap::new(),
        }
    }

    /// Sets the source kind of this container.
    #[must_use]
    pub fn with_source(mut self, source: MappingSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Inserts a class, keyed by its intermediary name.
    ///
    /// Re-inserting an existing intermediary name replaces the previous entry
    /// while keeping its position in the iteration order.
    pub fn add_class(&mut self, class: MappingClass) {
        self.classes.insert(class.intermediary_name.clone(), class);
    }

    /// Looks up a class by intermediary name.
    #[must_use]
    pub fn class(&self, intermediary_name: &str) -> Option<&MappingClass> {
        self.classes.get(intermediary_name)
    }

    /// A `name-version` label used in cache churn logs.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn obf_default_is_empty() {
        assert!(Obf::default().is_empty());
        assert_eq!(Obf::default().merged(), None);
    }

    #[test]
    fn obf_accessors_cross_variant() {
        let merged = Obf::Merged(Some("a".into()));
        assert_eq!(merged.client(), None);
        assert_eq!(merged.server(), None);

        let split = Obf::Split {
            client: None,
            server: Some("b".into()),
        };
        assert_eq!(split.merged(), None);
        assert_eq!(split.server(), Some("b"));
    }

    #[test]
    fn source_name_round_trip() {
        assert_eq!(MappingSource::YarnV2.as_ref(), "YARN_V2");
        assert_eq!(
            MappingSource::from_str("YARN_V2").unwrap(),
            MappingSource::YarnV2
        );
        assert!(MappingSource::from_str("NOT_A_SOURCE").is_err());
    }

    #[test]
    fn add_class_replaces_by_key() {
        let mut container = MappingContainer::new("1.0", "Test");
        container.add_class(MappingClass::new("class_1", Obf::Empty, None));
        container.add_class(MappingClass::new(
            "class_1",
            Obf::Merged(Some("a".into())),
            None,
        ));

        assert_eq!(container.classes.len(), 1);
        assert!(container.class("class_1").unwrap().obf.is_merged());
    }
}

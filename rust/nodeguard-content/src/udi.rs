//! Composite resource identifiers.
//!
//! A composite identifier names an entity by its type and a unique value,
//! in the form `umb://<entity-type>/<value>`. Most entity types are keyed by
//! a guid; a handful of file-backed types are keyed by a string.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::NodeguardContentError;

/// URI scheme shared by every composite identifier.
pub const UDI_SCHEME: &str = "umb";

/// Characters escaped in the value of a string-keyed identifier. `/` is kept
/// so file paths stay readable.
const NAME_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The entity types a composite identifier may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// A content document
    Document,
    /// A content blueprint
    DocumentBlueprint,
    /// A document type
    DocumentType,
    /// A data type
    DataType,
    /// An element
    Element,
    /// A media item
    Media,
    /// A media type
    MediaType,
    /// A member
    Member,
    /// A member group
    MemberGroup,
    /// A member type
    MemberType,
    /// A relation type
    RelationType,
    /// A template
    Template,
    /// A file in the media file system
    MediaFile,
    /// A partial view file
    PartialView,
    /// A script file
    Script,
    /// A stylesheet file
    Stylesheet,
    /// A template file
    TemplateFile,
}

impl EntityType {
    const ALL: [EntityType; 17] = [
        Self::Document,
        Self::DocumentBlueprint,
        Self::DocumentType,
        Self::DataType,
        Self::Element,
        Self::Media,
        Self::MediaType,
        Self::Member,
        Self::MemberGroup,
        Self::MemberType,
        Self::RelationType,
        Self::Template,
        Self::MediaFile,
        Self::PartialView,
        Self::Script,
        Self::Stylesheet,
        Self::TemplateFile,
    ];

    /// The name used in the host position of a composite identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::DocumentBlueprint => "document-blueprint",
            Self::DocumentType => "document-type",
            Self::DataType => "data-type",
            Self::Element => "element",
            Self::Media => "media",
            Self::MediaType => "media-type",
            Self::Member => "member",
            Self::MemberGroup => "member-group",
            Self::MemberType => "member-type",
            Self::RelationType => "relation-type",
            Self::Template => "template",
            Self::MediaFile => "media-file",
            Self::PartialView => "partial-view",
            Self::Script => "script",
            Self::Stylesheet => "stylesheet",
            Self::TemplateFile => "template-file",
        }
    }

    /// Look up an entity type by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|entity_type| entity_type.as_str().eq_ignore_ascii_case(name))
    }

    /// Whether identifiers of this type carry a guid (as opposed to a string).
    pub fn is_guid_type(&self) -> bool {
        !matches!(
            self,
            Self::MediaFile
                | Self::PartialView
                | Self::Script
                | Self::Stylesheet
                | Self::TemplateFile
        )
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value part of a composite identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UdiValue {
    /// The identifier denotes the root of its entity type
    Root,
    /// A guid-keyed entity
    Guid(Uuid),
    /// A string-keyed entity
    Name(String),
}

/// A parsed composite resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Udi {
    entity_type: EntityType,
    value: UdiValue,
}

impl Udi {
    /// A guid-keyed identifier.
    pub fn guid(entity_type: EntityType, guid: Uuid) -> Self {
        Self {
            entity_type,
            value: UdiValue::Guid(guid),
        }
    }

    /// A string-keyed identifier.
    pub fn name(entity_type: EntityType, name: impl Into<String>) -> Self {
        Self {
            entity_type,
            value: UdiValue::Name(name.into()),
        }
    }

    /// The root identifier of an entity type.
    pub fn root(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            value: UdiValue::Root,
        }
    }

    /// The entity type this identifier names.
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// The value part.
    pub fn value(&self) -> &UdiValue {
        &self.value
    }

    /// Parse `text`, returning `None` for anything that is not a well-formed
    /// composite identifier of a known entity type.
    pub fn try_parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl Display for Udi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            UdiValue::Root => write!(f, "{UDI_SCHEME}://{}", self.entity_type),
            UdiValue::Guid(guid) => {
                write!(f, "{UDI_SCHEME}://{}/{}", self.entity_type, guid.simple())
            }
            UdiValue::Name(name) => write!(
                f,
                "{UDI_SCHEME}://{}/{}",
                self.entity_type,
                utf8_percent_encode(name, NAME_ESCAPES)
            ),
        }
    }
}

impl FromStr for Udi {
    type Err = NodeguardContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NodeguardContentError::InvalidComposite(s.to_owned());

        let url = Url::parse(s.trim()).map_err(|_| invalid())?;
        if !url.scheme().eq_ignore_ascii_case(UDI_SCHEME) {
            return Err(invalid());
        }

        let entity_type = url
            .host_str()
            .and_then(EntityType::from_name)
            .ok_or_else(invalid)?;

        let value = url.path().trim_start_matches('/');
        if value.is_empty() {
            return Ok(Self::root(entity_type));
        }

        if entity_type.is_guid_type() {
            let guid = Uuid::parse_str(value).map_err(|_| invalid())?;
            Ok(Self::guid(entity_type, guid))
        } else {
            let name = percent_decode_str(value)
                .decode_utf8()
                .map_err(|_| invalid())?;
            Ok(Self::name(entity_type, name))
        }
    }
}

impl From<Udi> for String {
    fn from(value: Udi) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Udi {
    type Error = NodeguardContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

//! Content document model.
//!
//! The content document is loosely structured: every key is optional, scalar
//! fields accept strings, numbers or booleans, and list fields accept a single
//! value or a sequence. Each top-level region is decoded independently so a
//! malformed region is dropped without affecting the others.

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{FolioError, Result};

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// A scalar text field. Numbers and booleans are kept in their display form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Text(pub String);

impl Text {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow an optional field as text, absent fields read as "".
    pub fn or_empty(field: &Option<Text>) -> &str {
        field.as_ref().map_or("", Text::as_str)
    }

    /// Borrow an optional field only when it holds non-empty text.
    pub fn non_empty(field: &Option<Text>) -> Option<&str> {
        field.as_ref().map(Text::as_str).filter(|s| !s.is_empty())
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TextVisitor;

        impl Visitor<'_> for TextVisitor {
            type Value = Text;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Text, E> {
                Ok(Text(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Text, E> {
                Ok(Text(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Text, E> {
                Ok(Text(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Text, E> {
                Ok(Text(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Text, E> {
                Ok(Text(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Text, E> {
                Ok(Text(v.to_string()))
            }
        }

        deserializer.deserialize_any(TextVisitor)
    }
}

// ---------------------------------------------------------------------------
// TextList
// ---------------------------------------------------------------------------

/// A list field that may be written as one value or as a sequence.
///
/// A single empty or `null` value normalises to an empty list; `null` entries
/// inside a sequence are kept as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextList(pub Vec<String>);

impl TextList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'de> Deserialize<'de> for TextList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Many(Vec<Option<Text>>),
            One(Option<Text>),
        }

        let items = match Raw::deserialize(deserializer)? {
            Raw::Many(items) => items
                .into_iter()
                .map(|item| item.map(|t| t.0).unwrap_or_default())
                .collect(),
            Raw::One(Some(text)) if !text.is_empty() => vec![text.0],
            Raw::One(_) => Vec::new(),
        };
        Ok(Self(items))
    }
}

impl<S: Into<String>> FromIterator<S> for TextList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// `profile` region: hero, contact strip and about text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Text>,
    /// Full profile URL, scheme included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<Text>,
}

/// One `experience` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Text>,
    #[serde(default)]
    pub bullets: TextList,
}

/// One `education` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<Text>,
    #[serde(default)]
    pub badges: TextList,
}

/// `skills` region: three independent pill groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub professional: TextList,
    #[serde(default)]
    pub personal: TextList,
    #[serde(default)]
    pub tools: TextList,
}

/// `theme` region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeDefaults {
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_theme: Option<Text>,
}

// ---------------------------------------------------------------------------
// ContentDocument
// ---------------------------------------------------------------------------

/// Root value driving all rendering. Every region is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<TextList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Skills>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeDefaults>,
}

impl ContentDocument {
    /// Parse a document from JSON text. The root must be an object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| FolioError::parse(format!("content document is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Build a document from an already-parsed JSON value.
    ///
    /// Regions that fail to decode are logged and treated as absent.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(FolioError::parse("content document root must be a JSON object"));
        };

        Ok(Self {
            profile: take_region(&mut map, "profile"),
            experience: take_region(&mut map, "experience"),
            education: take_region(&mut map, "education"),
            certifications: take_truthy_region(&mut map, "certifications"),
            skills: take_region(&mut map, "skills"),
            theme: take_region(&mut map, "theme"),
        })
    }

    /// Read a document from a JSON file on disk.
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FolioError::io(path, e))?;
        Self::from_json_str(&content)
    }

    /// The default theme requested by the document, if any.
    pub fn default_theme(&self) -> Option<&str> {
        self.theme
            .as_ref()
            .and_then(|t| Text::non_empty(&t.default_theme))
    }
}

impl<'de> Deserialize<'de> for ContentDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

/// Like [`take_region`], but a falsy scalar (`""`, `false`, `0`) counts as
/// absent. Sequences are always kept, even when empty.
fn take_truthy_region<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    if map.get(key).is_some_and(is_falsy_scalar) {
        map.remove(key);
        debug!(region = key, "falsy region value treated as absent");
        return None;
    }
    take_region(map, key)
}

fn is_falsy_scalar(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn take_region<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.remove(key)?;
    if value.is_null() {
        return None;
    }

    match serde_json::from_value(value) {
        Ok(region) => Some(region),
        Err(e) => {
            warn!(region = key, error = %e, "ignoring malformed content region");
            None
        }
    }
}

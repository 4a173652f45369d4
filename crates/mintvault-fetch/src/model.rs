//! Off-chain metadata document model
//!
//! The nominal token-metadata JSON schema, plus the tolerant fallback that
//! makes pre-2022 assets parseable: each recognized top-level key is
//! extracted independently with explicit coercions, and keys that cannot
//! be coerced are silently omitted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Off-chain metadata document
///
/// Persisted verbatim as `metadata.json` next to the backup record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffChainMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub external_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub animation_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    #[serde(default)]
    pub seller_fee_basis_points: u32,
    #[serde(default, skip_serializing_if = "Collection::is_empty")]
    pub collection: Collection,
}

/// A single trait attribute
///
/// The value is a scalar of whatever JSON type the creator chose; it is
/// carried as-is rather than forced into one shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub trait_type: String,
    #[serde(default)]
    pub value: Value,
}

/// Additional properties block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileRef>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<Creator>,
}

impl Properties {
    fn is_empty(&self) -> bool {
        self.files.is_empty() && self.category.is_empty() && self.creators.is_empty()
    }
}

/// A file referenced by the metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(default)]
    pub uri: String,
    #[serde(default, rename = "type")]
    pub file_type: String,
}

/// A creator entry
///
/// `verified` is a strict bool here; documents carrying `0`/`1` or
/// string forms fail the strict parse and go through the tolerant
/// fallback instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub share: u32,
    #[serde(default)]
    pub verified: bool,
}

/// Collection membership
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub family: String,
}

impl Collection {
    fn is_empty(&self) -> bool {
        self.name.is_empty() && self.family.is_empty()
    }
}

/// Coerce a boolean-like JSON value
///
/// Accepted forms: `true`/`false`, any number (non-zero is true), the
/// strings `"true"` and `"1"`. Anything else is not boolean-like.
pub(crate) fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f as u32),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn string_at<'a>(map: &'a Value, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

impl OffChainMetadata {
    /// Tolerant fallback parse
    ///
    /// Extracts each recognized top-level key independently, coercing
    /// known type variance; keys that cannot be coerced are dropped.
    /// Only fails if the value is not a JSON object at all.
    pub fn from_value(root: &Value) -> Option<Self> {
        if !root.is_object() {
            return None;
        }

        let mut metadata = Self {
            name: string_at(root, "name").unwrap_or_default().to_string(),
            symbol: string_at(root, "symbol").unwrap_or_default().to_string(),
            description: string_at(root, "description").unwrap_or_default().to_string(),
            image: string_at(root, "image").unwrap_or_default().to_string(),
            animation_url: string_at(root, "animation_url").unwrap_or_default().to_string(),
            external_url: string_at(root, "external_url").unwrap_or_default().to_string(),
            seller_fee_basis_points: root
                .get("seller_fee_basis_points")
                .and_then(coerce_u32)
                .unwrap_or(0),
            ..Self::default()
        };

        if let Some(attrs) = root.get("attributes").and_then(Value::as_array) {
            for attr in attrs {
                if !attr.is_object() {
                    continue;
                }
                metadata.attributes.push(Attribute {
                    trait_type: string_at(attr, "trait_type").unwrap_or_default().to_string(),
                    value: attr.get("value").cloned().unwrap_or(Value::Null),
                });
            }
        }

        if let Some(props) = root.get("properties").filter(|p| p.is_object()) {
            metadata.properties.category =
                string_at(props, "category").unwrap_or_default().to_string();

            if let Some(files) = props.get("files").and_then(Value::as_array) {
                for file in files {
                    if !file.is_object() {
                        continue;
                    }
                    metadata.properties.files.push(FileRef {
                        uri: string_at(file, "uri").unwrap_or_default().to_string(),
                        file_type: string_at(file, "type").unwrap_or_default().to_string(),
                    });
                }
            }

            if let Some(creators) = props.get("creators").and_then(Value::as_array) {
                for creator in creators {
                    if !creator.is_object() {
                        continue;
                    }
                    metadata.properties.creators.push(Creator {
                        address: string_at(creator, "address").unwrap_or_default().to_string(),
                        share: creator.get("share").and_then(coerce_u32).unwrap_or(0),
                        verified: creator
                            .get("verified")
                            .and_then(coerce_bool)
                            .unwrap_or(false),
                    });
                }
            }
        }

        if let Some(collection) = root.get("collection").filter(|c| c.is_object()) {
            metadata.collection = Collection {
                name: string_at(collection, "name").unwrap_or_default().to_string(),
                family: string_at(collection, "family").unwrap_or_default().to_string(),
            };
        }

        Some(metadata)
    }
}

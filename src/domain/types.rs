// ==========================================
// Humidor Hub - Domain types
// ==========================================
// Entity kinds, field value types, export formats
// and the collection handle used by the store.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// EntityType - catalog entity kind
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Cigar,
    Humidor,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Cigar => "cigar",
            EntityType::Humidor => "humidor",
        }
    }

    /// Collection name used by the document store
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityType::Cigar => "cigars",
            EntityType::Humidor => "humidors",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cigar" | "cigars" => Ok(EntityType::Cigar),
            "humidor" | "humidors" => Ok(EntityType::Humidor),
            other => Err(format!(
                "unsupported entity type: '{}' (expected cigar or humidor)",
                other
            )),
        }
    }
}

// ==========================================
// ValueType - declared type of a schema field
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    StringArray,
    IsoDate,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => write!(f, "string"),
            ValueType::Number => write!(f, "number"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::StringArray => write!(f, "stringArray"),
            ValueType::IsoDate => write!(f, "isoDate"),
        }
    }
}

// ==========================================
// ExportFormat
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported export format: '{}' (expected csv or json)", other)),
        }
    }
}

// ==========================================
// CollectionHandle - target collection of a batch
// ==========================================
// One collection per (owner, entity type); the store
// keeps collections of different owners apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionHandle {
    pub owner_id: String,
    pub entity_type: EntityType,
}

impl CollectionHandle {
    pub fn new(owner_id: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            owner_id: owner_id.into(),
            entity_type,
        }
    }

    pub fn collection(&self) -> &'static str {
        self.entity_type.collection_name()
    }
}

impl fmt::Display for CollectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "users/{}/{}", self.owner_id, self.collection())
    }
}

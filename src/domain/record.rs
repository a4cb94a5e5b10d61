// ==========================================
// Humidor Hub - Typed records
// ==========================================
// FieldValue / TypedRecord: per-row coercion output
// CatalogEntity: field-level access shared by the
//   coercion engine and the tabular serializer
// CatalogRecord: tagged union of concrete entities
// ==========================================

use crate::domain::cigar::CigarRecord;
use crate::domain::humidor::HumidorRecord;
use crate::domain::types::EntityType;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Key injected into cigar records for the owning humidor
pub const HUMIDOR_REF_KEY: &str = "humidorId";

// ==========================================
// FieldValue
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Empty string / empty list count as "no value"
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Number(_) | FieldValue::Flag(_) | FieldValue::Timestamp(_) => false,
        }
    }
}

/// ISO-8601 rendering used for stored and exported dates
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Drop sub-millisecond precision, the finest unit `format_timestamp` writes
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(3)
}

// ==========================================
// TypedRecord
// ==========================================
// Lenient keys hold a value produced by a fallback
// (numeric zero for an empty or non-numeric cell).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedRecord {
    values: BTreeMap<&'static str, FieldValue>,
    lenient: BTreeSet<&'static str>,
}

impl TypedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, value: FieldValue) {
        self.lenient.remove(key);
        self.values.insert(key, value);
    }

    pub fn insert_lenient(&mut self, key: &'static str, value: FieldValue) {
        self.values.insert(key, value);
        self.lenient.insert(key);
    }

    /// Insert only when the key holds no value yet
    pub fn insert_default(&mut self, key: &'static str, value: FieldValue) {
        if !self.values.contains_key(key) {
            self.values.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_lenient(&self, key: &str) -> bool {
        self.lenient.contains(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&&'static str, &FieldValue)> {
        self.values.iter()
    }

    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(FieldValue::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(FieldValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key) {
            Some(FieldValue::List(items)) => Some(items.clone()),
            _ => None,
        }
    }

    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.get(key) {
            Some(FieldValue::Timestamp(ts)) => Some(*ts),
            _ => None,
        }
    }
}

// ==========================================
// CatalogEntity
// ==========================================
pub trait CatalogEntity: Serialize + DeserializeOwned + Clone + Send + Sync {
    const ENTITY_TYPE: EntityType;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Value of a schema field, None when the field is unset
    fn field_value(&self, key: &str) -> Option<FieldValue>;

    /// Build the entity from a coerced row whose defaults are already injected
    fn from_typed(record: &TypedRecord) -> Self;
}

// ==========================================
// CatalogRecord - tagged union
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogRecord {
    Cigar(CigarRecord),
    Humidor(HumidorRecord),
}

impl CatalogRecord {
    pub fn from_typed(entity_type: EntityType, record: &TypedRecord) -> Self {
        match entity_type {
            EntityType::Cigar => CatalogRecord::Cigar(CigarRecord::from_typed(record)),
            EntityType::Humidor => CatalogRecord::Humidor(HumidorRecord::from_typed(record)),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            CatalogRecord::Cigar(_) => EntityType::Cigar,
            CatalogRecord::Humidor(_) => EntityType::Humidor,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            CatalogRecord::Cigar(c) => c.id(),
            CatalogRecord::Humidor(h) => h.id(),
        }
    }

    pub fn set_id(&mut self, id: String) {
        match self {
            CatalogRecord::Cigar(c) => c.set_id(id),
            CatalogRecord::Humidor(h) => h.set_id(id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogRecord::Cigar(c) => &c.name,
            CatalogRecord::Humidor(h) => &h.name,
        }
    }

    pub fn field_value(&self, key: &str) -> Option<FieldValue> {
        match self {
            CatalogRecord::Cigar(c) => c.field_value(key),
            CatalogRecord::Humidor(h) => h.field_value(key),
        }
    }

    /// JSON body as stored in the document store (the id lives outside the body)
    pub fn to_document_body(&self) -> serde_json::Result<serde_json::Value> {
        let mut body = serde_json::to_value(self)?;
        if let Some(object) = body.as_object_mut() {
            object.remove("id");
        }
        Ok(body)
    }
}

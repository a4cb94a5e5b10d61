// ==========================================
// Humidor Hub - Cigar entity
// ==========================================
// Persisted shape: camelCase keys, except the two
// legacy snake_case dimensions (length_inches, ring_gauge).
// humidorId is a weak reference; orphans are tolerated.
// ==========================================

use crate::domain::record::{
    truncate_to_millis, CatalogEntity, FieldValue, TypedRecord, HUMIDOR_REF_KEY,
};
use crate::domain::types::EntityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CigarRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_box_press: Option<bool>,
    #[serde(rename = "length_inches", default, skip_serializing_if = "Option::is_none")]
    pub length_inches: Option<f64>,
    #[serde(rename = "ring_gauge", default, skip_serializing_if = "Option::is_none")]
    pub ring_gauge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    // ===== Blend =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(default)]
    pub flavor_notes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub date_added: DateTime<Utc>,
    pub humidor_id: String,
}

/// Number to a stock count (negative and NaN clamp to 0)
///
/// Import rejects fractional and negative counts before this runs.
fn to_quantity(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.trunc().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

fn text(value: &Option<String>) -> Option<FieldValue> {
    value.clone().map(FieldValue::Text)
}

impl CatalogEntity for CigarRecord {
    const ENTITY_TYPE: EntityType = EntityType::Cigar;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn field_value(&self, key: &str) -> Option<FieldValue> {
        match key {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "brand" => Some(FieldValue::Text(self.brand.clone())),
            "line" => text(&self.line),
            "shape" => text(&self.shape),
            "isBoxPress" => self.is_box_press.map(FieldValue::Flag),
            "length_inches" => self.length_inches.map(FieldValue::Number),
            "ring_gauge" => self.ring_gauge.map(FieldValue::Number),
            "size" => text(&self.size),
            "country" => text(&self.country),
            "wrapper" => text(&self.wrapper),
            "binder" => text(&self.binder),
            "filler" => text(&self.filler),
            "strength" => text(&self.strength),
            "flavorNotes" => Some(FieldValue::List(self.flavor_notes.clone())),
            "rating" => self.rating.map(FieldValue::Number),
            "userRating" => self.user_rating.map(FieldValue::Number),
            "price" => self.price.map(FieldValue::Number),
            "quantity" => Some(FieldValue::Number(f64::from(self.quantity))),
            "image" => text(&self.image),
            "shortDescription" => text(&self.short_description),
            "description" => text(&self.description),
            "dateAdded" => Some(FieldValue::Timestamp(self.date_added)),
            HUMIDOR_REF_KEY => Some(FieldValue::Text(self.humidor_id.clone())),
            _ => None,
        }
    }

    fn from_typed(record: &TypedRecord) -> Self {
        Self {
            id: None,
            name: record.text("name").unwrap_or_default(),
            brand: record.text("brand").unwrap_or_default(),
            line: record.text("line"),
            shape: record.text("shape"),
            is_box_press: record.flag("isBoxPress"),
            length_inches: record.number("length_inches"),
            ring_gauge: record.number("ring_gauge"),
            size: record.text("size"),
            country: record.text("country"),
            wrapper: record.text("wrapper"),
            binder: record.text("binder"),
            filler: record.text("filler"),
            strength: record.text("strength"),
            flavor_notes: record.list("flavorNotes").unwrap_or_default(),
            rating: record.number("rating"),
            user_rating: record.number("userRating"),
            price: record.number("price"),
            quantity: record.number("quantity").map(to_quantity).unwrap_or(0),
            image: record.text("image"),
            short_description: record.text("shortDescription"),
            description: record.text("description"),
            date_added: record
                .timestamp("dateAdded")
                .unwrap_or_else(|| truncate_to_millis(Utc::now())),
            humidor_id: record.text(HUMIDOR_REF_KEY).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_quantity() {
        assert_eq!(to_quantity(3.0), 3);
        assert_eq!(to_quantity(2.9), 2);
        assert_eq!(to_quantity(-4.0), 0);
        assert_eq!(to_quantity(f64::NAN), 0);
    }

    #[test]
    fn test_wire_shape_uses_legacy_dimension_keys() {
        let mut record = TypedRecord::new();
        record.insert("name", FieldValue::Text("Hemingway".into()));
        record.insert("brand", FieldValue::Text("Arturo Fuente".into()));
        record.insert("length_inches", FieldValue::Number(4.75));
        record.insert("quantity", FieldValue::Number(5.0));
        record.insert(HUMIDOR_REF_KEY, FieldValue::Text("h1".into()));

        let cigar = CigarRecord::from_typed(&record);
        let json = serde_json::to_value(&cigar).unwrap();

        assert_eq!(json["length_inches"], 4.75);
        assert_eq!(json["humidorId"], "h1");
        assert_eq!(json["flavorNotes"], serde_json::json!([]));
        assert!(json.get("price").is_none());
        assert!(json.get("id").is_none());
    }
}

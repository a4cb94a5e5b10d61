// ==========================================
// Humidor Hub - Humidor entity
// ==========================================

use crate::domain::record::{CatalogEntity, FieldValue, TypedRecord};
use crate::domain::types::EntityType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumidorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub humidor_type: Option<String>,

    // ===== Environment =====
    pub temp: f64,
    pub humidity: f64,

    // ===== Sensor link =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub govee_device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub govee_device_model: Option<String>,
}

impl CatalogEntity for HumidorRecord {
    const ENTITY_TYPE: EntityType = EntityType::Humidor;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn field_value(&self, key: &str) -> Option<FieldValue> {
        let text = |value: &Option<String>| value.clone().map(FieldValue::Text);
        match key {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "shortDescription" => text(&self.short_description),
            "longDescription" => text(&self.long_description),
            "size" => text(&self.size),
            "location" => text(&self.location),
            "image" => text(&self.image),
            "type" => text(&self.humidor_type),
            "temp" => Some(FieldValue::Number(self.temp)),
            "humidity" => Some(FieldValue::Number(self.humidity)),
            "goveeDeviceId" => text(&self.govee_device_id),
            "goveeDeviceModel" => text(&self.govee_device_model),
            _ => None,
        }
    }

    fn from_typed(record: &TypedRecord) -> Self {
        Self {
            id: None,
            name: record.text("name").unwrap_or_default(),
            short_description: record.text("shortDescription"),
            long_description: record.text("longDescription"),
            size: record.text("size"),
            location: record.text("location"),
            image: record.text("image"),
            humidor_type: record.text("type"),
            temp: record.number("temp").unwrap_or_default(),
            humidity: record.number("humidity").unwrap_or_default(),
            govee_device_id: record.text("goveeDeviceId"),
            govee_device_model: record.text("goveeDeviceModel"),
        }
    }
}

// ==========================================
// Humidor Hub - Schema registry
// ==========================================
// One field list per entity. The same table drives
// import auto-mapping (label / key / export column)
// and the export header row, so the two can't drift.
// ==========================================

use crate::domain::types::{EntityType, ValueType};
use serde::Serialize;

/// Leading export column carrying the document id
pub const ID_COLUMN: &str = "id";

/// One importable/exportable attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Key in the persisted document (unique within a schema)
    pub key: &'static str,
    /// Human readable column name
    pub label: &'static str,
    /// Column name written by the CSV export
    pub export_column: &'static str,
    pub required: bool,
    pub value_type: ValueType,
}

const fn field(
    key: &'static str,
    label: &'static str,
    export_column: &'static str,
    required: bool,
    value_type: ValueType,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        export_column,
        required,
        value_type,
    }
}

// ==========================================
// Cigar schema (22 fields)
// ==========================================
pub static CIGAR_FIELDS: [FieldSpec; 22] = [
    field("name", "Name", "name", true, ValueType::String),
    field("brand", "Brand", "brand", true, ValueType::String),
    field("line", "Line", "line", false, ValueType::String),
    field("shape", "Shape", "shape", false, ValueType::String),
    field("isBoxPress", "Box Press", "isBoxPress", false, ValueType::Boolean),
    field("length_inches", "Length (in)", "length_inches", false, ValueType::Number),
    field("ring_gauge", "Ring Gauge", "ring_gauge", false, ValueType::Number),
    field("size", "Size", "Size", false, ValueType::String),
    field("country", "Country of Origin", "Country of Origin", false, ValueType::String),
    field("wrapper", "Wrapper", "wrapper", false, ValueType::String),
    field("binder", "Binder", "binder", false, ValueType::String),
    field("filler", "Filler", "filler", false, ValueType::String),
    field("strength", "Strength", "strength", false, ValueType::String),
    field("flavorNotes", "Flavor Notes", "flavorNotes", false, ValueType::StringArray),
    field("rating", "Rating", "rating", false, ValueType::Number),
    field("userRating", "User Rating", "userRating", false, ValueType::Number),
    field("price", "Price", "price", false, ValueType::Number),
    field("quantity", "Quantity", "quantity", true, ValueType::Number),
    field("image", "Image URL", "image", false, ValueType::String),
    field("shortDescription", "Short Description", "shortDescription", false, ValueType::String),
    field("description", "Description", "description", false, ValueType::String),
    field("dateAdded", "Date Added", "dateAdded", false, ValueType::IsoDate),
];

// ==========================================
// Humidor schema (11 fields)
// ==========================================
pub static HUMIDOR_FIELDS: [FieldSpec; 11] = [
    field("name", "Name", "name", true, ValueType::String),
    field("shortDescription", "Short Description", "shortDescription", false, ValueType::String),
    field("longDescription", "Long Description", "longDescription", false, ValueType::String),
    field("size", "Size", "size", false, ValueType::String),
    field("location", "Location", "location", false, ValueType::String),
    field("image", "Image URL", "image", false, ValueType::String),
    field("type", "Type", "type", false, ValueType::String),
    field("temp", "Temperature", "temp", false, ValueType::Number),
    field("humidity", "Humidity", "humidity", false, ValueType::Number),
    field("goveeDeviceId", "Govee Device ID", "goveeDeviceId", false, ValueType::String),
    field("goveeDeviceModel", "Govee Device Model", "goveeDeviceModel", false, ValueType::String),
];

/// Field list of an entity type
pub fn get_schema(entity_type: EntityType) -> &'static [FieldSpec] {
    match entity_type {
        EntityType::Cigar => &CIGAR_FIELDS,
        EntityType::Humidor => &HUMIDOR_FIELDS,
    }
}

pub fn find_field(entity_type: EntityType, key: &str) -> Option<&'static FieldSpec> {
    get_schema(entity_type).iter().find(|spec| spec.key == key)
}

pub fn required_fields(entity_type: EntityType) -> impl Iterator<Item = &'static FieldSpec> {
    get_schema(entity_type).iter().filter(|spec| spec.required)
}

/// Export header row: `id` followed by every field's export column
pub fn export_headers(entity_type: EntityType) -> Vec<&'static str> {
    std::iter::once(ID_COLUMN)
        .chain(get_schema(entity_type).iter().map(|spec| spec.export_column))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_sizes_and_required_fields() {
        assert_eq!(get_schema(EntityType::Cigar).len(), 22);
        assert_eq!(get_schema(EntityType::Humidor).len(), 11);

        let cigar_required: Vec<&str> = required_fields(EntityType::Cigar).map(|f| f.key).collect();
        assert_eq!(cigar_required, vec!["name", "brand", "quantity"]);

        let humidor_required: Vec<&str> =
            required_fields(EntityType::Humidor).map(|f| f.key).collect();
        assert_eq!(humidor_required, vec!["name"]);
    }

    #[test]
    fn test_keys_are_unique() {
        for entity in [EntityType::Cigar, EntityType::Humidor] {
            let keys: HashSet<&str> = get_schema(entity).iter().map(|f| f.key).collect();
            assert_eq!(keys.len(), get_schema(entity).len(), "duplicate key in {}", entity);
        }
    }

    #[test]
    fn test_cigar_export_headers() {
        assert_eq!(
            export_headers(EntityType::Cigar).join(","),
            "id,name,brand,line,shape,isBoxPress,length_inches,ring_gauge,Size,Country of Origin,\
wrapper,binder,filler,strength,flavorNotes,rating,userRating,price,quantity,image,\
shortDescription,description,dateAdded"
        );
    }

    #[test]
    fn test_humidor_export_headers() {
        assert_eq!(
            export_headers(EntityType::Humidor).join(","),
            "id,name,shortDescription,longDescription,size,location,image,type,temp,humidity,\
goveeDeviceId,goveeDeviceModel"
        );
    }

    #[test]
    fn test_find_field() {
        let spec = find_field(EntityType::Cigar, "flavorNotes").unwrap();
        assert_eq!(spec.value_type, ValueType::StringArray);
        assert!(find_field(EntityType::Humidor, "flavorNotes").is_none());
    }
}

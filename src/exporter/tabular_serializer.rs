// ==========================================
// Humidor Hub - Tabular serializer
// ==========================================
// CSV: unquoted header row from the schema, every data
//      value quote-wrapped (internal quotes doubled),
//      fields split by the configured delimiter
// JSON: pretty printed, 2-space indent, ids included
// ==========================================

use crate::domain::record::{format_timestamp, CatalogEntity, FieldValue};
use crate::domain::schema::{export_headers, get_schema};
use crate::exporter::error::ExportResult;
use crate::importer::data_cleaner::DataCleaner;
use crate::repository::StoredDocument;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Text form of a value inside a CSV cell
pub fn render_cell(value: Option<&FieldValue>) -> String {
    match value {
        None => String::new(),
        Some(FieldValue::Text(text)) => text.clone(),
        Some(FieldValue::Number(n)) => n.to_string(),
        Some(FieldValue::Flag(true)) => "TRUE".to_string(),
        Some(FieldValue::Flag(false)) => "FALSE".to_string(),
        Some(FieldValue::List(items)) => DataCleaner::join_list(items),
        Some(FieldValue::Timestamp(ts)) => format_timestamp(ts),
    }
}

/// Serialize records as CSV
///
/// # Arguments
/// - delimiter: field separator, the same byte the importer splits on
///
/// # Returns
/// - header line + one line per record, each ending in "\n"
pub fn serialize_csv<E: CatalogEntity>(records: &[E], delimiter: u8) -> ExportResult<String> {
    let mut output = export_headers(E::ENTITY_TYPE).join(&char::from(delimiter).to_string());
    output.push('\n');

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let schema = get_schema(E::ENTITY_TYPE);
    for record in records {
        let mut row = Vec::with_capacity(schema.len() + 1);
        row.push(record.id().unwrap_or_default().to_string());
        for spec in schema {
            row.push(render_cell(record.field_value(spec.key).as_ref()));
        }
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| crate::exporter::error::ExportError::CsvWriteError(e.to_string()))?;
    output.push_str(&String::from_utf8(bytes)?);

    Ok(output)
}

/// Serialize records as pretty JSON (array)
pub fn serialize_json<E: Serialize>(records: &[E]) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Decode stored documents into entities, re-attaching the document id
///
/// Documents that no longer match the entity shape are skipped.
pub fn decode_documents<E: CatalogEntity>(documents: Vec<StoredDocument>) -> Vec<E> {
    documents
        .into_iter()
        .filter_map(|document| {
            let StoredDocument { id, mut body, .. } = document;
            if let Value::Object(map) = &mut body {
                map.insert("id".to_string(), Value::String(id.clone()));
            }
            match serde_json::from_value::<E>(body) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    warn!(doc_id = %id, entity = %E::ENTITY_TYPE, error = %e, "undecodable document skipped");
                    None
                }
            }
        })
        .collect()
}

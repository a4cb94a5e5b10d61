// ==========================================
// Humidor Hub - Field mapper
// ==========================================
// Auto-mapping: normalized exact match of a header against
// the field's label, key or export column. No fuzzy matching.
// ==========================================

use crate::domain::mapping::ColumnMapping;
use crate::domain::schema::FieldSpec;
use crate::importer::catalog_importer_trait::FieldMapper as FieldMapperTrait;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMapper;

/// Lowercase, whitespace and underscores removed
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FieldMapper {
    /// Normalized names a header may carry to map onto this field
    fn candidates(spec: &FieldSpec) -> [String; 3] {
        [
            normalize(spec.label),
            normalize(spec.key),
            normalize(spec.export_column),
        ]
    }
}

impl FieldMapperTrait for FieldMapper {
    fn propose_mapping(&self, headers: &[String], schema: &[FieldSpec]) -> ColumnMapping {
        let normalized: Vec<String> = headers.iter().map(|h| normalize(h)).collect();
        let mut mapping = ColumnMapping::unmapped(schema);

        for spec in schema {
            let candidates = Self::candidates(spec);
            // Header order decides: first matching header wins
            let hit = normalized
                .iter()
                .position(|header| !header.is_empty() && candidates.contains(header));

            if let Some(index) = hit {
                debug!(field = spec.key, column = %headers[index], "auto-mapped");
                mapping.assign(spec.key, headers[index].clone());
            }
        }

        mapping
    }

    fn missing_required(
        &self,
        mapping: &ColumnMapping,
        schema: &[FieldSpec],
    ) -> Vec<&'static str> {
        schema
            .iter()
            .filter(|spec| spec.required && mapping.column_for(spec.key).is_none())
            .map(|spec| spec.key)
            .collect()
    }
}

// ==========================================
// Humidor Hub - Import session state machine
// ==========================================
// SelectFile -> MapFields -> Importing -> Complete
// - reset:      MapFields -> SelectFile
// - fail:       Importing -> SelectFile
// - start_over: Complete  -> SelectFile
// Any other transition is an InvalidTransition error.
// ==========================================

use crate::domain::import::ImportSummary;
use crate::domain::mapping::{ColumnMapping, RawTable};
use crate::domain::schema::{find_field, get_schema};
use crate::domain::types::EntityType;
use crate::importer::catalog_importer_trait::FieldMapper as FieldMapperTrait;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use std::mem;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum ImportStage {
    SelectFile,
    MapFields {
        table: RawTable,
        mapping: ColumnMapping,
    },
    Importing {
        table: RawTable,
        mapping: ColumnMapping,
    },
    Complete {
        summary: ImportSummary,
    },
}

impl ImportStage {
    pub fn name(&self) -> &'static str {
        match self {
            ImportStage::SelectFile => "select_file",
            ImportStage::MapFields { .. } => "map_fields",
            ImportStage::Importing { .. } => "importing",
            ImportStage::Complete { .. } => "complete",
        }
    }
}

#[derive(Debug)]
pub struct ImportSession {
    entity_type: EntityType,
    stage: ImportStage,
    mapper: FieldMapper,
}

impl ImportSession {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            stage: ImportStage::SelectFile,
            mapper: FieldMapper,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn stage(&self) -> &ImportStage {
        &self.stage
    }

    fn invalid(&self, to: &str) -> ImportError {
        ImportError::InvalidTransition {
            from: self.stage.name().to_string(),
            to: to.to_string(),
        }
    }

    // ===== SelectFile =====

    /// Accept a parsed file and propose the initial mapping
    pub fn load_table(&mut self, table: RawTable) -> ImportResult<&ColumnMapping> {
        if !matches!(self.stage, ImportStage::SelectFile) {
            return Err(self.invalid("map_fields"));
        }

        let mapping = self
            .mapper
            .propose_mapping(&table.headers, get_schema(self.entity_type));
        info!(
            entity = %self.entity_type,
            rows = table.row_count(),
            auto_mapped = mapping.mapped_count(),
            "file loaded"
        );

        self.stage = ImportStage::MapFields { table, mapping };
        match &self.stage {
            ImportStage::MapFields { mapping, .. } => Ok(mapping),
            _ => Err(self.invalid("map_fields")),
        }
    }

    // ===== MapFields =====

    pub fn table(&self) -> Option<&RawTable> {
        match &self.stage {
            ImportStage::MapFields { table, .. } | ImportStage::Importing { table, .. } => {
                Some(table)
            }
            _ => None,
        }
    }

    pub fn mapping(&self) -> Option<&ColumnMapping> {
        match &self.stage {
            ImportStage::MapFields { mapping, .. } | ImportStage::Importing { mapping, .. } => {
                Some(mapping)
            }
            _ => None,
        }
    }

    fn editable(&mut self) -> ImportResult<(&RawTable, &mut ColumnMapping)> {
        match &mut self.stage {
            ImportStage::MapFields { table, mapping } => Ok((table, mapping)),
            other => Err(ImportError::InvalidTransition {
                from: other.name().to_string(),
                to: "map_fields".to_string(),
            }),
        }
    }

    /// Map a field to a header of the loaded file
    pub fn assign(&mut self, key: &str, column: &str) -> ImportResult<()> {
        if find_field(self.entity_type, key).is_none() {
            return Err(ImportError::UnknownField(key.to_string()));
        }

        let (table, mapping) = self.editable()?;
        if !table.has_header(column) {
            return Err(ImportError::UnknownColumn(column.to_string()));
        }

        mapping.assign(key, column);
        debug!(field = key, column, "mapping overridden");
        Ok(())
    }

    /// Mark a field "do not import"
    pub fn skip(&mut self, key: &str) -> ImportResult<()> {
        if find_field(self.entity_type, key).is_none() {
            return Err(ImportError::UnknownField(key.to_string()));
        }

        let (_, mapping) = self.editable()?;
        mapping.skip(key);
        debug!(field = key, "field skipped");
        Ok(())
    }

    /// Required fields still mapped to Skip (empty outside MapFields/Importing)
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.mapping()
            .map(|m| self.mapper.missing_required(m, get_schema(self.entity_type)))
            .unwrap_or_default()
    }

    pub fn is_mapping_valid(&self) -> bool {
        self.mapping().is_some() && self.missing_required().is_empty()
    }

    /// Discard the loaded file
    pub fn reset(&mut self) -> ImportResult<()> {
        if !matches!(self.stage, ImportStage::MapFields { .. }) {
            return Err(self.invalid("select_file"));
        }
        self.stage = ImportStage::SelectFile;
        Ok(())
    }

    /// Freeze the mapping and enter Importing
    pub fn begin_import(&mut self) -> ImportResult<()> {
        if !matches!(self.stage, ImportStage::MapFields { .. }) {
            return Err(self.invalid("importing"));
        }

        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(ImportError::IncompleteMapping {
                missing: missing.into_iter().map(str::to_string).collect(),
            });
        }

        self.stage = match mem::replace(&mut self.stage, ImportStage::SelectFile) {
            ImportStage::MapFields { table, mapping } => ImportStage::Importing { table, mapping },
            other => other,
        };
        Ok(())
    }

    // ===== Importing =====

    pub fn finish(&mut self, summary: ImportSummary) -> ImportResult<()> {
        if !matches!(self.stage, ImportStage::Importing { .. }) {
            return Err(self.invalid("complete"));
        }
        self.stage = ImportStage::Complete { summary };
        Ok(())
    }

    /// The attempt failed; back to file selection
    pub fn fail(&mut self) -> ImportResult<()> {
        if !matches!(self.stage, ImportStage::Importing { .. }) {
            return Err(self.invalid("select_file"));
        }
        self.stage = ImportStage::SelectFile;
        Ok(())
    }

    // ===== Complete =====

    pub fn summary(&self) -> Option<&ImportSummary> {
        match &self.stage {
            ImportStage::Complete { summary } => Some(summary),
            _ => None,
        }
    }

    /// Start a new import, possibly for the other entity type
    pub fn start_over(&mut self, entity_type: EntityType) -> ImportResult<()> {
        if !matches!(self.stage, ImportStage::Complete { .. }) {
            return Err(self.invalid("select_file"));
        }
        self.entity_type = entity_type;
        self.stage = ImportStage::SelectFile;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_table() -> RawTable {
        RawTable::new(
            vec!["CigarName".into(), "Maker".into(), "Count".into()],
            vec![
                vec!["Hemingway".into(), "Arturo Fuente".into(), "5".into()],
                vec!["1964".into(), "Padron".into(), "3".into()],
            ],
        )
    }

    fn summary() -> ImportSummary {
        ImportSummary {
            batch_id: "b1".into(),
            entity_type: EntityType::Cigar,
            total_rows: 2,
            accepted: 2,
            rejected: 0,
            written: 2,
            rejections: Vec::new(),
            dry_run: false,
            elapsed_ms: 1,
        }
    }

    #[test]
    fn test_manual_mapping_unblocks_import() {
        let mut session = ImportSession::new(EntityType::Cigar);
        let mapping = session.load_table(scenario_table()).unwrap();
        assert_eq!(mapping.mapped_count(), 0);

        let err = session.begin_import().unwrap_err();
        assert!(matches!(err, ImportError::IncompleteMapping { ref missing } if missing.len() == 3));
        assert_eq!(session.stage().name(), "map_fields");

        session.assign("name", "CigarName").unwrap();
        session.assign("brand", "Maker").unwrap();
        session.assign("quantity", "Count").unwrap();
        assert!(session.is_mapping_valid());

        session.begin_import().unwrap();
        assert_eq!(session.stage().name(), "importing");
        assert_eq!(session.mapping().unwrap().column_for("quantity"), Some("Count"));

        session.finish(summary()).unwrap();
        assert_eq!(session.summary().unwrap().written, 2);

        session.start_over(EntityType::Humidor).unwrap();
        assert_eq!(session.stage(), &ImportStage::SelectFile);
        assert_eq!(session.entity_type(), EntityType::Humidor);
    }

    #[test]
    fn test_overrides_are_validated() {
        let mut session = ImportSession::new(EntityType::Cigar);
        session.load_table(scenario_table()).unwrap();

        assert!(matches!(
            session.assign("nickname", "CigarName"),
            Err(ImportError::UnknownField(_))
        ));
        assert!(matches!(
            session.assign("name", "Cigar Name"),
            Err(ImportError::UnknownColumn(_))
        ));
        assert!(matches!(session.skip("temp"), Err(ImportError::UnknownField(_))));
    }

    #[test]
    fn test_skipping_required_field_blocks_import() {
        let mut session = ImportSession::new(EntityType::Cigar);
        session.load_table(scenario_table()).unwrap();
        session.assign("name", "CigarName").unwrap();
        session.assign("brand", "Maker").unwrap();
        session.assign("quantity", "Count").unwrap();
        session.skip("brand").unwrap();

        assert_eq!(session.missing_required(), vec!["brand"]);
        assert!(session.begin_import().is_err());
    }

    #[test]
    fn test_illegal_transitions() {
        let mut session = ImportSession::new(EntityType::Humidor);

        assert!(matches!(
            session.begin_import(),
            Err(ImportError::InvalidTransition { .. })
        ));
        assert!(session.reset().is_err());
        assert!(session.finish(summary()).is_err());
        assert!(session.start_over(EntityType::Cigar).is_err());
        assert!(session.assign("name", "Name").is_err());

        session.load_table(scenario_table()).unwrap();
        assert!(session.load_table(scenario_table()).is_err());

        session.reset().unwrap();
        assert_eq!(session.stage(), &ImportStage::SelectFile);
    }

    #[test]
    fn test_failure_returns_to_file_selection() {
        let mut session = ImportSession::new(EntityType::Humidor);
        let table = RawTable::new(vec!["Name".into()], vec![vec!["Desktop".into()]]);
        session.load_table(table).unwrap();
        session.begin_import().unwrap();

        session.fail().unwrap();
        assert_eq!(session.stage(), &ImportStage::SelectFile);
        assert!(session.mapping().is_none());
    }
}

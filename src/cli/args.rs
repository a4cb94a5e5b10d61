//! CLI argument definitions using clap derive

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::app::DB_PATH_ENV;
use crate::domain::types::{EntityType, ExportFormat};

#[derive(Parser)]
#[command(name = "humidor-hub")]
#[command(author, version, about = "Import and export a cigar collection catalog")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Database file (default: user data directory)
    #[arg(long, global = true, env = DB_PATH_ENV)]
    pub db: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a CSV or Excel file into a collection
    Import(ImportArgs),

    /// Export a collection as CSV or JSON
    Export(ExportArgs),

    /// Show the mapping that would be proposed for a file
    Mapping(MappingArgs),

    /// List the fields of an entity type
    Fields(FieldsArgs),

    /// Read or change import settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Entity type (cigar or humidor)
    pub entity: EntityType,

    /// File to import
    pub file: PathBuf,

    /// Owner of the target collection
    #[arg(long)]
    pub owner: String,

    /// Humidor receiving imported cigars
    #[arg(long)]
    pub humidor: Option<String>,

    /// Map a field to a column: --map quantity=Count
    #[arg(long = "map", value_name = "KEY=COLUMN", value_parser = parse_key_value)]
    pub map: Vec<(String, String)>,

    /// Do not import a field
    #[arg(long = "skip", value_name = "KEY")]
    pub skip: Vec<String>,

    /// Parse, map and validate without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Entity type (cigar or humidor)
    pub entity: EntityType,

    /// Owner of the collection
    #[arg(long)]
    pub owner: String,

    /// Output format
    #[arg(long, default_value = "csv")]
    pub format: ExportFormat,

    /// Only cigars of this humidor
    #[arg(long)]
    pub humidor: Option<String>,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MappingArgs {
    /// Entity type (cigar or humidor)
    pub entity: EntityType,

    /// File to inspect
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Entity type (cigar or humidor)
    pub entity: EntityType,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show one setting
    Get { key: String },

    /// Change one setting
    Set { key: String, value: String },

    /// Show every setting
    List,
}

/// Parse "key=value" (the value may itself contain '=')
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=COLUMN, got '{}'", s))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("quantity=Count"),
            Ok(("quantity".to_string(), "Count".to_string()))
        );
        assert_eq!(
            parse_key_value("name = Cigar Name"),
            Ok(("name".to_string(), "Cigar Name".to_string()))
        );
        assert!(parse_key_value("quantity").is_err());
        assert!(parse_key_value("=Count").is_err());
    }

    #[test]
    fn test_import_command_line() {
        let cli = Cli::try_parse_from([
            "humidor-hub",
            "import",
            "cigar",
            "inventory.csv",
            "--owner",
            "u1",
            "--humidor",
            "h1",
            "--map",
            "name=CigarName",
            "--map",
            "quantity=Count",
            "--skip",
            "price",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.entity, EntityType::Cigar);
                assert_eq!(args.map.len(), 2);
                assert_eq!(args.skip, vec!["price"]);
                assert!(args.dry_run);
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_export_format_parsed() {
        let cli = Cli::try_parse_from([
            "humidor-hub", "export", "humidor", "--owner", "u1", "--format", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Export(args) => assert_eq!(args.format, ExportFormat::Json),
            _ => panic!("expected export"),
        }
    }
}

//! Subcommand handlers

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::api::{ConfigItem, MappingPreview};
use crate::app::AppState;
use crate::cli::args::{ConfigCommands, ExportArgs, FieldsArgs, GlobalOpts, ImportArgs, MappingArgs};
use crate::domain::import::{ImportRequest, ImportSummary, MappingOverride};
use crate::domain::types::CollectionHandle;
use crate::api::ImportApi;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    let verb = if summary.dry_run { "would import" } else { "imported" };
    let count = if summary.dry_run { summary.accepted } else { summary.written };

    println!(
        "{} {} {} record(s) from {} row(s), {} rejected (batch {}, {} ms)",
        verb,
        count,
        summary.entity_type,
        summary.total_rows,
        summary.rejected,
        summary.batch_id,
        summary.elapsed_ms
    );
    for rejection in &summary.rejections {
        println!("  row {}: {}", rejection.row_number, rejection.reason);
    }
}

fn print_preview(preview: &MappingPreview) {
    println!(
        "{} row(s), columns: {}",
        preview.row_count,
        preview.headers.join(", ")
    );
    for entry in &preview.entries {
        println!("  {:<18} <- {}", entry.key, entry.target);
    }
    if preview.valid {
        println!("mapping is complete");
    } else {
        println!(
            "required field(s) not mapped: {} (use --map KEY=COLUMN)",
            preview.missing_required.join(", ")
        );
    }
}

pub async fn run_import(args: ImportArgs, state: &AppState, global: &GlobalOpts) -> Result<()> {
    let mut request = ImportRequest::new(CollectionHandle::new(args.owner, args.entity))
        .dry_run(args.dry_run);
    if let Some(humidor) = args.humidor {
        request = request.with_humidor(humidor);
    }
    for (key, column) in args.map {
        request = request.with_override(MappingOverride::Assign { key, column });
    }
    for key in args.skip {
        request = request.with_override(MappingOverride::Skip { key });
    }

    let file = args.file.to_string_lossy().to_string();
    let summary = state
        .import_api
        .import_file(&file, request)
        .await
        .with_context(|| format!("importing {}", file))?;

    if global.json {
        print_json(&summary)
    } else {
        print_summary(&summary);
        Ok(())
    }
}

pub async fn run_export(args: ExportArgs, state: &AppState) -> Result<()> {
    match &args.output {
        Some(path) => {
            let bytes = state
                .export_api
                .export_to_file(
                    path,
                    &args.owner,
                    args.entity,
                    args.format,
                    args.humidor.as_deref(),
                )
                .await?;
            eprintln!("wrote {} bytes to {}", bytes, path.display());
        }
        None => {
            let rendered = state
                .export_api
                .export(&args.owner, args.entity, args.format, args.humidor.as_deref())
                .await?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub async fn run_mapping(args: MappingArgs, state: &AppState, global: &GlobalOpts) -> Result<()> {
    let file = args.file.to_string_lossy().to_string();
    let preview = state
        .import_api
        .preview_mapping(&file, args.entity)
        .await
        .with_context(|| format!("reading {}", file))?;

    if global.json {
        print_json(&preview)
    } else {
        print_preview(&preview);
        Ok(())
    }
}

pub fn run_fields(args: FieldsArgs, global: &GlobalOpts) -> Result<()> {
    let fields = ImportApi::list_fields(args.entity);
    if global.json {
        return print_json(fields);
    }

    println!("{:<18} {:<20} {:<12} required", "key", "label", "type");
    for spec in fields {
        println!(
            "{:<18} {:<20} {:<12} {}",
            spec.key,
            spec.label,
            spec.value_type.to_string(),
            if spec.required { "yes" } else { "" }
        );
    }
    Ok(())
}

pub fn run_config(cmd: ConfigCommands, state: &AppState, global: &GlobalOpts) -> Result<()> {
    let print_item = |item: &ConfigItem| {
        let origin = if item.is_set { "" } else { " (default)" };
        println!("{} = {}{}", item.key, item.value, origin);
    };

    match cmd {
        ConfigCommands::Get { key } => {
            let item = state.config_api.get_config(&key)?;
            if global.json {
                return print_json(&item);
            }
            print_item(&item);
        }
        ConfigCommands::Set { key, value } => {
            state.config_api.set_config(&key, &value)?;
            println!("{} = {}", key, value);
        }
        ConfigCommands::List => {
            let items = state.config_api.list_configs()?;
            if global.json {
                return print_json(&items);
            }
            items.iter().for_each(print_item);
        }
    }
    Ok(())
}

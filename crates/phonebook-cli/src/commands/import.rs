use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::{ArgAction, Args};
use phonebook_import::{import_batch, parse_csv_file, ImportReport, RowError};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file with a header row
    pub file: PathBuf,
    /// Validate the file without writing anything
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct ImportSummary {
    accepted: usize,
    rejections: Vec<RowError>,
    dry_run: bool,
    report: Option<ImportReport>,
}

pub fn import_csv(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    if !args.dry_run {
        ctx.require_admin("import")?;
    }

    let parsed = parse_csv_file(&args.file)
        .with_context(|| format!("import {}", args.file.display()))?;
    let accepted = parsed.accepted.len();
    info!(
        accepted,
        rejected = parsed.rejections.len(),
        "csv validated"
    );

    let report = if args.dry_run {
        None
    } else {
        Some(import_batch(ctx.store, parsed.accepted))
    };

    let summary = ImportSummary {
        accepted,
        rejections: parsed.rejections,
        dry_run: args.dry_run,
        report,
    };
    if ctx.json {
        return print_json(&summary);
    }

    println!("accepted: {}", summary.accepted);
    if !summary.rejections.is_empty() {
        println!("rejected: {}", summary.rejections.len());
        for line in preview_lines(&summary.rejections, ctx.config.import.preview_rejections) {
            println!("  {line}");
        }
    }
    match &summary.report {
        Some(report) => {
            println!(
                "created: {}, duplicates: {}, failed: {}",
                report.created, report.duplicates, report.failed
            );
            for error in &report.errors {
                println!("  {error}");
            }
        }
        None => println!("dry run: nothing written"),
    }
    Ok(())
}

/// The first `limit` rejections, then a count of the rest.
fn preview_lines(rejections: &[RowError], limit: usize) -> Vec<String> {
    let mut lines = rejections
        .iter()
        .take(limit)
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    if rejections.len() > limit {
        lines.push(format!("and {} more", rejections.len() - limit));
    }
    lines
}

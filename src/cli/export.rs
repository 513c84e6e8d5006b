//! CLI command for data export

use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::error::{UserMgmtError, UserMgmtResult};
use crate::export::{export_full_json, export_full_yaml, FullExport};
use crate::storage::Repository;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON (machine-readable)
    Json,
    /// YAML (human-readable)
    Yaml,
}

/// Arguments of `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Handle the export command
pub fn handle_export_command(repo: &Repository, args: ExportArgs) -> UserMgmtResult<()> {
    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                UserMgmtError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            let export = write_export(repo, &mut writer, &args)?;
            writer
                .flush()
                .map_err(|e| UserMgmtError::Export(e.to_string()))?;

            eprintln!(
                "Exported {} users and {} audit entries to {}",
                export.metadata.user_count,
                export.metadata.log_count,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(repo, &mut writer, &args)?;
            writeln!(writer).map_err(|e| UserMgmtError::Export(e.to_string()))?;
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    repo: &Repository,
    writer: &mut W,
    args: &ExportArgs,
) -> UserMgmtResult<FullExport> {
    match args.format {
        ExportFormat::Json => export_full_json(repo, writer, args.pretty),
        ExportFormat::Yaml => export_full_yaml(repo, writer),
    }
}

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::expand::{ExpandError, Expander};
use crate::export::{self, ExportError, ExportFormat};

#[derive(Debug, Parser)]
#[command(name = "kwexpand", version, about = "Expand a keyword into related search phrases")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(short, long, env = "PORT", default_value_t = 5000)]
        port: u16,
    },
    /// Expand one keyword and print the results, or write CSV and JSON exports.
    Generate {
        keyword: String,
        /// Print as CSV or JSON instead of one keyword per line.
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
        /// Write `{keyword}-keywords.csv` and `.json` into this directory instead of printing.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error(transparent)]
    Expand(#[from] ExpandError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub async fn run_generate(
    expander: &Expander,
    keyword: &str,
    format: Option<ExportFormat>,
    out_dir: Option<&Path>,
) -> Result<(), CliError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(CliError::EmptyKeyword);
    }

    let keywords = expander.generate(keyword).await?;
    info!(keyword = %keyword, count = keywords.len(), "generate complete");

    if let Some(dir) = out_dir {
        for path in write_exports(dir, keyword, &keywords).await? {
            println!("{}", path.display());
        }
        return Ok(());
    }

    print!("{}", render_stdout(&keywords, format)?);
    Ok(())
}

fn render_stdout(keywords: &[String], format: Option<ExportFormat>) -> Result<String, ExportError> {
    match format {
        Some(ExportFormat::Json) => Ok(format!("{}\n", export::to_json(keywords)?)),
        Some(ExportFormat::Csv) => export::to_csv(keywords),
        None => Ok(keywords.iter().map(|k| format!("{k}\n")).collect()),
    }
}

async fn write_exports(
    dir: &Path,
    keyword: &str,
    keywords: &[String],
) -> Result<Vec<PathBuf>, CliError> {
    let mut written = Vec::new();
    for format in [ExportFormat::Csv, ExportFormat::Json] {
        let path = dir.join(export::attachment_filename(keyword, format));
        let body = export::render(keywords, format)?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "export written");
        written.push(path);
    }
    Ok(written)
}

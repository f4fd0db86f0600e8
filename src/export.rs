//! CSV and JSON renderings of a keyword list, one `Keywords` column/field per entry.

use serde::Serialize;

pub const COLUMN: &str = "Keywords";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Serialize)]
struct Row<'a> {
    #[serde(rename = "Keywords")]
    keyword: &'a str,
}

pub fn render(keywords: &[String], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(keywords),
        ExportFormat::Json => to_json(keywords),
    }
}

pub fn to_csv(keywords: &[String]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([COLUMN])?;
    for keyword in keywords {
        writer.write_record([keyword])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn to_json(keywords: &[String]) -> Result<String, ExportError> {
    let rows: Vec<Row<'_>> = keywords.iter().map(|k| Row { keyword: k }).collect();
    Ok(serde_json::to_string(&rows)?)
}

/// `{seed}-keywords.{ext}`, with characters that are unsafe in a file name replaced.
pub fn attachment_filename(seed: &str, format: ExportFormat) -> String {
    format!("{}-keywords.{}", sanitize_filename(seed), format.extension())
}

fn sanitize_filename(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

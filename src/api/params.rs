use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Seed phrase; surrounding whitespace is ignored.
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub keyword: String,
    pub keywords: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    /// Seed phrase, used only to name the attachment.
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Per-request limits and locations used by the HTTP handlers.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    /// Capacity, in chunks, of the channel between renderer and response body.
    pub pdf_channel_chunks: usize,
    pub static_root: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024,
            pdf_channel_chunks: 16,
            static_root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub logo_path: PathBuf,
    pub api: ApiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let api = ApiConfig::default();
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            db_path: PathBuf::from("./database.db"),
            logo_path: api.static_root.join("logo.png"),
            api,
        }
    }
}

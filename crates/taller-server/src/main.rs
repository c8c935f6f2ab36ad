#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use taller_server::{init_tracing, run, ApiConfig, ServerConfig};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_path(name: &str, default: PathBuf) -> PathBuf {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or(default)
}

fn config_from_env() -> ServerConfig {
    let defaults = ServerConfig::default();
    let static_root = env_path("TALLER_STATIC_ROOT", defaults.api.static_root.clone());
    let api = ApiConfig {
        max_body_bytes: env_usize("TALLER_MAX_BODY_BYTES", defaults.api.max_body_bytes),
        pdf_channel_chunks: env_usize(
            "TALLER_PDF_CHANNEL_CHUNKS",
            defaults.api.pdf_channel_chunks,
        ),
        static_root: static_root.clone(),
    };
    ServerConfig {
        bind_addr: env::var("TALLER_BIND").unwrap_or(defaults.bind_addr),
        db_path: env_path("TALLER_DB_PATH", defaults.db_path),
        logo_path: env_path("TALLER_LOGO_PATH", static_root.join("logo.png")),
        api,
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing(env_bool("TALLER_LOG_JSON", true));
    run(config_from_env()).await
}

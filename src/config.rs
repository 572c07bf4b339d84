use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

pub const DOCUMENT_FILE_NAME: &str = "writeups.json";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub document_path: PathBuf,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let document_path = env::var("WRITEUPS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_document_path());

        let addr = env::var("WRITEUPS_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let bind_addr: SocketAddr = addr
            .parse()
            .map_err(|e| AppError::BadRequest(format!("WRITEUPS_ADDR is invalid ({}): {}", addr, e)))?;

        Ok(Self {
            document_path,
            bind_addr,
        })
    }
}

/// `<XDG data home>/writeup-tracker/writeups.json`, or the working directory
/// when no home directory is known.
pub fn default_document_path() -> PathBuf {
    xdg::BaseDirectories::with_prefix("writeup-tracker")
        .get_data_home()
        .map(|dir| dir.join(DOCUMENT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DOCUMENT_FILE_NAME))
}

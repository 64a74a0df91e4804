//! Session files: the JSON export of a clinical session on disk.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use fluidvet_core::ClinicalSession;

/// Load and verify a session file.
pub fn load(path: &Path) -> Result<ClinicalSession> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file {}", path.display()))?;
    ClinicalSession::from_json(&json)
        .with_context(|| format!("Session file {} failed verification", path.display()))
}

/// Write a new session file. Refuses to overwrite an existing one.
pub fn create(path: &Path, session: &ClinicalSession) -> Result<()> {
    let json = session.to_json()?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("Failed to create session file {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Replace an existing session file with the updated session.
pub fn save(path: &Path, session: &ClinicalSession) -> Result<()> {
    let json = session.to_json()?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write session file {}", path.display()))
}

/*!
 * File system utilities for playmark.
 *
 * Thin wrappers around std::fs with consistent error context, plus
 * the output-path derivation used by the CLI entry points.
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use log::debug;

/// Utility for file system operations
pub struct FileManager;

impl FileManager {
    /// Check if a file exists and is a regular file
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        path.exists() && path.is_file()
    }

    /// Create a directory and its parents if missing
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Creating directory: {:?}", path);
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(anyhow!("File does not exist: {:?}", path));
        }
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }
        fs::write(path, content).with_context(|| format!("Failed to write file: {:?}", path))
    }

    /// Derive an output path from an input path by swapping the
    /// extension, e.g. `script.txt` to `script.play.json`.
    pub fn generate_output_path<P: AsRef<Path>>(input: P, extension: &str) -> PathBuf {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());

        let file_name = format!("{}.{}", stem, extension);
        match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
            _ => PathBuf::from(file_name),
        }
    }
}

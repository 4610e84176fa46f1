use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::source;

// @module: File and input utilities

/// What a command-line input argument refers to
#[derive(Debug, PartialEq, Eq)]
pub enum InputKind {
    /// Standard input (no argument or `-`)
    Stdin,
    /// An http(s) address
    Url,
    /// A local file
    File,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @detects: Whether an input argument names stdin, a URL or a file
    pub fn detect_input_kind(input: Option<&str>) -> InputKind {
        match input.map(str::trim) {
            None | Some("") | Some("-") => InputKind::Stdin,
            Some(value) if source::is_url(value) => InputKind::Url,
            Some(_) => InputKind::File,
        }
    }

    /// Read all of standard input
    pub fn read_stdin() -> Result<String> {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        Ok(text)
    }

    /// Read the text named by an input argument
    ///
    /// URLs are returned as-is for the source layer to resolve.
    pub fn read_input(input: Option<&str>) -> Result<String> {
        match Self::detect_input_kind(input) {
            InputKind::Stdin => Self::read_stdin(),
            InputKind::Url => Ok(input.unwrap_or_default().trim().to_string()),
            InputKind::File => {
                let path = input.unwrap_or_default();
                if !Self::file_exists(path) {
                    return Err(anyhow::anyhow!("Input file does not exist: {}", path));
                }
                Self::read_to_string(path)
            }
        }
    }
}

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Where decoded text ends up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl Destination {
    /// `-` means stdout, anything else is a path relative to the working
    /// directory.
    pub fn parse(raw: &str) -> Self {
        if raw == "-" {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(raw))
        }
    }

    /// Writes `text` in full. Files are replaced atomically: content goes to a
    /// temporary sibling which is then renamed over the target, so a failed
    /// write never leaves a truncated file behind.
    pub fn write(&self, text: &str, stdout: &mut dyn Write) -> Result<()> {
        match self {
            Destination::Stdout => stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(Error::Output),
            Destination::File(path) => write_file(path, text).map_err(|source| Error::Filesystem {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Stdout => f.write_str("stdout"),
        }
    }
}

fn write_file(path: &Path, text: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;

    tracing::debug!("wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Makes prompted input safe to embed in a file name: path separators,
/// characters Windows rejects and control characters become `_`, and leading
/// dots are dropped so input cannot climb out of the target directory.
pub fn sanitize_file_stem(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').trim_end_matches([' ', '.']);

    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned.to_string()
    }
}

//! Source locators.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use tessera_core::{Error, Result};

/// Where the bytes of a procurable source live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceLocator {
    /// A file on disk.
    Path(PathBuf),
    /// Bytes already in memory, e.g. from `include_bytes!`.
    Bytes(Cow<'static, [u8]>),
}

impl SourceLocator {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        SourceLocator::Path(path.into())
    }

    pub fn bytes(bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        SourceLocator::Bytes(bytes.into())
    }

    /// Reads the whole source.
    pub fn read(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            SourceLocator::Path(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|err| Error::io(format!("{}: {}", path.display(), err))),
            SourceLocator::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_ref())),
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocator::Path(path) => write!(f, "{}", path.display()),
            SourceLocator::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

//! JSON decoding of procured sources.

use serde::de::DeserializeOwned;
use std::cell::RefCell;
use tessera_core::{Error, Result};
use tracing::trace;

/// How a source is decoded.
///
/// | field         | default                         |
/// |---------------|---------------------------------|
/// | `date_format` | `None` (RFC 3339 date-times)    |
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeConfig {
    /// A `chrono` format string such as `%d/%m/%Y`, used by
    /// [`date::deserialize`](crate::date::deserialize).
    pub date_format: Option<String>,
}

impl DecodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

thread_local! {
    static ACTIVE: RefCell<Vec<DecodeConfig>> = const { RefCell::new(Vec::new()) };
}

/// Keeps a config installed for the current thread until dropped.
struct Installed;

impl Installed {
    fn new(config: &DecodeConfig) -> Self {
        ACTIVE.with(|stack| stack.borrow_mut().push(config.clone()));
        Installed
    }
}

impl Drop for Installed {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// The date format of the innermost `decode` call on this thread.
pub(crate) fn active_date_format() -> Option<String> {
    ACTIVE.with(|stack| stack.borrow().last().and_then(|c| c.date_format.clone()))
}

/// Converts a JSON failure into the crate error.
pub fn decode_error(err: serde_json::Error) -> Error {
    Error::decode(err.to_string())
}

/// Decodes a JSON array of `T`.
///
/// Empty or whitespace-only input is an empty source, not an error.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], config: &DecodeConfig) -> Result<Vec<T>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        trace!("empty source");
        return Ok(Vec::new());
    }
    let _installed = Installed::new(config);
    serde_json::from_slice(bytes).map_err(decode_error)
}

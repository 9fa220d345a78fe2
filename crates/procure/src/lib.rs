//! Tessera Procure - Decoding and bulk import of external records.
//!
//! This crate provides:
//!
//! - `SourceLocator`: Where a record type's source bytes live
//! - `DecodeConfig` / `decode`: JSON decoding with an installed date format
//! - `date`: A serde helper reading formatted dates as timestamps
//! - `Procurable`: `procure` decodes a source, `archive` resolves every
//!   decoded value through its primary key and commits once

pub mod date;
pub mod decode;
pub mod procurable;
pub mod source;

pub use decode::{decode, decode_error, DecodeConfig};
pub use procurable::Procurable;
pub use source::SourceLocator;

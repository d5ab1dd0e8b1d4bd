//! Two-pass paginated report composition.
//!
//! Content is appended to a [`Document`] as blocks and numbered chapters.
//! [`Document::build`] flows it into pages, then builds the front page, table
//! of contents and running headers and footers against the finished layout.
//! The result is serialized to PDF by [`sinks::pdf`].

pub mod blocks;
pub mod canvas;
pub mod composer;
pub mod error;
pub mod fonts;
pub mod raster;
pub mod report;
pub mod sinks;
pub mod style;

pub use composer::{BuildMetadata, BuildMetadataBuilder, Document, FinalDocument};
pub use error::{Error, Result};

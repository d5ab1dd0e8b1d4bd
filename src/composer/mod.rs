//! Two-pass page composition.
//!
//! [`assembler`] flows blocks and chapters into pages and records where each
//! heading landed. [`deferred`] then builds the front page, table of contents
//! and running headers/footers from those results. [`Document`] ties the two
//! passes together.

pub mod assembler;
pub mod chapter;
pub mod deferred;
mod document;
pub mod page;

pub use assembler::{layout, Content, LaidOut};
pub use chapter::{Chapter, ChapterItem, Heading, Numbering, Subchapter};
pub use deferred::{
    resolve, Decorations, DeferredContentProvider, DeferredRegistry, PageContext, Resolved,
    TocEntry,
};
pub use document::*;
pub use page::{Band, Page, PageGeometry, PageKind, PlacedBlock};

//! Output formats for a finished document.

pub mod pdf;

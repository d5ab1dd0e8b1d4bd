use thiserror::Error;

/// Everything that can abort a document build.
///
/// None of these are recoverable at the point they are detected: they
/// propagate straight to the caller of [`crate::Document::build`] and no output
/// is written.
#[derive(Error, Debug)]
pub enum Error {
    /// A font, image or other input could not be read or decoded.
    #[error("failed to load `{resource}`: {reason}")]
    ResourceLoad { resource: String, reason: String },

    /// A block could not compute its size (unencodable glyph, bad chart or QR data).
    #[error("failed to measure {what}: {reason}")]
    Measurement { what: String, reason: String },

    /// Invalid table geometry or a layout that cannot be resolved.
    #[error("layout constraint violated: {0}")]
    LayoutConstraint(String),

    /// The final byte stream could not be produced or written.
    #[error("failed to serialize document: {0}")]
    Serialization(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn resource<R: ToString, S: ToString>(resource: R, reason: S) -> Error {
        Error::ResourceLoad {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn measurement<W: ToString, S: ToString>(what: W, reason: S) -> Error {
        Error::Measurement {
            what: what.to_string(),
            reason: reason.to_string(),
        }
    }
}

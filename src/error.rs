//! Errors for the ROM image builder.

use alloc::string::String;
use core::fmt;

/// Result alias used by this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Which part of a short name overflowed its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Stem,
    Extension,
}

/// Errors returned while building or reading a ROM image.
///
/// Every variant is a problem with the input. Broken internal
/// invariants panic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Module tag is neither `M048` nor `M049`.
    UnsupportedVariant { tag: String },
    /// Stem longer than 8 or extension longer than 3 characters.
    NameTooLong {
        name: String,
        field: NameField,
        max: usize,
    },
    /// Name contains characters outside 7-bit ASCII.
    NonAsciiName { name: String },
    /// More files than the variant has directory slots.
    TooManyFiles { count: usize, max: usize },
    /// Two files resolve to the same stem and extension.
    DuplicateName { name: String },
    /// Padded content is larger than the image.
    ImageOverflow { required: usize, capacity: usize },
    /// Content fills the image and the last file's padding cannot hold
    /// the directory.
    DirectoryDoesNotFit { slack: usize, required: usize },
    /// Space is left for a filler entry but every slot is taken.
    NoSlotForFiller { unused: usize, max: usize },
    /// Nothing to put into the image.
    NoInputFiles,
    /// Manifest does not name an output file.
    MissingOutputFile,
    /// A directory record could not be decoded.
    Corrupt,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedVariant { tag } => {
                write!(f, "only 'M048' or 'M049' supported, '{}' was entered", tag)
            }
            Error::NameTooLong { name, field, max } => {
                let what = match field {
                    NameField::Stem => "stem",
                    NameField::Extension => "extension",
                };
                write!(f, "{} of '{}' is longer than {} characters", what, name, max)
            }
            Error::NonAsciiName { name } => write!(
                f,
                "only the first 128 ascii characters are allowed, '{}' contains forbidden ones",
                name
            ),
            Error::TooManyFiles { count, max } => {
                write!(f, "{} entries are more than the {} allowed", count, max)
            }
            Error::DuplicateName { name } => write!(f, "entry '{}' is not unique", name),
            Error::ImageOverflow { required, capacity } => write!(
                f,
                "fitting all files results in {} KiB, which is more than the {} KiB allowed",
                required / 1024,
                capacity / 1024
            ),
            Error::DirectoryDoesNotFit { slack, required } => write!(
                f,
                "cannot fit directory: {} bytes left after the last file, {} needed",
                slack, required
            ),
            Error::NoSlotForFiller { unused, max } => write!(
                f,
                "{} bytes remain unused but all {} directory slots are taken, remove an entry",
                unused, max
            ),
            Error::NoInputFiles => write!(f, "no input files were specified"),
            Error::MissingOutputFile => write!(f, "output file missing in manifest"),
            Error::Corrupt => write!(f, "corrupt directory record"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

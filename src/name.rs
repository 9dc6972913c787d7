//! 8.3 short names as stored in the module directory.

use alloc::string::ToString;
use core::fmt;

use crate::error::{Error, NameField, Result};

/// Stem field width.
pub const MAX_STEM_LEN: usize = 8;
/// Extension field width.
pub const MAX_EXT_LEN: usize = 3;

/// A validated short name, borrowed from the display name.
///
/// Case is kept as given; fields are space-padded only when encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortName<'a> {
    pub stem: &'a str,
    pub extension: &'a str,
}

impl<'a> ShortName<'a> {
    /// Build a name without validation. Used for names fixed at compile time.
    pub const fn new_unchecked(stem: &'a str, extension: &'a str) -> Self {
        Self { stem, extension }
    }
}

impl fmt::Display for ShortName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.extension.is_empty() {
            f.write_str(self.stem)
        } else {
            write!(f, "{}.{}", self.stem, self.extension)
        }
    }
}

/// Split a display name like `"GAME.COM"` into stem and extension.
///
/// The split happens at the last `.`; a name without a dot has an empty
/// extension. Lengths are checked before the character set.
pub fn resolve_name(display_name: &str) -> Result<ShortName<'_>> {
    let (stem, extension) = match display_name.rsplit_once('.') {
        Some((a, b)) => (a, b),
        None => (display_name, ""),
    };

    if stem.chars().count() > MAX_STEM_LEN {
        return Err(Error::NameTooLong {
            name: display_name.to_string(),
            field: NameField::Stem,
            max: MAX_STEM_LEN,
        });
    }
    if extension.chars().count() > MAX_EXT_LEN {
        return Err(Error::NameTooLong {
            name: display_name.to_string(),
            field: NameField::Extension,
            max: MAX_EXT_LEN,
        });
    }
    if !display_name.is_ascii() {
        return Err(Error::NonAsciiName {
            name: display_name.to_string(),
        });
    }

    Ok(ShortName { stem, extension })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn splits_on_last_dot() {
        let n = resolve_name("GAME.COM").unwrap();
        assert_eq!((n.stem, n.extension), ("GAME", "COM"));

        let n = resolve_name("A.B.C").unwrap();
        assert_eq!((n.stem, n.extension), ("A.B", "C"));

        let n = resolve_name("README").unwrap();
        assert_eq!((n.stem, n.extension), ("README", ""));
        assert_eq!(n.to_string(), "README");
    }

    #[test]
    fn keeps_case() {
        let n = resolve_name("forth.kcc").unwrap();
        assert_eq!(n.to_string(), "forth.kcc");
    }

    #[test]
    fn nine_character_stem_is_too_long() {
        assert_eq!(
            resolve_name("ABCDEFGHI.COM"),
            Err(Error::NameTooLong {
                name: "ABCDEFGHI.COM".into(),
                field: NameField::Stem,
                max: 8,
            })
        );
        assert!(resolve_name("ABCDEFGH.COM").is_ok());
    }

    #[test]
    fn four_character_extension_is_too_long() {
        assert!(matches!(
            resolve_name("GAME.KCCX"),
            Err(Error::NameTooLong {
                field: NameField::Extension,
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_ascii() {
        assert_eq!(
            resolve_name("SPIEL.ÄÖ"),
            Err(Error::NonAsciiName {
                name: "SPIEL.ÄÖ".into()
            })
        );
    }
}

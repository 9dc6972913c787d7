//! Text manifests listing the output file and its inputs.
//!
//! ```text
//! M048_TOOLS        # output, variant taken from the name
//! edit.com
//! forth.kcc         # comments run to the end of the line
//! ```
//!
//! Reading the listed files is left to the caller.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::config::Variant;
use crate::error::{Error, Result};

/// Starts a comment running to the end of the line.
pub const COMMENT_CHAR: char = '#';

/// Extension every output file carries.
pub const ROM_EXTENSION: &str = ".ROM";

/// A parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest<'a> {
    /// Output path, `.ROM` appended when missing.
    pub output: String,
    pub variant: Variant,
    /// Input paths in manifest order, relative to the manifest.
    pub inputs: Vec<&'a str>,
}

impl Manifest<'_> {
    /// Name stored in the directory for an input path: its last component.
    pub fn display_name<'p>(path: &'p str) -> &'p str {
        path.rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(path)
    }
}

/// Ensure `name` ends in `.ROM`.
pub fn output_file_name(name: &str) -> String {
    let file = Manifest::display_name(name);
    let has_rom_ext = file
        .rfind('.')
        .is_some_and(|dot| dot > 0 && &file[dot..] == ROM_EXTENSION);
    if has_rom_ext {
        String::from(name)
    } else {
        format!("{}{}", name, ROM_EXTENSION)
    }
}

/// Non-empty lines with comments and trailing whitespace removed.
fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| match line.split_once(COMMENT_CHAR) {
            Some((before, _)) => before,
            None => line,
        })
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
}

/// Parse manifest text. The first line names the output file.
pub fn parse_manifest(text: &str) -> Result<Manifest<'_>> {
    let mut lines = content_lines(text);
    let output = lines.next().ok_or(Error::MissingOutputFile)?;
    let variant = Variant::from_output_name(output)?;

    let inputs: Vec<&str> = lines.collect();
    if inputs.is_empty() {
        return Err(Error::NoInputFiles);
    }
    log::debug!(
        "manifest: {} inputs for {} image '{}'",
        inputs.len(),
        variant.tag(),
        output
    );

    Ok(Manifest {
        output: output_file_name(output),
        variant,
        inputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comments_and_blank_lines() {
        let text = "# tools module\nM049_TOOLS   # output\n\n  edit.com\t\nlib/forth.kcc # FORTH\n   \n";
        let m = parse_manifest(text).unwrap();

        assert_eq!(m.output, "M049_TOOLS.ROM");
        assert_eq!(m.variant, Variant::M049);
        assert_eq!(m.inputs, ["  edit.com", "lib/forth.kcc"]);
        assert_eq!(Manifest::display_name(m.inputs[1]), "forth.kcc");
    }

    #[test]
    fn rom_suffix() {
        assert_eq!(output_file_name("M048.ROM"), "M048.ROM");
        assert_eq!(output_file_name("M048.rom"), "M048.rom.ROM");
        assert_eq!(output_file_name("out/M048_A"), "out/M048_A.ROM");
    }

    #[test]
    fn missing_parts() {
        assert_eq!(parse_manifest("# nothing\n\n"), Err(Error::MissingOutputFile));
        assert_eq!(parse_manifest("M048_X\n"), Err(Error::NoInputFiles));
        assert!(matches!(
            parse_manifest("GAMES.ROM\nA.COM\n"),
            Err(Error::UnsupportedVariant { .. })
        ));
    }
}

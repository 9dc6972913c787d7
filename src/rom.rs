//! ROM image builder.

use alloc::vec::Vec;

use crate::config::{Variant, VariantConfig};
use crate::dir::{encode_directory, parse_directory, DirEntry};
use crate::error::Result;
use crate::layout::{plan_layout, ResolvedFile};
use crate::name::resolve_name;
use crate::writer::write_content;

/// One input file as handed over by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEntry<'a> {
    /// Display name, e.g. `GAME.COM`.
    pub name: &'a str,
    pub content: &'a [u8],
}

/// Collects input files and builds the image in one go.
///
/// ```
/// use kc85_rom::{RomBuilder, Variant};
///
/// let rom = RomBuilder::new(Variant::M048)
///     .add("FORTH.KCC", &[0x7f; 3000])
///     .add("EDIT.COM", &[0x00; 5000])
///     .build()?;
/// assert_eq!(rom.data().len(), 256 * 1024);
/// # Ok::<(), kc85_rom::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RomBuilder<'a> {
    variant: Variant,
    inputs: Vec<InputEntry<'a>>,
}

impl<'a> RomBuilder<'a> {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            inputs: Vec::new(),
        }
    }

    /// Append a file. Order of calls is the order of the directory.
    pub fn add(mut self, name: &'a str, content: &'a [u8]) -> Self {
        self.inputs.push(InputEntry { name, content });
        self
    }

    /// Append several files.
    pub fn extend<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = InputEntry<'a>>,
    {
        self.inputs.extend(entries);
        self
    }

    /// Build the image. Nothing is produced unless every check passes.
    pub fn build(&self) -> Result<RomImage> {
        build_rom(self.variant, &self.inputs)
    }
}

/// Build an image from `inputs`, given in directory order.
pub fn build_rom(variant: Variant, inputs: &[InputEntry<'_>]) -> Result<RomImage> {
    let config = variant.config();

    let files = inputs
        .iter()
        .map(|e| Ok(ResolvedFile::new(resolve_name(e.name)?, e.content)))
        .collect::<Result<Vec<_>>>()?;

    let plan = plan_layout(&config, files)?;
    let (mut data, sectors) = write_content(&config, &plan.files);
    assert_eq!(data.len(), config.final_image_size);

    let directory = encode_directory(
        &config,
        &plan.files,
        &sectors,
        plan.swapped_index,
        plan.real_count,
    );
    // Lands in the last file's padding or in the filler.
    let dir_start = config.final_image_size - directory.len();
    data[dir_start..].copy_from_slice(&directory);
    assert_eq!(data.len(), config.final_image_size);

    log::info!(
        "built {} image with {} programs, {}/{} blocks of {} bytes unused",
        variant.tag(),
        plan.real_count,
        plan.free_blocks,
        config.total_blocks(),
        config.padding_block_size
    );

    Ok(RomImage {
        variant,
        data,
        file_count: plan.files.len(),
        real_count: plan.real_count,
        free_blocks: plan.free_blocks,
    })
}

/// A finished image, exactly `final_image_size` bytes long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomImage {
    variant: Variant,
    data: Vec<u8>,
    file_count: usize,
    real_count: usize,
    free_blocks: usize,
}

impl RomImage {
    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn config(&self) -> VariantConfig {
        self.variant.config()
    }

    /// Raw image bytes, ready to be persisted.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Used directory slots, filler included.
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Number of input files stored.
    pub fn program_count(&self) -> usize {
        self.real_count
    }

    /// Whether a `DUMMY.ROM` filler entry was added.
    pub fn has_filler(&self) -> bool {
        self.file_count > self.real_count
    }

    /// Padding blocks not taken by input files or the directory.
    pub fn free_blocks(&self) -> usize {
        self.free_blocks
    }

    pub fn total_blocks(&self) -> usize {
        self.config().total_blocks()
    }

    pub fn free_bytes(&self) -> usize {
        self.free_blocks * self.config().padding_block_size
    }

    /// Directory region at the end of the image.
    pub fn directory(&self) -> &[u8] {
        &self.data[self.data.len() - self.config().directory_size()..]
    }

    /// Decoded directory, in input order.
    pub fn entries(&self) -> Result<Vec<DirEntry>> {
        parse_directory(&self.config(), &self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use alloc::vec;

    #[test]
    fn two_small_files() {
        let a = vec![0x11u8; 5000];
        let b = vec![0x22u8; 3000];
        let rom = RomBuilder::new(Variant::M048)
            .add("EDIT.COM", &a)
            .add("FORTH.KCC", &b)
            .build()
            .unwrap();

        assert_eq!(rom.data().len(), 262144);
        assert_eq!(rom.program_count(), 2);
        assert!(rom.has_filler());
        assert_eq!(rom.free_blocks(), 60);
        assert_eq!(rom.free_bytes(), 60 * 4096);

        // EDIT.COM wastes less padding, so it moves behind FORTH.KCC.
        let data = rom.data();
        assert_eq!(&data[..3000], &b[..]);
        assert_eq!(&data[4096..9096], &a[..]);
        assert!(data[12288..262144 - 512].iter().all(|&x| x == 0xE5));

        let entries = rom.entries().unwrap();
        let names: Vec<_> = entries.iter().map(|e| (e.stem(), e.extension())).collect();
        assert_eq!(names, [("EDIT", "COM"), ("FORTH", "KCC"), ("DUMMY", "ROM")]);
        assert_eq!(entries[0].offset(&rom.config()), 4096);
        assert_eq!(entries[1].offset(&rom.config()), 0);
        assert_eq!(entries[2].offset(&rom.config()), 12288);

        let dir = rom.directory().to_vec();
        let bytes = rom.into_bytes();
        assert_eq!(bytes.len(), 262144);
        assert_eq!(&bytes[262144 - 512..], &dir[..]);
    }

    #[test]
    fn errors_leave_nothing_behind() {
        let big = vec![0u8; 300 * 1024];
        let r = RomBuilder::new(Variant::M048).add("BIG.BIN", &big).build();
        assert!(matches!(r, Err(Error::ImageOverflow { .. })));

        let r = RomBuilder::new(Variant::M049).add("ÜBER.COM", &[1]).build();
        assert!(matches!(r, Err(Error::NonAsciiName { .. })));
    }
}

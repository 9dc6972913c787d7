//! Write order, padding and directory placement.
//!
//! The planner decides where every file goes before a single byte is
//! written. It does not touch the output buffer.

use alloc::collections::BTreeSet;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::config::VariantConfig;
use crate::error::{Error, Result};
use crate::name::ShortName;

/// Name of the synthetic entry that fills unused space.
pub const FILLER_NAME: ShortName<'static> = ShortName::new_unchecked("DUMMY", "ROM");

/// Byte used for filler content and empty directory slots.
pub const FILL_BYTE: u8 = 0xE5;

/// Bytes of a planned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Content of a real input file.
    Data(&'a [u8]),
    /// `len` bytes of [`FILL_BYTE`].
    Filler { len: usize },
}

impl Payload<'_> {
    pub fn len(&self) -> usize {
        match self {
            Payload::Data(d) => d.len(),
            Payload::Filler { len } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named file ready to be placed in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFile<'a> {
    pub name: ShortName<'a>,
    pub payload: Payload<'a>,
}

impl<'a> ResolvedFile<'a> {
    pub fn new(name: ShortName<'a>, content: &'a [u8]) -> Self {
        Self {
            name,
            payload: Payload::Data(content),
        }
    }
}

/// Outcome of [`plan_layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan<'a> {
    /// Files in write order. A filler, if any, is last.
    pub files: Vec<ResolvedFile<'a>>,
    /// Input index of the file swapped into the last real position.
    pub swapped_index: usize,
    /// Number of real input files.
    pub real_count: usize,
    /// Bytes taken by real files including their padding.
    pub used_size: usize,
    /// Padding blocks left unused, the directory block not counted.
    pub free_blocks: usize,
}

impl LayoutPlan<'_> {
    /// Whether a filler entry was added.
    pub fn has_filler(&self) -> bool {
        self.files.len() > self.real_count
    }
}

/// Padding a file would waste, with exact multiples of the block size
/// ranked as the worst case since they get a whole extra block.
fn padding_waste(len: usize, padding_block_size: usize) -> usize {
    len.saturating_sub(1) % padding_block_size
}

/// Index of the file to write last: the first one with the least waste.
fn pick_last(config: &VariantConfig, files: &[ResolvedFile<'_>]) -> usize {
    let mut best = 0;
    let mut best_score = usize::MAX;
    for (i, f) in files.iter().enumerate() {
        let score = padding_waste(f.payload.len(), config.padding_block_size);
        if score < best_score {
            best = i;
            best_score = score;
        }
    }
    best
}

fn check_names(config: &VariantConfig, files: &[ResolvedFile<'_>]) -> Result<()> {
    if files.is_empty() {
        return Err(Error::NoInputFiles);
    }
    if files.len() > config.max_file_count {
        return Err(Error::TooManyFiles {
            count: files.len(),
            max: config.max_file_count,
        });
    }

    let mut seen = BTreeSet::new();
    for f in files {
        if !seen.insert((f.name.stem, f.name.extension)) {
            return Err(Error::DuplicateName {
                name: f.name.to_string(),
            });
        }
    }
    Ok(())
}

/// Plan the image for `files`, given in input order.
pub fn plan_layout<'a>(
    config: &VariantConfig,
    mut files: Vec<ResolvedFile<'a>>,
) -> Result<LayoutPlan<'a>> {
    check_names(config, &files)?;

    let last = files.len() - 1;
    let swapped_index = pick_last(config, &files);
    files.swap(swapped_index, last);
    log::debug!(
        "writing '{}' last (input position {})",
        files[last].name,
        swapped_index
    );

    let used_size: usize = files
        .iter()
        .map(|f| config.padded_len(f.payload.len()))
        .sum();
    if used_size > config.final_image_size {
        return Err(Error::ImageOverflow {
            required: used_size,
            capacity: config.final_image_size,
        });
    }

    let dir_size = config.directory_size();
    let mut free_blocks = config.total_blocks() - used_size / config.padding_block_size;
    if free_blocks > 0 {
        assert!(dir_size <= config.padding_block_size);
        free_blocks -= 1;
    }

    let real_count = files.len();
    if used_size == config.final_image_size {
        // The directory has to live in the padding of the last file.
        let slack =
            config.padding_block_size - files[last].payload.len() % config.padding_block_size;
        if slack < dir_size {
            return Err(Error::DirectoryDoesNotFit {
                slack,
                required: dir_size,
            });
        }
        log::debug!("directory placed in {} bytes of trailing padding", slack);
    } else {
        let unused = config.final_image_size - used_size;
        if real_count == config.max_file_count {
            return Err(Error::NoSlotForFiller {
                unused,
                max: config.max_file_count,
            });
        }
        if files.iter().any(|f| f.name == FILLER_NAME) {
            return Err(Error::DuplicateName {
                name: FILLER_NAME.to_string(),
            });
        }
        log::debug!("adding {} with {} bytes of filler", FILLER_NAME, unused);
        files.push(ResolvedFile {
            name: FILLER_NAME,
            payload: Payload::Filler { len: unused },
        });
    }

    Ok(LayoutPlan {
        files,
        swapped_index,
        real_count,
        used_size,
        free_blocks,
    })
}

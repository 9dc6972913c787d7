//! Module variants and their fixed layout constants.

use alloc::string::ToString;
use core::str::FromStr;

use crate::error::{Error, Result};
use crate::name::{MAX_EXT_LEN, MAX_STEM_LEN};

/// Size of one directory record in bytes.
pub const ENTRY_SIZE: usize = 16;

/// Supported ROM module families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// 256 KiB, 32 directory slots.
    M048,
    /// 512 KiB, 64 directory slots.
    M049,
}

/// Layout constants for one variant. Immutable, looked up once per build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantConfig {
    /// Directory record size.
    pub entry_size: usize,
    /// Stem field width.
    pub max_stem_len: usize,
    /// Extension field width.
    pub max_ext_len: usize,
    /// Unit of the cluster-count field (16 KiB).
    pub cluster_size: usize,
    /// Alignment of every file region (4 KiB).
    pub padding_block_size: usize,
    /// Unit of the starting-sector and last-cluster fields.
    pub sector_size: usize,
    /// Number of directory slots.
    pub max_file_count: usize,
    /// Exact size of the finished image.
    pub final_image_size: usize,
}

const BASE: VariantConfig = VariantConfig {
    entry_size: ENTRY_SIZE,
    max_stem_len: MAX_STEM_LEN,
    max_ext_len: MAX_EXT_LEN,
    cluster_size: 16 * 1024,
    padding_block_size: 4 * 1024,
    sector_size: 128,
    max_file_count: 0,
    final_image_size: 0,
};

const M048: VariantConfig = VariantConfig {
    max_file_count: 32,
    final_image_size: 256 * 1024,
    ..BASE
};

const M049: VariantConfig = VariantConfig {
    max_file_count: 64,
    final_image_size: 512 * 1024,
    ..BASE
};

// The directory has to fit into the single block reserved for it.
const _: () = assert!(M048.entry_size * M048.max_file_count <= M048.padding_block_size);
const _: () = assert!(M049.entry_size * M049.max_file_count <= M049.padding_block_size);

impl Variant {
    /// Layout constants of this variant.
    pub fn config(self) -> VariantConfig {
        match self {
            Variant::M048 => M048,
            Variant::M049 => M049,
        }
    }

    /// Tag as written in output file names.
    pub fn tag(self) -> &'static str {
        match self {
            Variant::M048 => "M048",
            Variant::M049 => "M049",
        }
    }

    /// Pick the variant from an output file name such as `M048_GAMES.ROM`.
    ///
    /// Only the final path component is looked at; its stem must start
    /// with a variant tag.
    pub fn from_output_name(name: &str) -> Result<Self> {
        let file = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);
        [Variant::M048, Variant::M049]
            .into_iter()
            .find(|v| file.starts_with(v.tag()))
            .ok_or_else(|| Error::UnsupportedVariant {
                tag: file.to_string(),
            })
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "M048" => Ok(Variant::M048),
            "M049" => Ok(Variant::M049),
            _ => Err(Error::UnsupportedVariant {
                tag: tag.to_string(),
            }),
        }
    }
}

/// Look up the layout constants for a variant tag.
pub fn resolve_config(tag: &str) -> Result<VariantConfig> {
    tag.parse::<Variant>().map(Variant::config)
}

impl VariantConfig {
    /// Bytes taken by the directory region.
    pub fn directory_size(&self) -> usize {
        self.entry_size * self.max_file_count
    }

    /// Image size in padding blocks.
    pub fn total_blocks(&self) -> usize {
        self.final_image_size / self.padding_block_size
    }

    /// Bytes a file of `len` bytes occupies once padded.
    ///
    /// Padding is never empty: an exact multiple of the block size
    /// still gets a whole block appended.
    pub fn padded_len(&self, len: usize) -> usize {
        len - len % self.padding_block_size + self.padding_block_size
    }
}

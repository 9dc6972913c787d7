//! Directory records (16 bytes each) at the end of the image.
//!
//! Layout of a used record:
//!
//! | Bytes | Field |
//! |-------|-------|
//! | 0     | status, `0x01` |
//! | 1-8   | stem, space padded |
//! | 9-11  | extension, space padded |
//! | 12    | full 16 KiB clusters |
//! | 13-14 | starting sector, little endian |
//! | 15    | 128-byte sectors in the last cluster |
//!
//! Bit 7 of bytes 2, 8 and 9 carries the file attributes.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::config::{VariantConfig, ENTRY_SIZE};
use crate::error::{Error, Result};
use crate::layout::{ResolvedFile, FILL_BYTE};
use crate::name::{ShortName, MAX_EXT_LEN, MAX_STEM_LEN};

/// Status byte of a used record.
pub const STATUS_USED: u8 = 0x01;

/// Record of an unused directory slot.
pub const EMPTY_ENTRY: [u8; ENTRY_SIZE] = [FILL_BYTE; ENTRY_SIZE];

/// Record offsets whose high bit is an attribute flag.
pub const ATTRIBUTE_BYTES: [usize; 3] = [2, 8, 9];

const STEM: core::ops::Range<usize> = 1..1 + MAX_STEM_LEN;
const EXT: core::ops::Range<usize> = STEM.end..STEM.end + MAX_EXT_LEN;

fn le_u16(x: &[u8]) -> u16 {
    u16::from_le_bytes([x[0], x[1]])
}

/// Force the attribute bits on.
pub fn set_attribute_bits(rec: &mut [u8; ENTRY_SIZE]) {
    for i in ATTRIBUTE_BYTES {
        rec[i] |= 0x80;
    }
}

/// Encode one used record.
///
/// `name` must already be validated; a non-ASCII byte here is a bug.
pub fn encode_entry(
    config: &VariantConfig,
    name: &ShortName<'_>,
    content_len: usize,
    starting_sector: u16,
) -> [u8; ENTRY_SIZE] {
    let mut rec = [b' '; ENTRY_SIZE];
    rec[0] = STATUS_USED;
    rec[STEM.start..STEM.start + name.stem.len()].copy_from_slice(name.stem.as_bytes());
    rec[EXT.start..EXT.start + name.extension.len()].copy_from_slice(name.extension.as_bytes());

    assert!(
        rec[STEM.start..EXT.end].iter().all(|b| b & 0x80 == 0),
        "non-ascii byte in resolved name '{}'",
        name
    );

    let clusters = content_len / config.cluster_size;
    let rest = content_len % config.cluster_size;
    rec[12] = u8::try_from(clusters).unwrap_or_else(|_| panic!("{} clusters", clusters));
    rec[13..15].copy_from_slice(&starting_sector.to_le_bytes());
    // at most cluster_size / sector_size, which is 128
    rec[15] = rest.div_ceil(config.sector_size) as u8;

    set_attribute_bits(&mut rec);
    rec
}

/// Encode the whole directory region.
///
/// Records are built in write order, then the last real file is swapped
/// back to `swapped_index` so the directory lists files in input order.
/// A filler entry stays behind the real files. Unused slots are
/// [`EMPTY_ENTRY`].
pub fn encode_directory(
    config: &VariantConfig,
    files: &[ResolvedFile<'_>],
    sectors: &[u16],
    swapped_index: usize,
    real_count: usize,
) -> Vec<u8> {
    assert_eq!(files.len(), sectors.len());
    assert!(files.len() <= config.max_file_count);
    assert!(swapped_index < real_count && real_count <= files.len());

    let mut records: Vec<[u8; ENTRY_SIZE]> = files
        .iter()
        .zip(sectors)
        .map(|(f, &sector)| encode_entry(config, &f.name, f.payload.len(), sector))
        .collect();
    records.swap(swapped_index, real_count - 1);
    records.resize(config.max_file_count, EMPTY_ENTRY);

    for (slot, rec) in records.iter().enumerate() {
        log::trace!("directory slot {}: {:02x?}", slot, rec);
    }

    let out: Vec<u8> = records.concat();
    assert_eq!(out.len(), config.directory_size());
    out
}

/// A decoded used record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    stem: String,
    extension: String,
    /// Attribute bits, one per entry of [`ATTRIBUTE_BYTES`], lowest first.
    pub attributes: u8,
    pub cluster_count: u8,
    pub starting_sector: u16,
    /// 1-indexed count of sectors used in the last, partial cluster.
    pub last_cluster_sectors: u8,
}

impl DirEntry {
    /// Parse a 16-byte record. Empty slots give `None`.
    pub fn parse(rec: &[u8; ENTRY_SIZE]) -> Result<Option<Self>> {
        if *rec == EMPTY_ENTRY {
            return Ok(None);
        }
        if rec[0] != STATUS_USED {
            return Err(Error::Corrupt);
        }

        let mut attributes = 0;
        let mut clean = *rec;
        for (bit, i) in ATTRIBUTE_BYTES.into_iter().enumerate() {
            if clean[i] & 0x80 != 0 {
                attributes |= 1 << bit;
            }
            clean[i] &= 0x7F;
        }
        // Only the attribute bytes may carry bit 7.
        if clean[STEM.start..EXT.end].iter().any(|b| b & 0x80 != 0) {
            return Err(Error::Corrupt);
        }

        Ok(Some(Self {
            stem: decode_field(&clean[STEM])?,
            extension: decode_field(&clean[EXT])?,
            attributes,
            cluster_count: rec[12],
            starting_sector: le_u16(&rec[13..15]),
            last_cluster_sectors: rec[15],
        }))
    }

    /// Stem with trailing spaces removed.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Extension with trailing spaces removed.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Byte offset of the file within the image.
    pub fn offset(&self, config: &VariantConfig) -> usize {
        self.starting_sector as usize * config.sector_size
    }

    /// Range the content length must lie in, as `(exclusive lower, inclusive upper)`.
    ///
    /// Lengths are only stored to sector precision.
    pub fn content_len_bounds(&self, config: &VariantConfig) -> (usize, usize) {
        let base = self.cluster_count as usize * config.cluster_size;
        let sectors = self.last_cluster_sectors as usize;
        if sectors == 0 {
            return (base.saturating_sub(1), base);
        }
        (
            base + (sectors - 1) * config.sector_size,
            base + sectors * config.sector_size,
        )
    }
}

fn decode_field(raw: &[u8]) -> Result<String> {
    let s = core::str::from_utf8(raw).map_err(|_| Error::Corrupt)?;
    Ok(s.trim_end_matches(' ').to_string())
}

/// Decode the directory region at the end of `image`.
///
/// Returns the used entries in slot order.
pub fn parse_directory(config: &VariantConfig, image: &[u8]) -> Result<Vec<DirEntry>> {
    let dir_size = config.directory_size();
    if image.len() < dir_size {
        return Err(Error::Corrupt);
    }

    let mut out = Vec::new();
    for chunk in image[image.len() - dir_size..].chunks_exact(ENTRY_SIZE) {
        let mut rec = [0u8; ENTRY_SIZE];
        rec.copy_from_slice(chunk);
        if let Some(e) = DirEntry::parse(&rec)? {
            out.push(e);
        }
    }
    Ok(out)
}

//! Emits file contents and alignment padding in write order.

use alloc::vec::Vec;

use crate::config::VariantConfig;
use crate::layout::{Payload, ResolvedFile, FILL_BYTE};

/// Append every file to a fresh buffer.
///
/// Data is followed by zero padding up to the next block boundary, a
/// whole block when the length is already a multiple. The filler is
/// sized to end at the image boundary and gets no padding.
///
/// Returns the buffer and the starting sector of each file, in the
/// order of `files`.
pub fn write_content(config: &VariantConfig, files: &[ResolvedFile<'_>]) -> (Vec<u8>, Vec<u16>) {
    let mut buf = Vec::with_capacity(config.final_image_size);
    let mut sectors = Vec::with_capacity(files.len());

    for f in files {
        let offset = buf.len();
        assert!(offset % config.sector_size == 0);
        let sector = u16::try_from(offset / config.sector_size)
            .unwrap_or_else(|_| panic!("sector of offset {} does not fit 16 bits", offset));
        sectors.push(sector);

        match f.payload {
            Payload::Data(content) => {
                buf.extend_from_slice(content);
                let padding =
                    config.padding_block_size - content.len() % config.padding_block_size;
                buf.resize(buf.len() + padding, 0);
            }
            Payload::Filler { len } => buf.resize(buf.len() + len, FILL_BYTE),
        }
        log::debug!(
            "wrote '{}' at offset {:#x} (sector {}), {} bytes",
            f.name,
            offset,
            sector,
            f.payload.len()
        );
    }

    (buf, sectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::name::ShortName;

    const A: ShortName<'static> = ShortName::new_unchecked("A", "");
    const B: ShortName<'static> = ShortName::new_unchecked("B", "");

    #[test]
    fn pads_each_file_to_block() {
        let cfg = Variant::M048.config();
        let a = [0xAAu8; 5000];
        let b = [0xBBu8; 3000];
        let (buf, sectors) =
            write_content(&cfg, &[ResolvedFile::new(A, &a), ResolvedFile::new(B, &b)]);

        assert_eq!(buf.len(), 8192 + 4096);
        assert_eq!(sectors, [0, 64]);
        assert_eq!(&buf[..5000], &a[..]);
        assert!(buf[5000..8192].iter().all(|&x| x == 0));
        assert_eq!(&buf[8192..11192], &b[..]);
        assert!(buf[11192..].iter().all(|&x| x == 0));
    }

    #[test]
    fn exact_block_gets_full_extra_block() {
        let cfg = Variant::M048.config();
        let a = [0x11u8; 4096];
        let b = [0x22u8; 1];
        let (buf, sectors) =
            write_content(&cfg, &[ResolvedFile::new(A, &a), ResolvedFile::new(B, &b)]);

        assert_eq!(sectors, [0, 8192 / 128]);
        assert!(buf[4096..8192].iter().all(|&x| x == 0));
        assert_eq!(buf.len(), 3 * 4096);
    }

    #[test]
    fn filler_is_not_padded() {
        let cfg = Variant::M048.config();
        let a = [1u8; 10];
        let filler = ResolvedFile {
            name: ShortName::new_unchecked("DUMMY", "ROM"),
            payload: Payload::Filler { len: 8192 },
        };
        let (buf, sectors) = write_content(&cfg, &[ResolvedFile::new(A, &a), filler]);

        assert_eq!(sectors, [0, 32]);
        assert_eq!(buf.len(), 4096 + 8192);
        assert!(buf[4096..].iter().all(|&x| x == FILL_BYTE));
    }
}

//! Builds ROM module images (M048 / M049) for the KC85 from a list of
//! named files, with the file directory at the end of the image.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod config;
pub mod dir;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod name;
pub mod rom;
pub mod writer;

pub use crate::config::{resolve_config, Variant, VariantConfig};
pub use crate::dir::DirEntry;
pub use crate::error::{Error, NameField, Result};
pub use crate::manifest::{parse_manifest, Manifest};
pub use crate::name::{resolve_name, ShortName};
pub use crate::rom::{build_rom, InputEntry, RomBuilder, RomImage};

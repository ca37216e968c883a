//! Gsplat Data Crate
//!
//! Decoding of binary Gaussian splat PLY files into per-attribute arrays.
//! This crate is GPU-agnostic: it only parses bytes and produces CPU-side
//! buffers that a renderer can upload as-is.

pub mod import;
pub mod math;
pub mod ply;
pub mod sh;
pub mod types;

pub use import::{ImportError, ImportSettings, SplatAsset, import_ply, import_ply_with_progress};
pub use math::{normalize_rotation, sigmoid};
pub use ply::{
    DecodeError, MAX_INPUT_LEN, PlyProperty, RecordLayout, SplatPlyDecoder, SplatPlyHeader,
    ZeroRotationPolicy, check_input_len,
};
pub use sh::{
    MAX_SH_BANDS, bands_from_sh_property_count, coefficient_count_for_bands, effective_sh_degree,
};
pub use types::{Bounds, SplatAttributes};

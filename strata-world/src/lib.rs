#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata
)]

//! Chunk storage: fixed-width bit-packed arrays, the four palette variants
//! built on top of them, and the chunk-section/column structures a play
//! session serializes into `ChunkData` packets.

pub mod bit_storage;
pub mod column;
pub mod palette;
pub mod section;

pub use bit_storage::BitStorage;
pub use column::{Column, ColumnError};
pub use palette::Palette;
pub use section::{ChunkSection, PaletteKind};

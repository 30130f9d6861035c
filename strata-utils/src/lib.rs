#![feature(array_try_from_fn)]
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

//! Primitive wire types shared by every other crate in the workspace: the
//! `ReadFrom`/`WriteTo` serialization traits, (var)int codecs, the text
//! component value object, and a front-reservable byte buffer used when
//! framing outbound packets.

pub mod codec;
pub mod errors;
pub mod front_vec;
pub mod serial;
pub mod text;

pub use front_vec::FrontVec;

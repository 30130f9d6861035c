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

//! RSA keypair handling, the shared-secret exchange, the Yggdrasil
//! server-ID digest, and the Mojang session-server authentication call.

pub mod key_pair;
pub mod session;
pub mod yggdrasil;

pub use key_pair::KeyPair;
pub use session::{AuthError, GameProfile};

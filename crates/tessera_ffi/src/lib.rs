//! The foreign router boundary.
//!
//! This crate lets a router compiled outside the engine's type system
//! drive placement and routing state through a fixed, architecture-agnostic
//! C surface. Resource identities cross the boundary as tagged 64-bit
//! handles produced by the [`codec`]; cell and net references cross as
//! opaque pointers the foreign side never dereferences. The bridge
//! performs no logic of its own: every mutation it forwards goes through
//! the arbiter in [`tessera_core::BindingTable`].

#![warn(missing_docs)]

pub mod bridge;
pub mod codec;

pub use bridge::RouterContext;
pub use codec::{
    decode_pip, decode_site, decode_wire, encode_pip, encode_site, encode_wire, NULL_HANDLE,
};

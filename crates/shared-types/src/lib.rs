//! # Shared Types Crate
//!
//! Identifiers used by every warp subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: chain, subnet, node and message ids are
//!   defined once here and re-used by the codec, the registry port and the
//!   predicate machinery.
//! - **Fixed Width**: every identifier is a fixed-size byte array so that
//!   canonical encodings never carry length prefixes for ids.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;

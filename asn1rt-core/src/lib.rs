//! Core types and utilities for the ASN.1 BER/DER runtime
//!
//! This crate provides the error and diagnostics context, the byte arena
//! that holds decoded values, codec configuration, and the value types used
//! throughout the codec.

pub mod arena;
pub mod config;
pub mod datatypes;
pub mod error;

pub use arena::{Arena, ByteRef};
pub use config::CodecConfig;
pub use error::{CodecError, CodecResult, ErrorKind, StackFrame, Traced};

//! deckvoice library interface
//!
//! Exposes the normalizer, pipeline, store adapter, and batch driver for
//! integration testing and embedding.

pub mod batch;
pub mod config;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod term;

pub use crate::error::{Error, Result};

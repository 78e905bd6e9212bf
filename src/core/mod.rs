//! Core address resolution — types, loading, resolution, selection.

pub mod address;
pub mod error;
pub mod manifest;
pub mod normalize;
pub mod parser;
pub mod resolver;
pub mod selection;
pub mod state;
pub mod types;

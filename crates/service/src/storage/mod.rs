//! Storage abstractions for service layer
//!
//! Each collection is one JSON document file, loaded fully into memory and
//! rewritten on every mutation.

pub mod json_map_store;

pub use json_map_store::JsonMapStore;

//! Remote store module
//!
//! Optional asynchronous mirror of the local cache: one logical
//! collection per entity kind, one JSON document per entity id.

pub mod client;

pub use client::{RemoteConfig, RemoteStore};

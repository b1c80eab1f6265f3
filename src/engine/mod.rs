//! Core engines
//!
//! Pure, total functions over the data model. Nothing in here touches
//! storage or performs I/O; the services layer feeds these engines and
//! persists their results.

pub mod copy_forward;
pub mod entries;
pub mod layout;

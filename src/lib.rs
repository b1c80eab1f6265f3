//! Timegrid library
//!
//! Local-first weekly time tracking and leave management engine: the
//! weekly time-accounting core, the leave-calendar overlap layout, and
//! the dual-store persistence gateway. A UI shell consumes this crate;
//! rendering, identity and attachment encoding stay on its side of the
//! boundary.

pub mod app;
pub mod clock;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod remote;
pub mod services;

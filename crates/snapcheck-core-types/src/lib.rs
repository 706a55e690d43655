//! Core types shared across SnapCheck facilities
//!
//! This crate provides the canonical schema used by both the error
//! and logging facilities of every SnapCheck crate:
//!
//! - **Field keys**: structured logging field names
//! - **Event names**: operation boundary events (start/end/end_error)
//! - **Operation names**: stable names for the engine's logged operations

pub mod schema;

#![forbid(unsafe_code)]
//! syndic-core library.
//!
//! The reporting engine behind `syndic`: loosely-typed entity collections are
//! ingested once, filtered by a single [`context::FilterContext`], joined through
//! one-shot lookup indexes, classified, grouped, and assembled into a fixed
//! catalogue of reports.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the library seams, each mapped to an
//!   [`error::ErrorCode`]. Nothing inside report generation is fatal.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod aggregate;
pub mod config;
pub mod context;
pub mod date;
pub mod derive;
pub mod engine;
pub mod error;
pub mod filter;
pub mod model;
pub mod report;
pub mod resolve;
pub mod source;

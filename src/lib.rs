//! Core library for the `easychart` server.
//!
//! The binary is a thin wrapper around [`run`]. The pieces are public so the
//! chart pipeline can be driven without the HTTP front end: validate a body
//! with [`charts::parse_request`], aggregate dates with
//! [`charts::normalize`] and [`charts::bucketize`], and rasterize with
//! [`charts::ChartRenderer`].
pub mod args;
pub mod charts;
pub mod config;
pub mod error;
pub mod server;
pub mod shutdown;
pub mod shutdown_handlers;

mod entry;
mod logger;

pub use entry::run;

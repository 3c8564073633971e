//! Route analysis: city classification, length classes, handover points
//! and simulated occupancy.
//!
//! A run is two-phase. Every row is parsed first so the stop-count
//! threshold can be taken over the whole batch, then each row is tagged
//! against that threshold.

pub mod handover;
pub mod length;
pub mod occupancy;
pub mod pipeline;
pub mod route_type;
pub mod types;

pub use pipeline::Pipeline;

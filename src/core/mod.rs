//! Transport-agnostic orchestration of image tool runs.
//!
//! Control flow for one run:
//! [`validation`] -> [`encoder`] -> [`builder`] -> [`dispatch`] / [`poller`] -> [`normalize`],
//! driven by [`orchestrator::Studio`].

pub mod blob;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod poller;
pub mod session;
pub mod telemetry;
pub mod tool;
pub mod validation;

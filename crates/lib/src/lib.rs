//! rixpress-lib: artifact resolution and dependency graphs for rixpress pipelines
//!
//! The external build tool builds each derivation into the store and records
//! the results in a build log. This crate reads what it left behind:
//! - `log`: build log discovery and tolerant row lookup
//! - `resolve`: derivation name to artifact path(s)
//! - `load`: artifact deserialization with graceful fallback to paths
//! - `dag`: the pipeline dependency graph, CI stage ordering and DOT export

pub mod config;
pub mod consts;
pub mod dag;
pub mod load;
pub mod log;
pub mod pipeline;
pub mod resolve;

pub use config::Config;
pub use pipeline::Pipeline;

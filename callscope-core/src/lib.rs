//! # callscope-core
//!
//! Core library for callscope - a contact-center analytics dashboard.
//!
//! This library provides:
//! - Domain types for daily, hourly, monthly, and classifier metrics
//! - An HTTP backend client for the reporting API
//! - Pivot and aggregation analytics over classifier and hourly data
//! - Tri-state sorting and substring filtering for on-screen tables
//! - Styled multi-sheet xlsx export
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Backend:** raw records fetched from the reporting API
//! - **Analytics:** pivots and summaries computed from those records
//! - **Presentation:** sort/filter state applied per view, and xlsx export
//!
//! ## Example
//!
//! ```rust,no_run
//! use callscope_core::{Config, HttpBackend};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Connect to the reporting backend
//! let backend = HttpBackend::new(&config.backend).expect("failed to build client");
//! # let _ = backend;
//! ```

// Re-export commonly used items at the crate root
pub use backend::{HttpBackend, MetricsBackend};
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod backend;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod table;
pub mod types;

//! Data Model Shared Library
//!
//! This crate contains the models, the configuration validation engine and
//! the storage layer used by the data-model service and its CLI.
//!
//! # Modules
//!
//! - [`error`] - Error taxonomy and error codes
//! - [`models`] - Trace models, objective models and their building blocks
//! - [`validation`] - Validators for conditions, schedules, spans and objectives
//! - [`storage`] - Storage traits and in-memory implementations
//! - [`sync`] - Per-id locks and read coalescing
//!
//! # Example
//!
//! ```
//! use shared::models::Schedule;
//! use shared::error::ObjectKind;
//! use shared::validation::validate_schedule;
//!
//! let schedule = Schedule::new("FIX_RATE", "5m");
//! assert!(validate_schedule(&schedule, ObjectKind::MetricModel).is_ok());
//!
//! let too_long = Schedule::new("FIX_RATE", "25d");
//! let err = validate_schedule(&too_long, ObjectKind::MetricModel).unwrap_err();
//! assert_eq!(err.code, "DataModel.MetricModel.InvalidParameter.ScheduleExpression");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod models;
pub mod storage;
pub mod sync;
pub mod validation;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;

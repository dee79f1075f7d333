//! Core logic for Exposure.
//!
//! # Modules
//!
//! - [`validation`] - Pure field and time-window rules
//! - [`records`] - Validated CRUD over patients and events, including the
//!   patient-to-events cascade

pub mod records;
pub mod validation;

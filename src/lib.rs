//! Saver API Library
//!
//! This library provides the user registration service: domain rules,
//! the registration pipeline, persistence adapters, and the HTTP surface.

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infrastructure;
pub mod security;
pub mod services;
pub mod telemetry;

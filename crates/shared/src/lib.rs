//! Shared utilities for the Grafana adapter.
//!
//! This crate provides common functionality used across the other crates:
//! - Random password generation for provisioned users
//! - Deterministic service-user login derivation

pub mod password;
pub mod service_login;

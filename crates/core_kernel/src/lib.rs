//! Core Kernel - Foundational types shared by the claims tracking crates
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly typed identifiers for users and claims
//! - The port error type and marker traits for adapters
//! - Adapter health-check types

pub mod identifiers;
pub mod ports;

pub use identifiers::{UserId, ClaimId};
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable};

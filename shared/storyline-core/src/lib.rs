//! Storyline Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Standard service trait the hotline service implements
//! - Caller and message identifiers
//! - Error handling utilities
//! - Base configuration from the environment

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use domain::*;
pub use error::{Result, StorylineError};
pub use service::{
    DependencyStatus, HealthStatus, MicroserviceRuntime, ReadinessStatus, StorylineService,
};

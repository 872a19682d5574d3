//! # HR Desk Shared Library
//!
//! This crate contains the domain types, persistence layer and upload pipeline
//! used by the HR Desk API server.
//!
//! ## Module Organization
//!
//! - `assets`: Image upload checks, resizing and the public content store
//! - `auth`: Password hashing, personal access tokens and the bearer guard
//! - `db`: Connection pool and embedded migrations
//! - `models`: Database models and their CRUD operations
//! - `pagination`: Fixed-size page requests and page envelopes
//! - `validation`: Declarative per-field request validation

pub mod assets;
pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;
pub mod validation;

/// Current version of the HR Desk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

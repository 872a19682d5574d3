//! # HR Desk API Server Library
//!
//! This library provides the HTTP layer of HR Desk: user accounts with
//! bearer tokens, and company/employee records with image uploads.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request body extraction (JSON, urlencoded, multipart)
//! - `middleware`: Response middleware
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

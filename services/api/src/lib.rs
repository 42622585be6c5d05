//! services/api/src/lib.rs
//!
//! Shared library behind the `admin` and `content` binaries.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;

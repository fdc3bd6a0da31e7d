// src/lib.rs

//! pkgsetcomp
//!
//! Compares the packages installed on a Debian/Ubuntu system against a
//! distribution manifest and narrows the installed-but-not-in-manifest set
//! down to the packages a user would actually have to request by hand.
//!
//! # Architecture
//!
//! - `packages`: package lists, set difference and dependency providers
//! - `resolver`: closure walk over the dependency graph and minimal-set reduction
//! - `comparison`: the immutable result record and its renderings
//! - `repository`: manifest and installed-list sources with file caching
//! - `report`: per-category text lists and installer scripts
//! - `config`: run configuration

pub mod comparison;
pub mod config;
mod error;
pub mod packages;
pub mod report;
pub mod repository;
pub mod resolver;

pub use comparison::{Action, Category, Comparison, Directive, compare};
pub use config::Config;
pub use error::{Error, Result};

//! Shared test fixtures for WelfareSel crates.
//!
//! This crate provides catalog fixtures and a deterministic fake backend. It
//! depends only on `welfaresel-core` and `welfaresel-config`, so the solver
//! crate can use it as a dev-dependency without a cycle.
//!
//! - [`catalog`] - catalog fixtures and a reference objective
//! - [`backend`] - [`ExhaustiveBackend`], an exact brute-force `MilpBackend`
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! welfaresel-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use welfaresel_test::{disjoint_catalog, ExhaustiveBackend};
//! ```

pub mod backend;
pub mod catalog;

pub use backend::ExhaustiveBackend;
pub use catalog::{
    best_subset, dairy_catalog, dairy_rows, disjoint_catalog, indicator_ids, random_catalog,
    selection_objective, RandomCatalogSpec,
};

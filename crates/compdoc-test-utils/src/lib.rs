//! Shared test utilities for the compdoc workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] - upstream repositories and commits built with `git2`
//! - [`tree`] - [`ComponentTree`](tree::ComponentTree) builder for the
//!   components / docs / samples layout

pub mod git;
pub mod tree;

//! Shared test utilities for the toolsuite workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`context`]: [`FakeContext`], an in-memory context that records what it is asked to do
//! - [`dir`]: [`TestDir`] for writing context snapshots and inspecting saved suites

pub mod context;
pub mod dir;

pub use context::FakeContext;
pub use dir::TestDir;

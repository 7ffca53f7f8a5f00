//! Embeddable core library for modelfix.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into another CI tool or host process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`TextSource`](ports::TextSource) loads a model reply or a prompt
//! - [`WritePort`](ports::WritePort) writes files and creates directories
//! - [`CompletionPort`](ports::CompletionPort) sends one prompt to a model
//!
//! The [`adapters`] module provides default filesystem and HTTP implementations.
//!
//! # Entry points
//!
//! - [`run_apply`](pipeline::run_apply) extracts and applies fixes from a reply
//! - [`run_ask`](pipeline::run_ask) asks the model for a reply

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod reporter;
pub mod settings;

// Re-exported so embedders don't need the extract crate directly.
pub use modelfix_extract::ExtractOptions;

//! The `fizzy` command layer.
//!
//! Commands are plain async functions over the [`client_core::fizzy_client::Api`]
//! seam, so the binary wires in a live client and tests wire in a recorder.

pub mod attachments;
pub mod cli;
pub mod commands;
pub mod logger;
pub mod pseudo_columns;

#[cfg(test)]
mod tests;

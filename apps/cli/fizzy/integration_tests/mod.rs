//! End-to-end command runs against a mock Fizzy server.
//!
//! These drive the same path as the binary: argument parsing, config,
//! the live HTTP client, a handler, and the rendered envelope.

mod commands;

//! Integration tests for the Fizzy HTTP client against a local mock server.

mod download;
mod fizzy_client;
mod helpers;
mod pagination;
mod upload;

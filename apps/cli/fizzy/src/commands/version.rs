use client_core::response::Envelope;

use serde_json::json;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn handle() -> Envelope {
    Envelope::success(json!({ "version": VERSION }))
}

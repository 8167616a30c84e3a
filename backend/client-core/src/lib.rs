pub mod config;
pub mod error;
pub mod fizzy_client;
pub mod json_fields;
pub mod response;

#[cfg(test)]
mod tests;

pub const FIZZY_USER_AGENT: &str = "fizzy-cli/1.0";
pub const DEFAULT_API_URL: &str = "https://app.fizzy.do";

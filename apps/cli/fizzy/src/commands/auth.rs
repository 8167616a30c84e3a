//! Token management. These commands only touch config files.

use super::CommandContext;
use crate::cli::AuthCmd;

use client_core::DEFAULT_API_URL;
use client_core::config::FizzyConfig;
use client_core::error::FizzyError;
use client_core::fizzy_client::Api;
use client_core::response::Envelope;

use serde_json::{Map, Value, json};

pub fn handle<A: Api>(ctx: &CommandContext<A>, cmd: AuthCmd) -> Result<Envelope, FizzyError> {
    match cmd {
        AuthCmd::Login { token } => {
            let mut global = FizzyConfig::load_global(&ctx.paths);
            global.token = token;
            global.save_global(&ctx.paths)?;

            Ok(Envelope::success(json!({
                "authenticated": true,
                "message": "Token saved to config file",
            })))
        }
        AuthCmd::Logout => {
            FizzyConfig::delete_global(&ctx.paths)?;

            Ok(Envelope::success(json!({
                "authenticated": false,
                "message": "Logged out successfully",
            })))
        }
        AuthCmd::Status => Ok(Envelope::success(status(&ctx.config))),
    }
}

/// The API URL is only reported when it differs from the default.
pub fn status(config: &FizzyConfig) -> Value {
    let mut status = Map::new();
    let authenticated = !config.token.is_empty();
    status.insert("authenticated".to_string(), Value::Bool(authenticated));

    if authenticated {
        status.insert("token_configured".to_string(), Value::Bool(true));
        if !config.account.is_empty() {
            status.insert("account".to_string(), Value::from(config.account.clone()));
        }
        if !config.api_url.is_empty() && config.api_url != DEFAULT_API_URL {
            status.insert("api_url".to_string(), Value::from(config.api_url.clone()));
        }
    }

    Value::Object(status)
}

use fizzy::cli::Cli;
use fizzy::commands::{self, CommandContext};
use fizzy::logger::initialize as LoggerInitialize;

use client_core::config::{ConfigOverrides, ConfigPaths, FizzyConfig};
use client_core::error::FizzyError;
use client_core::fizzy_client::FizzyClient;
use client_core::response::Envelope;

use common::RedactedToken;

use std::io::Write;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use log::{debug, error};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if is_informational(e.kind()) => {
            let _ = e.print();
            std::process::exit(e.exit_code());
        }
        Err(e) => exit_with(Envelope::error(&FizzyError::invalid_args(usage_message(&e)))),
    };

    if let Err(e) = LoggerInitialize(cli.verbose) {
        eprintln!("{e}");
    }

    let paths = ConfigPaths::from_environment();
    let mut config = FizzyConfig::load_layered(&paths, |key| std::env::var(key).ok());
    config.apply_overrides(&ConfigOverrides {
        token: cli.token.clone(),
        account: cli.account.clone(),
        api_url: cli.api_url.clone(),
    });
    debug!("Effective config: {config:?}");

    let envelope = match FizzyClient::new(
        &config.api_url,
        RedactedToken::new(config.token.clone()),
        &config.account,
    ) {
        Ok(client) => {
            let ctx = CommandContext::new(client, config, paths);
            Envelope::from_result(commands::run(&ctx, cli.command).await)
        }
        Err(e) => Envelope::error(&e),
    };

    exit_with(envelope);
}

fn is_informational(kind: ClapErrorKind) -> bool {
    matches!(
        kind,
        ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

/// First line of clap's report, without its `error: ` prefix.
fn usage_message(e: &clap::Error) -> String {
    let rendered = e.render().to_string();
    rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}

fn exit_with(envelope: Envelope) -> ! {
    let (bytes, code) = envelope.render();
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(&bytes).and_then(|()| stdout.flush()) {
        error!("Failed to write response: {e}");
    }
    std::process::exit(code);
}

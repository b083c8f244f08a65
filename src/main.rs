// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use lendclip::api::{ApiClient, HttpTransport};
use lendclip::config::{Config, Overrides};
use lendclip::session::Session;
use lendclip::{cli, commands, db};

const LOG_ENV: &str = "LENDCLIP_LOG";

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "lendclip=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"), matches.get_flag("log-json"));

    let overrides = Overrides::from_matches(&matches);
    let conn = db::open_or_init()?;

    if let Some(("config", sub)) = matches.subcommand() {
        return commands::config::handle(&conn, &overrides, sub);
    }
    let config = Config::from_env(&conn, &overrides)?;
    let session = Arc::new(Session::hydrate(conn)?);
    session.set_login_redirect(|| {
        eprintln!("Your session has expired. Run `lendclip login` to sign in again.");
    });
    let transport = HttpTransport::new(&config.api_url, config.timeout)?;
    let client = ApiClient::new(transport, session).with_retries(config.retries);

    match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(&client, sub)?,
        Some(("register", sub)) => commands::auth::register(&client, sub)?,
        Some(("logout", _)) => commands::auth::logout(&client)?,
        Some(("whoami", _)) => commands::auth::whoami(&client)?,
        Some(("bid", sub)) => commands::bids::handle(&client, sub)?,
        Some(("investments", sub)) => commands::investments::handle(&client, sub)?,
        Some(("sell", sub)) => commands::sell::handle(&client, sub)?,
        Some(("referral", sub)) => commands::referrals::handle(&client, &config, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&client, &config, sub)?,
        Some(("audit", sub)) => commands::audit::handle(&client, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Config, Overrides, store};
use crate::utils::{list_settings, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, overrides: &Overrides, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            store(conn, key, value)?;
            println!("Set {} = {}", key, value.trim());
        }
        Some(("show", _)) => {
            let stored = list_settings(conn)?;
            if !stored.is_empty() {
                let rows = stored.into_iter().map(|(k, v)| vec![k, v]).collect();
                println!("{}", pretty_table(&["Key", "Stored"], rows));
            }
            let cfg = Config::from_env(conn, overrides)?;
            let rows = vec![
                vec!["api_url".to_string(), cfg.api_url],
                vec!["origin".to_string(), cfg.origin],
                vec!["timeout_secs".to_string(), cfg.timeout.as_secs().to_string()],
                vec!["retries".to_string(), cfg.retries.to_string()],
                vec!["data_dir".to_string(), crate::db::data_dir()?.display().to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Effective"], rows));
        }
        _ => {}
    }
    Ok(())
}

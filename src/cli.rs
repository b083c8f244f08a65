// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn page_arg() -> Arg {
    Arg::new("page")
        .long("page")
        .value_parser(value_parser!(usize))
        .default_value("1")
        .help("1-based page (10 rows per page)")
}

pub fn build_cli() -> Command {
    Command::new("lendclip")
        .version(crate_version!())
        .about("Peer-to-peer lending client: loan bids, maturity countdowns, referrals")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .help("API base URL (overrides LENDCLIP_API_URL and stored setting)"),
        )
        .arg(
            Arg::new("origin")
                .long("origin")
                .global(true)
                .help("Origin used for shareable referral links"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging to stderr"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in with phone number and password")
                .arg(Arg::new("phone").long("phone").required(true))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .env("LENDCLIP_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account, optionally with a referral code")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("phone").long("phone").required(true))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .env("LENDCLIP_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(Arg::new("confirm").long("confirm").required(true))
                .arg(Arg::new("ref").long("ref").help("Referral code")),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Verify the session and show the profile"))
        .subcommand(
            Command::new("bid")
                .about("Loan bids")
                .subcommand(
                    Command::new("place")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(u32))
                                .default_value("5")
                                .help("Maturity period: 5, 10, 20, 30 or 40"),
                        ),
                )
                .subcommand(
                    Command::new("estimate")
                        .about("Preview the return without placing a bid")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(u32))
                                .default_value("5"),
                        ),
                ),
        )
        .subcommand(
            Command::new("investments")
                .about("Your loan bids and their maturity")
                .subcommand(json_args(Command::new("list").arg(page_arg())))
                .subcommand(
                    Command::new("watch")
                        .about("Live countdown for running bids")
                        .arg(page_arg())
                        .arg(
                            Arg::new("ticks")
                                .long("ticks")
                                .value_parser(value_parser!(u64))
                                .help("Stop after this many ticks"),
                        )
                        .arg(
                            Arg::new("refresh")
                                .long("refresh")
                                .value_parser(value_parser!(u64))
                                .help("Re-fetch from the server every N seconds"),
                        ),
                ),
        )
        .subcommand(
            Command::new("sell")
                .about("Pairings awaiting repayment confirmation")
                .subcommand(json_args(Command::new("list").arg(page_arg())))
                .subcommand(
                    Command::new("confirm").arg(
                        Arg::new("id")
                            .long("id")
                            .value_parser(value_parser!(i64))
                            .required(true),
                    ),
                ),
        )
        .subcommand(
            Command::new("referral")
                .about("Referral link, history and bonuses")
                .subcommand(Command::new("link"))
                .subcommand(json_args(Command::new("list").arg(page_arg())))
                .subcommand(
                    Command::new("verify").arg(Arg::new("code").long("code").required(true)),
                ),
        )
        .subcommand(json_args(
            Command::new("dashboard").about("Balances, statistics and pending payments"),
        ))
        .subcommand(json_args(
            Command::new("audit").about("System overview (admin only)"),
        ))
        .subcommand(
            Command::new("config")
                .about("Stored settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                ),
        )
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .required(true)
        .help("Username owning the record")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .required(true)
        .help("Month key YYYY-MM")
}

fn wallet_arg() -> Arg {
    Arg::new("wallet")
        .long("wallet")
        .required(true)
        .help("Payment source: Rafael or Jessica")
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("Date YYYY-MM-DD (defaults to today)")
}

pub fn build_cli() -> Command {
    Command::new("billfold")
        .about("Two-wallet household finance tracker (USD/COP)")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .about("Add a user")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("email").long("email"))
                        .arg(
                            Arg::new("password-hash")
                                .long("password-hash")
                                .required(true)
                                .help("Pre-computed password hash (hashing is the front end's concern)"),
                        ),
                )
                .subcommand(
                    Command::new("set-password")
                        .about("Replace a user's password hash")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("password-hash").long("password-hash").required(true)),
                )
                .subcommand(Command::new("list").about("List users")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage expense categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("list").about("List categories")),
        )
        .subcommand(
            Command::new("rate")
                .about("Manage the USD/COP exchange rate")
                .subcommand(
                    Command::new("set")
                        .about("Insert a new rate and make it active")
                        .arg(Arg::new("rate").long("rate").required(true))
                        .arg(date_arg())
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("activate")
                        .about("Re-activate an existing rate by id")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List all rates")))
                .subcommand(Command::new("current").about("Show the rate in effect"))
                .subcommand(
                    Command::new("fetch")
                        .about("Fetch the latest USD/COP quote via Frankfurter (ECB)")
                        .arg(
                            Arg::new("activate")
                                .long("activate")
                                .action(ArgAction::SetTrue)
                                .help("Also store and activate the fetched rate"),
                        ),
                ),
        )
        .subcommand(
            Command::new("income")
                .about("Record and list income")
                .subcommand(
                    Command::new("add")
                        .about("Record a wallet's standard monthly income")
                        .arg(user_arg())
                        .arg(wallet_arg())
                        .arg(
                            Arg::new("threshold")
                                .long("threshold")
                                .help("Floor threshold for the conversion rule (default 4400)"),
                        )
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("add-extra")
                        .about("Record a free-named USD income (bonus, freelance, ...)")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(wallet_arg())
                        .arg(date_arg()),
                )
                .subcommand(
                    json_flags(Command::new("list").about("List income records"))
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("wallet").long("wallet"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand(
                    Command::new("add")
                        .about("Record a manual expense")
                        .arg(user_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(date_arg())
                        .arg(wallet_arg()),
                )
                .subcommand(
                    json_flags(Command::new("list").about("List expenses"))
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month"))
                        .arg(
                            Arg::new("filter")
                                .long("filter")
                                .value_parser(["all", "regular", "fixed"])
                                .default_value("all")
                                .help("all, regular (manual only) or fixed (synthetic only)"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a manual expense by id")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("fixed")
                .about("Manage recurring fixed liabilities")
                .subcommand(
                    Command::new("init")
                        .about("Seed the default liability catalog for a month")
                        .arg(user_arg())
                        .arg(month_arg()),
                )
                .subcommand(
                    json_flags(Command::new("list").about("List liabilities for a month"))
                        .arg(user_arg())
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Mark a liability paid, materializing its expense")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .help("Paid amount when it differs from the nominal amount"),
                        )
                        .arg(wallet_arg())
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("unpay")
                        .about("Mark a liability unpaid, removing its expense")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("reset")
                        .about("Mark every liability of a month unpaid (new cycle)")
                        .arg(user_arg())
                        .arg(month_arg()),
                ),
        )
        .subcommand(
            Command::new("asset")
                .about("Manage assets and credit balances")
                .subcommand(
                    Command::new("add")
                        .about("Add an asset (negative value = liability/credit)")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("value").long("value").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(date_arg()),
                )
                .subcommand(json_flags(Command::new("list").about("List assets")).arg(user_arg()))
                .subcommand(
                    Command::new("update")
                        .about("Update an asset by id")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("value").long("value"))
                        .arg(Arg::new("description").long("description"))
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("rm").about("Delete an asset by id").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Balances, forecasts and breakdowns")
                .subcommand(json_flags(
                    Command::new("balances").about("Per-wallet balances and total"),
                ))
                .subcommand(
                    Command::new("forecast")
                        .about("Expected vs actual income and fixed totals for the month")
                        .arg(user_arg())
                        .arg(date_arg()),
                )
                .subcommand(
                    json_flags(
                        Command::new("spend-by-category").about("Spend per category for a month"),
                    )
                    .arg(user_arg())
                    .arg(month_arg()),
                )
                .subcommand(
                    json_flags(Command::new("month").about("Dated events for a month"))
                        .arg(user_arg())
                        .arg(month_arg()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export ledger data")
                .subcommand(
                    Command::new("expenses")
                        .about("Export expenses")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("income")
                        .about("Export income")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Audit stored data for inconsistencies"))
}

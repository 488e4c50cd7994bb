// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn limit_arg(default: &'static str) -> Arg {
    Arg::new("limit")
        .long("limit")
        .value_parser(value_parser!(usize))
        .default_value(default)
}

fn snapshot_id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .value_parser(value_parser!(i64))
        .help("Snapshot id (defaults to the latest)")
}

pub fn build_cli() -> Command {
    Command::new("balsheet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track company balances and reconcile them against accounting reports")
        .subcommand(
            Command::new("init")
                .about("Create the database")
                .arg(
                    Arg::new("sample")
                        .long("sample")
                        .action(ArgAction::SetTrue)
                        .help("Seed sample accounts and notes into an empty book"),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Locally tracked balance sheet accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("asset|liability|equity"),
                        )
                        .arg(
                            Arg::new("subcategory")
                                .long("subcategory")
                                .help("current|non_current"),
                        )
                        .arg(Arg::new("balance").long("balance").default_value("0"))
                        .arg(Arg::new("currency").long("currency").default_value("USD"))
                        .arg(Arg::new("status").long("status").default_value("reconciled"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("balance").long("balance"))
                        .arg(Arg::new("status").long("status"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true))),
        )
        .subcommand(
            Command::new("note")
                .about("Reconciliation notes")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").default_value("0"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("adjustment")
                                .help("adjustment|open_item|info"),
                        )
                        .arg(Arg::new("status").long("status").default_value("pending")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("set-status")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .required(true)
                                .help("pending|resolved|reviewed"),
                        ),
                ),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Reconcile accounting reports and store a snapshot")
                .arg(Arg::new("as-of").long("as-of").help("YYYY-MM-DD, defaults to today"))
                .arg(
                    Arg::new("source")
                        .long("source")
                        .default_value("qbo")
                        .value_parser(["qbo", "dir"]),
                )
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .help("Directory of captured report payloads (with --source dir)"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Do not store a snapshot"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Stored reconciliation snapshots")
                .subcommand(Command::new("list").arg(limit_arg("20")).arg(json_flag()))
                .subcommand(Command::new("show").arg(snapshot_id_arg()).arg(json_flag())),
        )
        .subcommand(
            Command::new("report")
                .about("Reports over the local book")
                .subcommand(Command::new("balance-sheet").arg(json_flag())),
        )
        .subcommand(
            Command::new("export")
                .about("Export stored data")
                .subcommand(
                    Command::new("snapshot")
                        .arg(snapshot_id_arg())
                        .arg(Arg::new("format").long("format").required(true).help("csv|json"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("audit")
                .about("Audit trail")
                .subcommand(Command::new("list").arg(limit_arg("50"))),
        )
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use balsheet::{cli, commands, config::Config, db, logging};

fn main() -> Result<()> {
    let cfg = Config::from_env();
    logging::init(&cfg.log_level);

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init(cfg.db_path.as_deref())?;

    match matches.subcommand() {
        Some(("init", sub)) => {
            println!(
                "Database initialized at {}",
                db::db_path(cfg.db_path.as_deref())?.display()
            );
            commands::init::handle(&conn, sub)?;
        }
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("note", sub)) => commands::notes::handle(&conn, sub)?,
        Some(("reconcile", sub)) => commands::reconcile::handle(&conn, &cfg, sub)?,
        Some(("snapshot", sub)) => commands::snapshots::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("audit", sub)) => commands::audit_log::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

//! dct - command-line front end for DCT bookings
//!
//! Reads and writes bookings through the sync manager: the local cache is
//! always updated first, the remote store is mirrored when reachable.

mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::{run_add, AddArgs};
use crate::commands::calendar::run_calendar;
use crate::commands::common::{
    failure_notice, print_notice, resolve_cache_path, resolve_remote_config, ManagerOptions,
};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, EditArgs};
use crate::commands::list::run_list;
use crate::commands::refresh::run_refresh;
use crate::commands::remote::run_remote;
use crate::commands::search::run_search;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        print_notice(&failure_notice(&error));
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dct=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        command,
        cache_path,
        profile,
        offline,
    } = Cli::parse();
    let profile = profile.as_deref();
    let manager_options = || -> Result<ManagerOptions, CliError> {
        Ok(ManagerOptions {
            cache_path: resolve_cache_path(cache_path.clone())?,
            remote: resolve_remote_config(profile)?,
            offline,
        })
    };

    match command {
        Some(Commands::List { date, json }) => run_list(date, json, &manager_options()?).await?,
        Some(Commands::Calendar { month }) => run_calendar(month, &manager_options()?).await?,
        Some(Commands::Search { query, json }) => {
            run_search(&query, json, &manager_options()?).await?;
        }
        Some(Commands::Add {
            date,
            from,
            to,
            user,
            team,
            remarks,
            allow_past,
        }) => {
            let args = AddArgs {
                date,
                from,
                to,
                user,
                team,
                remarks,
                allow_past,
            };
            run_add(args, &manager_options()?).await?;
        }
        Some(Commands::Edit {
            id,
            date,
            from,
            to,
            user,
            team,
            remarks,
            allow_past,
        }) => {
            let args = EditArgs {
                date,
                from,
                to,
                user,
                team,
                remarks,
                allow_past,
            };
            run_edit(&id, args, &manager_options()?).await?;
        }
        Some(Commands::Delete { id }) => run_delete(&id, &manager_options()?).await?,
        Some(Commands::Refresh) => run_refresh(&manager_options()?).await?,
        Some(Commands::Remote { command }) => {
            run_remote(command, &resolve_remote_config(profile)?).await?;
        }
        Some(Commands::Config { command }) => run_config(command, profile)?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}

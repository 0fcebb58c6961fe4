use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::calendar::parse_month_arg;
use crate::commands::common::{parse_date_arg, parse_time_arg};

#[derive(Parser)]
#[command(name = "dct")]
#[command(about = "Reserve and browse DCT time slots from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to the local booking cache file
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_path: Option<PathBuf>,

    /// CLI profile name holding the remote store configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Treat the host as offline: read and write the local cache only
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List bookings
    #[command(alias = "ls")]
    List {
        /// Only show bookings on this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how many bookings fall on each day of a month
    Calendar {
        /// Month to summarize (YYYY-MM)
        #[arg(value_parser = parse_month_arg)]
        month: (i32, u32),
    },
    /// Search bookings by user, team, remarks, date or time
    Search {
        /// Search term
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a booking
    #[command(alias = "new")]
    Add {
        /// Booking date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        /// Start time (HH:MM)
        #[arg(long, value_parser = parse_time_arg)]
        from: NaiveTime,
        /// End time (HH:MM)
        #[arg(long, value_parser = parse_time_arg)]
        to: NaiveTime,
        /// Requester name
        #[arg(long)]
        user: String,
        /// Team name
        #[arg(long)]
        team: String,
        /// Free-text remarks
        #[arg(long, default_value = "")]
        remarks: String,
        /// Allow a start time that has already passed
        #[arg(long)]
        allow_past: bool,
    },
    /// Edit an existing booking
    Edit {
        /// Booking ID or unique ID prefix
        id: String,
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_time_arg)]
        from: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time_arg)]
        to: Option<NaiveTime>,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        remarks: Option<String>,
        /// Allow moving the start to a time that has already passed
        #[arg(long)]
        allow_past: bool,
    },
    /// Delete a booking
    Delete {
        /// Booking ID or unique ID prefix
        id: String,
    },
    /// Reload bookings from the remote store (or the local cache when unavailable)
    Refresh,
    /// Inspect the remote store
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum RemoteCommands {
    /// Check the connection and print the row count plus a few sample bookings
    Check {
        /// Number of sample bookings to print
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile (selected with the global --profile)
    Init {
        /// Supabase project URL
        #[arg(long, value_name = "URL")]
        supabase_url: Option<String>,
        /// Supabase anon/public key
        #[arg(long, value_name = "KEY")]
        supabase_anon_key: Option<String>,
        /// Bookings table name
        #[arg(long, value_name = "NAME")]
        table: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show the resolved remote configuration
    Show,
}

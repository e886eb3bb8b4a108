//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::channel::Semantics;

/// slotbook - UDP client for the facility booking service
#[derive(Debug, Parser)]
#[command(name = "slotbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server address as host:port
    #[arg(short, long, env = "SLOTBOOK_SERVER")]
    pub server: Option<String>,

    /// Per-attempt reply timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Retransmissions after the first attempt (at-least-once only)
    #[arg(long)]
    pub retries: Option<u32>,

    /// Invocation semantics for requests
    #[arg(long, value_enum)]
    pub semantics: Option<Semantics>,

    /// Path to configuration file
    #[arg(long, short, env = "SLOTBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query facility availability
    Query {
        /// Facility name
        #[arg(short, long)]
        name: String,

        /// Days to query, e.g. monday wednesday
        #[arg(short, long, num_args = 1.., required = true)]
        days: Vec<String>,
    },

    /// Book consecutive half-hour slots
    Book {
        /// Facility name
        #[arg(short, long)]
        name: String,

        /// Day to book, e.g. friday
        #[arg(short, long)]
        day: String,

        /// First slot, 0..15 (slot 0 is 08:00)
        #[arg(short, long)]
        start_slot: u8,

        /// Number of slots to book
        #[arg(long)]
        num_slots: u8,

        /// Booking owner id, 1..255
        #[arg(short, long)]
        user_id: u8,
    },

    /// Move an existing booking earlier or later
    Update {
        /// Confirmation id from the booking response
        #[arg(short, long)]
        confirmation_id: u32,

        /// Slots to shift by; negative moves the booking earlier
        #[arg(short, long, allow_hyphen_values = true)]
        offset: i8,
    },

    /// Listen for pushed schedule updates
    Monitor {
        /// Subscription length in seconds
        #[arg(short, long)]
        duration: u32,
    },
}

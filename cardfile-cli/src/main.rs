//! Cardfile CLI - contacts in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use cardfile_core::Category;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{auth, contacts};

/// Cardfile - contacts in your terminal
#[derive(Parser)]
#[command(name = "cf", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        /// Email address
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in and load your contacts
    Login {
        /// Email address
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and clear the saved session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update your profile
    Profile {
        /// Display name
        name: String,
        /// Path to an avatar image
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// List all contacts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search contacts by name, email or phone
    Search {
        /// Query text (empty matches everything)
        #[arg(default_value = "")]
        query: String,
        /// Restrict to one category (Family, Friend, Work, Other)
        #[arg(long)]
        category: Option<Category>,
        /// Favorites only
        #[arg(long)]
        favorites: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a contact
    Add {
        /// Contact name
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Category (Family, Friend, Work, Other)
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        notes: Option<String>,
        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
    },

    /// Edit a contact (unset flags keep current values)
    Edit {
        /// Contact id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Category (Family, Friend, Work, Other)
        #[arg(long)]
        category: Option<Category>,
        /// Record that you contacted them just now
        #[arg(long)]
        touch: bool,
    },

    /// Delete a contact
    Rm {
        /// Contact id
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Toggle a contact's favorite flag
    Fav {
        /// Contact id
        id: String,
    },

    /// Replace a contact's notes
    Notes {
        /// Contact id
        id: String,
        /// Notes text
        notes: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Signup { email, password } => auth::signup(&email, password),
        Commands::Login { email, password } => auth::login(&email, password),
        Commands::Logout => auth::logout(),
        Commands::Whoami { json } => auth::whoami(json),
        Commands::Profile { name, avatar } => auth::profile(&name, avatar),
        Commands::List { json } => contacts::list(json),
        Commands::Search { query, category, favorites, json } => {
            contacts::search(&query, category, favorites, json)
        }
        Commands::Add { name, email, phone, address, category, notes, favorite } => {
            contacts::add(&name, email, phone, address, category, notes, favorite)
        }
        Commands::Edit { id, name, email, phone, address, category, touch } => {
            contacts::edit(&id, name, email, phone, address, category, touch)
        }
        Commands::Rm { id, force } => contacts::rm(&id, force),
        Commands::Fav { id } => contacts::fav(&id),
        Commands::Notes { id, notes } => contacts::notes(&id, &notes),
    }
}

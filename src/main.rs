mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use recital_core::config::RecitalConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recital")]
#[command(about = "Manage the concert schedule and performance videos of your portfolio")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Concert and event schedule
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
    /// Performance videos
    Video {
        #[command(subcommand)]
        action: VideoAction,
    },
    /// Print the active configuration
    Config,
}

#[derive(Subcommand)]
enum ScheduleAction {
    /// List upcoming events and the archive
    List {
        /// Only show upcoming events
        #[arg(short, long)]
        upcoming: bool,
    },
    /// Add an event
    Add {
        /// Event date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        details: Option<String>,

        /// Poster or photo to upload with the event
        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },
    /// Change an event. Fields not given keep their value.
    Edit {
        id: String,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        details: Option<String>,

        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },
    /// Remove an event
    Rm {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum VideoAction {
    /// List videos in gallery order
    List,
    /// Add a video from a YouTube URL
    Add {
        #[arg(short, long)]
        title: String,

        /// Any YouTube share, watch or embed URL
        #[arg(short, long)]
        url: String,

        /// Position in the gallery (defaults to the end)
        #[arg(short, long)]
        order: Option<i64>,
    },
    /// Change a video. Fields not given keep their value.
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        url: Option<String>,

        #[arg(short, long)]
        order: Option<i64>,
    },
    /// Remove a video
    Rm {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RecitalConfig::load()?;

    match cli.command {
        Commands::Schedule { action } => match action {
            ScheduleAction::List { upcoming } => commands::schedule::list(&config, upcoming).await,
            ScheduleAction::Add {
                date,
                title,
                location,
                details,
                image,
            } => {
                let fields = commands::schedule::Fields {
                    date: Some(date),
                    title: Some(title),
                    location,
                    details,
                    image,
                };
                commands::schedule::add(&config, fields).await
            }
            ScheduleAction::Edit {
                id,
                date,
                title,
                location,
                details,
                image,
            } => {
                let fields = commands::schedule::Fields {
                    date,
                    title,
                    location,
                    details,
                    image,
                };
                commands::schedule::edit(&config, &id, fields).await
            }
            ScheduleAction::Rm { id, force } => commands::schedule::rm(&config, &id, force).await,
        },
        Commands::Video { action } => match action {
            VideoAction::List => commands::video::list(&config).await,
            VideoAction::Add { title, url, order } => {
                commands::video::add(&config, title, url, order).await
            }
            VideoAction::Edit {
                id,
                title,
                url,
                order,
            } => commands::video::edit(&config, &id, title, url, order).await,
            VideoAction::Rm { id, force } => commands::video::rm(&config, &id, force).await,
        },
        Commands::Config => commands::config::run(&config),
    }
}

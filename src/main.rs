//! CLI entry point for kloptdat

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kloptdat::commands::new::NewArticle;
use kloptdat::content::{Category, Rating};

#[derive(Parser)]
#[command(name = "kloptdat")]
#[command(version = "0.1.0")]
#[command(about = "Fact-check site generator for KloptDat.be", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new fact-check article
    New {
        /// Title of the new article
        title: String,

        /// Directory name (derived from the title by default)
        #[arg(short, long)]
        slug: Option<String>,

        /// Verdict: waar, gedeeltelijk-waar, niet-waar, misleidend
        #[arg(short, long, default_value = "misleidend")]
        rating: String,

        /// Category stored in front-matter: politiek, economie, europa, social
        #[arg(short = 'k', long)]
        category: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (articles, categories, ratings)
        #[arg(default_value = "articles")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "kloptdat=debug,info"
    } else {
        "kloptdat=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing KloptDat site in {:?}", target_dir);
            kloptdat::commands::init::init_site(&target_dir)?;
            println!("Initialized KloptDat site in {:?}", target_dir);
        }

        Commands::New {
            title,
            slug,
            rating,
            category,
        } => {
            let site = kloptdat::KloptDat::new(&base_dir)?;
            let rating: Rating = rating.parse().map_err(|e: String| anyhow!(e))?;
            let category = category
                .map(|c| c.parse::<Category>())
                .transpose()
                .map_err(|e| anyhow!(e))?;
            tracing::info!("Creating new article: {}", title);
            site.new_article(&NewArticle {
                title,
                slug,
                rating,
                category,
            })?;
        }

        Commands::Generate { watch } => {
            let site = kloptdat::KloptDat::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                kloptdat::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server { port, ip, open } => {
            let site = kloptdat::KloptDat::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            kloptdat::server::start(&site, &ip, port, open).await?;
        }

        Commands::Clean => {
            let site = kloptdat::KloptDat::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = kloptdat::KloptDat::new(&base_dir)?;
            kloptdat::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("kloptdat version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

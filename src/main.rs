//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::commands::new::PostFields;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Query and edit the posts of a Markdown/MDX blog", long_about = None)]
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

    /// List site information
    List {
        /// Type of content to list (post, tag, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Print a post as JSON
    Show {
        slug: String,
    },

    /// Search posts by title, excerpt, tags and category
    Search {
        query: String,

        /// Also search post bodies
        #[arg(long)]
        full: bool,
    },

    /// Create a new post, or edit an existing one with --edit
    New {
        /// Title of the post; required unless editing
        title: Option<String>,

        /// Slug of an existing post to edit
        #[arg(short, long)]
        edit: Option<String>,

        #[arg(long)]
        excerpt: Option<String>,

        /// Publication date (defaults to today)
        #[arg(long)]
        date: Option<String>,

        #[arg(short, long)]
        author: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,

        /// Cover image URL or path
        #[arg(long)]
        cover: Option<String>,

        /// Post body
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the post body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,
    },

    /// Delete a post
    Delete {
        slug: String,
    },

    /// Serve the posts as a JSON API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured address)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
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
            tracing::info!("Initializing site in {:?}", target_dir);
            folio_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::List { r#type } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::list::run(&folio, &r#type)?;
        }

        Commands::Show { slug } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::show::run(&folio, &slug)?;
        }

        Commands::Search { query, full } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::search::run(&folio, &query, full)?;
        }

        Commands::New {
            title,
            edit,
            excerpt,
            date,
            author,
            category,
            tags,
            cover,
            body,
            body_file,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let body = match body_file {
                Some(path) => Some(std::fs::read_to_string(path)?),
                None => body,
            };
            let fields = PostFields {
                title,
                excerpt,
                date,
                author,
                category,
                tags,
                cover_image: cover,
                body,
            };

            match edit {
                Some(slug) => {
                    tracing::info!("Editing post: {}", slug);
                    folio_rs::commands::new::edit_post(&folio, &slug, fields)?;
                }
                None => {
                    tracing::info!("Creating new post");
                    folio_rs::commands::new::create_post(&folio, fields)?;
                }
            }
        }

        Commands::Delete { slug } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::delete::run(&folio, &slug)?;
        }

        Commands::Serve { port, ip } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| folio.config.server.ip.clone());
            let port = port.unwrap_or(folio.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(&folio, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

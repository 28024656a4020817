//! CLI entry point for notion-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notion_blog::commands;
use notion_blog::Blog;

#[derive(Parser)]
#[command(name = "notion-blog")]
#[command(version)]
#[command(about = "A blog front-end for Notion-style content", long_about = None)]
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

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Category of the new post
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Slug (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// List site information
    List {
        /// Type of content to list (post, category, stats)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Search live posts
    Search {
        /// Search text
        query: String,
    },

    /// Print an article's normalized body
    Render {
        /// Article slug
        slug: String,

        /// Print the full page instead of the body
        #[arg(long)]
        page: bool,
    },

    /// Normalize an exported HTML file
    Normalize {
        /// HTML file to normalize
        file: PathBuf,

        /// Keep normalizing as the file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start the server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Disable content watching
        #[arg(long)]
        r#static: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "notion_blog=debug,info"
    } else {
        "notion_blog=info"
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
            commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            title,
            category,
            slug,
        } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            commands::new::create_post(&blog, &title, category.as_deref(), slug.as_deref())?;
        }

        Commands::List { r#type } => {
            let blog = Blog::new(&base_dir)?;
            commands::list::run(&blog, &r#type)?;
        }

        Commands::Search { query } => {
            let blog = Blog::new(&base_dir)?;
            commands::search::run(&blog, &query)?;
        }

        Commands::Render { slug, page } => {
            let blog = Blog::new(&base_dir)?;
            commands::render::run(&blog, &slug, page)?;
        }

        Commands::Normalize { file, watch } => {
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            if watch {
                commands::normalize::watch(&file).await?;
            } else {
                commands::normalize::run(&file)?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            notion_blog::server::start(blog, &ip, port, !r#static, open).await?;
        }

        Commands::Version => {
            println!("notion-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

//! hcsindex CLI
//!
//! Index the sections of historic context statements and open them at the
//! right page.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for hcsindex.
#[derive(Parser)]
#[command(
    name = "hcsindex",
    version,
    about = "Find sections of historic context statements by style or theme"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "hcsindex.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Download the source PDFs
    Fetch {
        /// Download again even if the file exists
        #[arg(long)]
        force: bool,
    },
    /// Scan the PDFs and write the manifest
    Build,
    /// Search sections by style, theme or label
    Search {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the viewer link for a document page
    Link {
        /// Document file name
        document: String,
        /// 1-based page number
        page: u32,
        /// Open the link in the browser
        #[arg(long)]
        open: bool,
    },
    /// Show which section a page belongs to
    Locate {
        /// Document file name
        document: String,
        /// 1-based page number
        page: u32,
    },
    /// Find the framework section for a style and construction year
    Resolve {
        /// Style name
        style: String,
        /// Construction year
        year: i32,
        /// Open the link in the browser
        #[arg(long)]
        open: bool,
    },
    /// Validate configuration and manifest
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Start the HTTP search page
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Serve the local PDFs and link to them
        #[arg(long)]
        local: bool,
        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    hcsindex::init_tracing(cli.verbose);

    match cli.command {
        Commands::Fetch { force } => {
            hcsindex::cmd::fetch::run(&cli.config, force)?;
        }
        Commands::Build => {
            hcsindex::cmd::build::run(&cli.config)?;
        }
        Commands::Search { query, limit, json } => {
            hcsindex::cmd::search::run(&cli.config, &query.join(" "), limit, json)?;
        }
        Commands::Link {
            document,
            page,
            open,
        } => {
            hcsindex::cmd::link::run(&cli.config, &document, page, open)?;
        }
        Commands::Locate { document, page } => {
            hcsindex::cmd::locate::run(&cli.config, &document, page)?;
        }
        Commands::Resolve { style, year, open } => {
            hcsindex::cmd::resolve::run(&cli.config, &style, year, open)?;
        }
        Commands::Check { strict } => {
            hcsindex::cmd::check::run(&cli.config, strict)?;
        }
        Commands::Serve { port, local, open } => {
            hcsindex::cmd::serve::run(&cli.config, port, local, open).await?;
        }
    }

    Ok(())
}

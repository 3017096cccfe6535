//! MathGet, the package manager for MathScript packages

use clap::{Parser, Subcommand};
use mathget_pm::commands::{self, StdinPrompt};
use mathget_pm::{HttpIndex, Layout, Result};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "mathget")]
#[command(about = "MathGet, the package manager to update and manage MathScript packages")]
#[command(version)]
struct Cli {
    /// The MathScript install directory (defaults to MATHSCRIPT_HOME, then
    /// the directory of the mathscript executable on PATH)
    #[arg(long, global = true, value_name = "dir")]
    install_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a package
    Install {
        /// The package to install
        package: Option<String>,
        /// Force the installation even if the package is already installed
        #[arg(short, long)]
        force: bool,
        /// File listing the packages to install, one per line
        #[arg(short, long, value_name = "req_file", conflicts_with = "package")]
        requirements: Option<PathBuf>,
    },
    /// List all installed packages
    List,
    /// Uninstall a package
    Uninstall {
        /// The package to uninstall
        package: Option<String>,
        /// Don't ask for confirmation of uninstall deletions
        #[arg(short, long)]
        force: bool,
        /// File listing the packages to uninstall, one per line
        #[arg(short, long, value_name = "req_file", conflicts_with = "package")]
        requirements: Option<PathBuf>,
    },
    /// Update a package to the latest version
    Update {
        /// The package to update
        package: Option<String>,
        /// Force the update even if the package is already up to date
        #[arg(short, long)]
        force: bool,
        /// File listing the packages to update, one per line
        #[arg(short, long, value_name = "req_file", conflicts_with = "package")]
        requirements: Option<PathBuf>,
    },
    /// Search for packages matching the given keyword
    Search {
        /// The keyword to search
        keyword: String,
        /// The URL of the package index
        #[arg(short, long, value_name = "url")]
        index: Option<String>,
    },
    /// Show detailed information about a package
    Info { package: String },
    /// Show dependencies for a package
    Dependencies { package: String },
    /// List available versions for a package
    Versions { package: String },
    /// Show the changelog for a package
    Changelog { package: String },
    /// Show the license information for a package
    License { package: String },
    /// Show the documentation link for a package (if available)
    Doc { package: String },
    /// Show the source link for a package (if available)
    Source { package: String },
    /// Show the issues link for a package (if available)
    Issues { package: String },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{err}");
        process::exit(err.code() as i32);
    }
}

fn run(cli: Cli) -> Result<()> {
    let install_root = cli.install_root.as_deref();

    match cli.command {
        Commands::Install {
            package,
            force,
            requirements,
        } => {
            let layout = open_layout(install_root)?;
            let index = HttpIndex::new()?;
            commands::install(
                &layout,
                &index,
                package.as_deref(),
                requirements.as_deref(),
                force,
            )
        }
        Commands::List => {
            let layout = open_layout(install_root)?;
            commands::list_packages(&layout)
        }
        Commands::Uninstall {
            package,
            force,
            requirements,
        } => {
            let layout = open_layout(install_root)?;
            commands::uninstall(
                &layout,
                package.as_deref(),
                requirements.as_deref(),
                force,
                &mut StdinPrompt,
            )
        }
        Commands::Update {
            package,
            force,
            requirements,
        } => {
            let layout = open_layout(install_root)?;
            let index = HttpIndex::new()?;
            commands::update(
                &layout,
                &index,
                package.as_deref(),
                requirements.as_deref(),
                force,
            )
        }
        Commands::Search { keyword, index } => {
            let index = match index {
                Some(url) => HttpIndex::with_url(&url)?,
                None => HttpIndex::new()?,
            };
            commands::search(&index, &keyword)
        }
        Commands::Info { package } => commands::query::info(&HttpIndex::new()?, &package),
        Commands::Dependencies { package } => {
            commands::query::dependencies(&HttpIndex::new()?, &package)
        }
        Commands::Versions { package } => commands::query::versions(&HttpIndex::new()?, &package),
        Commands::Changelog { package } => commands::query::changelog(&HttpIndex::new()?, &package),
        Commands::License { package } => commands::query::license(&HttpIndex::new()?, &package),
        Commands::Doc { package } => commands::query::doc(&HttpIndex::new()?, &package),
        Commands::Source { package } => commands::query::source(&HttpIndex::new()?, &package),
        Commands::Issues { package } => commands::query::issues(&HttpIndex::new()?, &package),
    }
}

fn open_layout(install_root: Option<&Path>) -> Result<Layout> {
    let root = Layout::resolve_install_root(install_root)?;
    Layout::open(&root)
}

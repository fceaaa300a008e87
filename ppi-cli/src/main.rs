//! PPI CLI - Command-line browser for protein-interaction networks
//!
//! Reads a data directory of networks (one sub-directory of GDF files each)
//! and answers browsing questions: which proteins a network contains, which
//! components hold them, and where to draw each node.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use ppi_core::{dictionary, NameMode, NetworkStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::PpiConfig;
use output::{OutputConfig, OutputFormat};

/// Browse protein-interaction networks stored as GDF files.
#[derive(Parser)]
#[command(name = "ppi")]
#[command(author, version)]
#[command(about = "Browse protein-interaction networks stored as GDF files")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  ppi networks                          List networks in the data directory
  ppi proteins yeast --selected ACT1    Proteins sharing a component with ACT1
  ppi by-node 12 -n yeast -f a.gdf      Protein makeup around node 12
  ppi layout -i graph.json --format json")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Single-line JSON output
    #[arg(long, global = true)]
    compact: bool,

    /// Directory holding one sub-directory per network
    #[arg(long, global = true, env = "PPI_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Systematic → gene name dictionary (tab-separated)
    #[arg(long, global = true, env = "PPI_DICTIONARY")]
    dictionary: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List networks with their file counts
    #[command(visible_alias = "ls")]
    Networks,

    /// List the GDF files of a network
    Files {
        /// Network name
        network: String,
    },

    /// Show a graph (full graph as JSON, summary as table)
    Graph {
        #[command(flatten)]
        source: GraphSource,

        /// Protein naming for component statistics
        #[arg(long, default_value = "systematic")]
        names: NameMode,
    },

    /// List unique proteins across a network's files
    #[command(visible_alias = "p")]
    Proteins {
        /// Network name
        network: String,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Page size (defaults to the configured page size)
        #[arg(long)]
        size: Option<usize>,

        /// Keep only these exact proteins (space-separated)
        #[arg(long)]
        q: Option<String>,

        /// Keep proteins sharing a component with all of these (space-separated)
        #[arg(long)]
        selected: Option<String>,

        /// Report systematic identifiers or gene names
        #[arg(long, default_value = "systematic")]
        names: NameMode,
    },

    /// Per file, list components containing all given proteins
    Components {
        /// Network name
        network: String,

        /// Proteins that must all be present
        #[arg(short, long = "protein")]
        proteins: Vec<String>,

        #[arg(long, default_value = "systematic")]
        names: NameMode,
    },

    /// Extract one connected component as a graph
    Subgraph {
        /// Component id (order of first discovery)
        component: usize,

        #[command(flatten)]
        source: GraphSource,

        #[arg(long, default_value = "systematic")]
        names: NameMode,
    },

    /// Protein statistics for the component containing a node
    ByNode {
        /// Node id
        node: String,

        #[command(flatten)]
        source: GraphSource,

        /// Reference graph for cross-component counts (file name within the
        /// network, or a path with --input)
        #[arg(long)]
        reference: Option<PathBuf>,

        #[arg(long, default_value = "systematic")]
        names: NameMode,
    },

    /// Compute node positions
    Layout {
        #[command(flatten)]
        source: GraphSource,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Largest absolute coordinate before spreading
        #[arg(long)]
        scale: Option<f64>,

        /// Force-directed iterations
        #[arg(long)]
        iterations: Option<usize>,

        /// Extra spacing between node footprints
        #[arg(long)]
        padding: Option<f64>,

        /// Maximum overlap-removal passes
        #[arg(long)]
        anti_overlap_iterations: Option<usize>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .ppirc.toml
    let config = PpiConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    if let Commands::Completions { shell } = command {
        return completions::run(shell, &mut Cli::command());
    }

    let data_dir = config.data_dir(cli.data_dir.as_deref());
    let dict_path = config.dictionary_path(cli.dictionary.as_deref(), &data_dir);
    dictionary::init_global(&dict_path);
    tracing::debug!(
        "Data directory {}, {} dictionary entries",
        data_dir.display(),
        dictionary::global().len()
    );

    let output = OutputConfig::for_stdout(format, config.use_color())
        .compact(cli.compact);
    // Config color setting wins over TTY detection
    colored::control::set_override(!output.no_color);

    let ctx = Context {
        config,
        store: NetworkStore::new(data_dir),
        dict: dictionary::global(),
        output,
    };

    match command {
        Commands::Networks => networks::run(&ctx),
        Commands::Files { network } => files::run(&ctx, &network),
        Commands::Graph { source, names } => graph::run(&ctx, &source, names),
        Commands::Proteins {
            network,
            page,
            size,
            q,
            selected,
            names,
        } => proteins::run(
            &ctx,
            &network,
            proteins::ProteinArgs {
                page,
                size,
                q,
                selected,
                names,
            },
        ),
        Commands::Components {
            network,
            proteins,
            names,
        } => components::run(&ctx, &network, proteins, names),
        Commands::Subgraph {
            component,
            source,
            names,
        } => subgraph::run(&ctx, &source, component, names),
        Commands::ByNode {
            node,
            source,
            reference,
            names,
        } => by_node::run(&ctx, &source, &node, reference.as_deref(), names),
        Commands::Layout {
            source,
            seed,
            scale,
            iterations,
            padding,
            anti_overlap_iterations,
        } => layout::run(
            &ctx,
            &source,
            &layout::LayoutOverrides {
                seed,
                scale,
                iterations,
                padding,
                anti_overlap_iterations,
            },
        ),
        Commands::Completions { .. } => Ok(()),
    }
}

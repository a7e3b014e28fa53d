//! # Tricache CLI
//!
//! Command-line interface for the tricache vertex cache optimizer.
//!
//! ## Commands
//! - `optimize` - Reorder a mesh's triangles and report the ACMR change
//! - `acmr` - Evaluate the ACMR of a mesh's current order
//! - `grid` - Write a regular grid mesh for experiments

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tricache_core::format::{load_mesh, save_mesh};
use tricache_core::{
    IndexedMesh, MeshSnapshot, OptimizerConfig, ScoringMode, VertexCacheOptimizer, compare_orders,
    compute_acmr, count_misses,
};

/// Tricache vertex cache optimizer
#[derive(Parser)]
#[command(name = "tricache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optimizer configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Simulated cache size, overrides the configuration file
    #[arg(long, global = true)]
    pub max_cache_size: Option<u32>,

    /// Vertex scoring variant, overrides the configuration file
    #[arg(long, value_enum, global = true)]
    pub scoring: Option<ScoringArg>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Scoring variants selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScoringArg {
    /// Valence boost only
    ValenceOnly,
    /// Cache position plus valence boost
    Combined,
}

impl From<ScoringArg> for ScoringMode {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::ValenceOnly => ScoringMode::ValenceOnly,
            ScoringArg::Combined => ScoringMode::Combined,
        }
    }
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Reorder a mesh for vertex cache reuse
    Optimize {
        /// Input mesh (JSON)
        input: PathBuf,

        /// Output mesh (JSON); only the report is produced when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// FIFO size for the ACMR report (defaults to max cache size - 3)
        #[arg(long)]
        capacity: Option<usize>,
    },

    /// Report the ACMR of a mesh's index order
    Acmr {
        /// Input mesh (JSON)
        input: PathBuf,

        /// FIFO size (defaults to max cache size - 3)
        #[arg(long)]
        capacity: Option<usize>,
    },

    /// Write a regular grid mesh
    Grid {
        /// Quads along X
        #[arg(long, default_value = "9")]
        width: u32,

        /// Quads along Y
        #[arg(long, default_value = "9")]
        height: u32,

        /// Output mesh (JSON)
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let filter = if cli.verbose { "debug" } else { "info" };
    // A logger may already be installed when embedded in another binary.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();

    run(cli)
}

/// Run the command without touching logger setup
pub fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Optimize {
            input,
            output,
            capacity,
        } => {
            let mesh = load(&input)?;
            let optimizer = VertexCacheOptimizer::new(config)?;
            let capacity = capacity.unwrap_or_else(|| optimizer.config().default_evaluation_capacity());

            log::info!("Optimizing {}...", input.display());
            let optimized = optimizer.optimize_detailed(&mesh)?;
            let stats = optimized.stats();
            log::info!("  Verts: {}", stats.vertex_count);
            log::info!("  Triangles: {}", stats.triangle_count);

            let comparison = compare_orders(mesh.indices(), optimized.indices(), capacity);
            log::info!("{}", comparison);

            if let Some(output) = output {
                let result = mesh.with_indices(optimized.into_indices())?;
                save_mesh(&output, &result)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                log::info!("  Output: {}", output.display());
            }
        }

        Commands::Acmr { input, capacity } => {
            let mesh = load(&input)?;
            let capacity = capacity.unwrap_or_else(|| config.default_evaluation_capacity());
            log::info!(
                "ACMR: {:.4} ({} misses, {} triangles, cache {})",
                compute_acmr(mesh.indices(), capacity),
                count_misses(mesh.indices(), capacity),
                mesh.triangle_count(),
                capacity
            );
        }

        Commands::Grid {
            width,
            height,
            output,
        } => {
            let mesh = IndexedMesh::grid(width, height);
            save_mesh(&output, &mesh)
                .with_context(|| format!("failed to write {}", output.display()))?;
            log::info!(
                "Wrote {}x{} grid ({} triangles) to {}",
                width,
                height,
                mesh.triangle_count(),
                output.display()
            );
        }
    }

    Ok(())
}

/// Merge the configuration file and command-line overrides
pub fn resolve_config(cli: &Cli) -> Result<OptimizerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<OptimizerConfig>(&text)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => OptimizerConfig::default(),
    };

    if let Some(size) = cli.max_cache_size {
        config.max_cache_size = size;
    }
    if let Some(scoring) = cli.scoring {
        config.scoring = scoring.into();
    }

    config.validate()?;
    Ok(config)
}

fn load(path: &Path) -> Result<IndexedMesh> {
    load_mesh(path).with_context(|| format!("failed to load {}", path.display()))
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use vivarium_core::PlanOp;
use vivarium_installer::{find_prefix, linked, owning_packages, untracked, PrefixLayout};
use vivarium_store::{default_store_root, ChannelConfig, IndexCache, StoreLayout};

mod core_flows;
mod fetch;
mod render;


#[derive(Parser, Debug)]
#[command(name = "vivarium")]
#[command(about = "Environment manager for explicitly versioned package trees", long_about = None)]
struct Cli {
    #[arg(long)]
    store_root: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Install {
        #[arg(long)]
        prefix: PathBuf,
        #[arg(long)]
        file: Option<PathBuf>,
        specs: Vec<String>,
    },
    Clone {
        source: PathBuf,
        dest: PathBuf,
    },
    Untracked {
        prefix: PathBuf,
    },
    List {
        prefix: PathBuf,
    },
    Which {
        path: PathBuf,
    },
    Doctor,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store_root = match cli.store_root {
        Some(root) => root,
        None => default_store_root()?,
    };
    let store = StoreLayout::new(store_root);

    match cli.command {
        Commands::Install {
            prefix,
            file,
            specs,
        } => {
            let mut lines = Vec::new();
            if let Some(file) = &file {
                lines.extend(core_flows::read_spec_file(file)?);
            }
            lines.extend(specs);

            let layout = PrefixLayout::new(prefix);
            let channels = ChannelConfig::load(&store.channels_path())?;
            let mut index_cache = IndexCache::new();
            let outcome =
                core_flows::explicit_install(&lines, &layout, &store, &channels, &mut index_cache)?;
            for warning in &outcome.warnings {
                render::print_warning(warning);
            }
            for line in render::plan_lines(&outcome.plan) {
                println!("{line}");
            }
        }
        Commands::Clone { source, dest } => {
            let src = PrefixLayout::new(source);
            let dst = PrefixLayout::new(dest);
            let mut index_cache = IndexCache::new();
            let outcome = core_flows::clone_env(&src, &dst, &store, &mut index_cache)?;
            println!("Packages: {}", outcome.plan.scheduled(PlanOp::Link).len());
            println!("Files: {}", outcome.untracked_files.len());
        }
        Commands::Untracked { prefix } => {
            for path in untracked(&PrefixLayout::new(prefix), false)? {
                println!("{path}");
            }
        }
        Commands::List { prefix } => {
            for dist in linked(&PrefixLayout::new(prefix))? {
                println!("{dist}");
            }
        }
        Commands::Which { path } => match find_prefix(&path) {
            None => println!("No environment found for: {}", path.display()),
            Some(prefix) => {
                println!("Prefix: {}", prefix.display());
                for dist in owning_packages(&path)? {
                    println!("{dist}");
                }
            }
        },
        Commands::Doctor => {
            println!("store: {}", store.root().display());
            println!("pkgs: {}", store.pkgs_dir().display());
            println!("channels: {}", store.channels_path().display());
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use chainweave::designer::export::{bom_print_pages, bom_to_csv, save_assembly_map};
use chainweave::designer::{AssemblyMapOptions, BomMode};
use chainweave::settings::{Config, SettingsPersistence};
use chainweave::{init_logging, open_project, BUILD_DATE, VERSION};

#[derive(Parser, Debug)]
#[command(name = "chainweave", version, about = "Chainmail design tools")]
struct Cli {
    /// Settings file (JSON or TOML). Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the bill of materials for a project
    Bom {
        project: PathBuf,
        /// List every palette color, including unused ones
        #[arg(long)]
        full_sheet: bool,
        /// Rings per supplier pack
        #[arg(long)]
        pack_size: Option<usize>,
        /// Emit CSV instead of printable pages
        #[arg(long)]
        csv: bool,
    },
    /// Print every ring as CSV
    Csv { project: PathBuf },
    /// Render the numbered assembly map as PNG tiles
    Map { project: PathBuf, out: PathBuf },
    /// Summarize a project
    Info { project: PathBuf },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let settings = match path {
        Some(path) => SettingsPersistence::load_or_default(path)?,
        None => SettingsPersistence::load_default()?,
    };
    Ok(settings.config().clone())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    let config = load_config(cli.config).context("Failed to load settings")?;

    match cli.command {
        Command::Bom {
            project,
            full_sheet,
            pack_size,
            csv,
        } => {
            let state = open_project(&config, &project)?;
            let mode = if full_sheet || config.bom.full_sheet {
                BomMode::FullSheet
            } else {
                BomMode::UsedOnly
            };
            let pack_size = pack_size.unwrap_or(config.bom.pack_size as usize);
            let bom = state.bom_with(pack_size, mode);
            if csv {
                print!("{}", bom_to_csv(&bom));
            } else {
                for page in bom_print_pages(&bom, config.bom.rows_per_page) {
                    println!("{}", page);
                }
            }
        }
        Command::Csv { project } => {
            let state = open_project(&config, &project)?;
            print!("{}", state.rings_csv());
        }
        Command::Map { project, out } => {
            let state = open_project(&config, &project)?;
            let map = state.assembly_map(&AssemblyMapOptions::default());
            if map.tiles.is_empty() {
                anyhow::bail!("{} has no rings to map", project.display());
            }
            for path in save_assembly_map(&map, &out)? {
                println!("{}", path.display());
            }
        }
        Command::Info { project } => {
            let state = open_project(&config, &project)?;
            let bom = state.bom();
            println!("Design:      {}", state.design_name());
            println!("Rings:       {}", state.rings().len());
            let geometry = state.geometry();
            println!(
                "Ring size:   {} mm ID, {} mm wire, {} mm OD (AR {:.2})",
                geometry.inner_diameter,
                geometry.wire_diameter,
                geometry.outer_diameter(),
                geometry.aspect_ratio()
            );
            match state.rings().span() {
                Some(span) => println!(
                    "Extent:      {} rows x {} cols (rows {}..{}, cols {}..{})",
                    span.rows(),
                    span.cols(),
                    span.min_row,
                    span.max_row,
                    span.min_col,
                    span.max_col
                ),
                None => println!("Extent:      empty"),
            }
            println!("Components:  {}", state.components().len());
            println!("Palette:     {}", state.palette().name());
            println!("Colors used: {}", bom.used_lines().count());
            println!("Packs:       {} ({} rings each)", bom.total_packs, bom.pack_size);
            println!("Version:     {} ({})", VERSION, BUILD_DATE);
        }
    }
    Ok(())
}

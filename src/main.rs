//! Cryptgen - Entry Point
//!
//! Generates a dungeon and prints it as a character grid.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cryptgen::{Dungeon, DungeonConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// RON file with generation parameters; defaults are used when it cannot be read
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<i32>,
    #[arg(long)]
    height: Option<i32>,
    /// Target open-ground fraction in [0, 1]
    #[arg(short, long)]
    density: Option<f64>,
    /// Random seed; a fresh one is drawn when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// Print generation statistics after the grid
    #[arg(long)]
    summary: bool,
    /// Print the effective config as RON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DungeonConfig::load_or_default(path),
        None => DungeonConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(density) = cli.density {
        config.density = density;
    }

    if cli.dump_config {
        config.validate()?;
        println!("{}", config.to_ron_pretty()?);
        return Ok(());
    }

    let seed = match cli.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random();
            eprintln!("seed: {}", seed);
            seed
        }
    };
    log::info!("Generating with seed {}", seed);

    let dungeon = Dungeon::new(config, seed).context("dungeon generation failed")?;
    print!("{}", dungeon);

    if cli.summary {
        let report = dungeon.report();
        println!();
        println!("seed:      {}", dungeon.seed());
        println!("size:      {}x{}", dungeon.width(), dungeon.height());
        println!("rooms:     {}", dungeon.rooms().len());
        println!("doors:     {}", dungeon.doors().len());
        println!("corridors: {}", report.corridors);
        println!("repairs:   {}", report.repair_tunnels());
        println!("entrance:  ({}, {})", dungeon.entrance().x, dungeon.entrance().y);
        println!("exit:      ({}, {})", dungeon.exit().x, dungeon.exit().y);
        println!(
            "density:   {:.3} rooms, {:.3} final (target {:.3})",
            report.room_density,
            report.final_density,
            dungeon.config().density
        );
        println!("attempt:   {}", report.attempt);
        for issue in &report.issues {
            println!("note:      {}", issue);
        }
    }

    Ok(())
}

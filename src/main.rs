//! coffee-transform - compile CoffeeScript assets with the project's compiler.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use coffee_transform::{
    cli::{Cli, Commands, compile::compile, locate::run_locate},
    config::ProjectConfig,
    logger,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let config = ProjectConfig::load(&cwd, cli.config.as_deref())?;

    match &cli.command {
        Commands::Compile { args } => compile(args, &config).map(|_| ()),
        Commands::Locate => run_locate(&config).map(|_| ()),
    }
}

//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Compile CoffeeScript assets through the project's `coffee` compiler
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: coffee.toml, searched upward)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile CoffeeScript sources to JavaScript
    #[command(visible_alias = "c")]
    Compile {
        #[command(flatten)]
        args: CompileArgs,
    },

    /// Show which compiler binary would be used
    #[command(visible_alias = "l")]
    Locate,
}

/// Compile command arguments.
///
/// Flags are combined with the `[coffee]` config section; a flag given here
/// always enables the option.
#[derive(clap::Args, Debug, Clone)]
pub struct CompileArgs {
    /// CoffeeScript sources to compile
    #[arg(required = true, value_name = "INPUT", value_hint = clap::ValueHint::FilePath)]
    pub inputs: Vec<PathBuf>,

    /// Custom output path of the JS file (single input only)
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// Include the source map directly in the compiled JavaScript
    #[arg(long)]
    pub inline_map: bool,

    /// Compile without the top-level function safety wrapper
    #[arg(short, long)]
    pub bare: bool,

    /// Suppress the "Generated by CoffeeScript" header
    #[arg(long)]
    pub no_header: bool,

    /// Output directory (default: the working directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub dest: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compile() {
        let cli = Cli::parse_from([
            "coffee-transform",
            "compile",
            "--bare",
            "--no-header",
            "-d",
            "public",
            "app.coffee",
            "lib/util.litcoffee",
        ]);

        let Commands::Compile { args } = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(args.inputs.len(), 2);
        assert!(args.bare && args.no_header && !args.inline_map);
        assert_eq!(args.dest, Some(PathBuf::from("public")));
    }

    #[test]
    fn test_compile_requires_input() {
        assert!(Cli::try_parse_from(["coffee-transform", "compile"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["coffee-transform", "locate", "-v", "-C", "site/coffee.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site/coffee.toml")));
        assert!(matches!(cli.command, Commands::Locate));
    }
}

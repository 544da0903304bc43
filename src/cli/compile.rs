//! `compile` command.
//!
//! Sources are compiled in parallel against one shared build specification.
//! When the compiler is not installed, a source whose output already exists
//! in the destination is skipped so prebuilt assets keep working.

use super::CompileArgs;
use crate::{
    coffee::{CoffeeClient, CoffeeOptions},
    config::ProjectConfig,
    log,
    pipeline::Resource,
    utils::plural_count,
};
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

/// Result of compiling one source.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Written to this path.
    Compiled(PathBuf),
    /// Compiler unavailable; this prebuilt file was kept.
    Skipped(PathBuf),
}

/// Compile every input, returning the outcome per input in order.
pub fn compile(args: &CompileArgs, config: &ProjectConfig) -> Result<Vec<Outcome>> {
    let options = merge_options(
        config
            .coffee_options()
            .context("Failed to read compiler options")?,
        args,
    );
    check_output_path(&options.output_path, args.inputs.len())?;

    let spec = Arc::new(config.build_spec());
    let working_dir = spec.working_dir().to_path_buf();
    let dest = match &args.dest {
        Some(dir) => std::path::absolute(dir).context("Failed to resolve output directory")?,
        None => working_dir.clone(),
    };
    let client = CoffeeClient::new(spec);

    let results: Vec<Result<Outcome>> = args
        .inputs
        .par_iter()
        .map(|input| compile_one(&client, &working_dir, &dest, input, &options))
        .collect();

    let mut outcomes = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (input, result) in args.inputs.iter().zip(results) {
        match result {
            Ok(outcome) => {
                match &outcome {
                    Outcome::Compiled(path) => {
                        log!("compile"; "{} -> {}", input.display(), path.display())
                    }
                    Outcome::Skipped(path) => {
                        log!("skip"; "coffee not available, keeping {}", path.display())
                    }
                }
                outcomes.push(outcome);
            }
            Err(err) => {
                failed += 1;
                log!("error"; "{:#}", err);
            }
        }
    }

    if failed > 0 {
        bail!(
            "{} of {} failed",
            failed,
            plural_count(args.inputs.len(), "source")
        );
    }
    Ok(outcomes)
}

/// Combine config options with command-line flags.
fn merge_options(mut options: CoffeeOptions, args: &CompileArgs) -> CoffeeOptions {
    if let Some(path) = &args.output_path {
        options.output_path = path.clone();
    }
    options.inline_map |= args.inline_map;
    options.bare |= args.bare;
    options.no_header |= args.no_header;
    options
}

/// An output path names one file inside the destination.
fn check_output_path(output_path: &str, inputs: usize) -> Result<()> {
    if output_path.is_empty() {
        return Ok(());
    }
    if inputs > 1 {
        bail!("Output path `{output_path}` can only be used with a single input");
    }
    let inside = Path::new(output_path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !inside {
        bail!("Output path `{output_path}` must be relative to the output directory");
    }
    Ok(())
}

fn compile_one(
    client: &CoffeeClient,
    working_dir: &Path,
    dest: &Path,
    input: &Path,
    options: &CoffeeOptions,
) -> Result<Outcome> {
    let (root, rel) = split_input(working_dir, input)?;
    let resource = Resource::from_file(&root, &rel)?;

    match client.process(&resource, options.clone()) {
        Ok(compiled) => Ok(Outcome::Compiled(compiled.write_to(dest)?)),
        Err(err) if err.is_feature_not_available() => {
            let prebuilt = dest.join(target_path(&rel, options));
            if prebuilt.is_file() {
                Ok(Outcome::Skipped(prebuilt))
            } else {
                Err(err).with_context(|| {
                    format!("Cannot compile `{}` and no prebuilt output exists", rel.display())
                })
            }
        }
        Err(err) => Err(err).with_context(|| format!("Failed to compile `{}`", rel.display())),
    }
}

/// Split an input into a root and a path relative to it.
///
/// Inputs inside the working directory keep their relative layout; anything
/// else is placed at the top of the destination.
fn split_input(working_dir: &Path, input: &Path) -> Result<(PathBuf, PathBuf)> {
    let input = std::path::absolute(input)
        .with_context(|| format!("Failed to resolve `{}`", input.display()))?;

    if let Ok(rel) = input.strip_prefix(working_dir) {
        return Ok((working_dir.to_path_buf(), rel.to_path_buf()));
    }

    match (input.parent(), input.file_name()) {
        (Some(parent), Some(name)) => Ok((parent.to_path_buf(), PathBuf::from(name))),
        _ => bail!("`{}` is not a file", input.display()),
    }
}

/// Path the compiled output of `rel` is written to.
fn target_path(rel: &Path, options: &CoffeeOptions) -> PathBuf {
    if options.output_path.is_empty() {
        rel.with_extension("js")
    } else {
        PathBuf::from(&options.output_path)
    }
}

use crate::cli_args::SharedOpts;
use crate::options::{self, CommandKind, ResolvedOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use sandworm_core::{format_size, Processor, ProcessorOptions};
use std::path::PathBuf;

pub fn handle_generate_command(
    directory: Option<PathBuf>,
    shared: &SharedOpts,
    quiet: bool,
) -> Result<()> {
    let directory = directory.unwrap_or_else(|| PathBuf::from("."));
    let store = sandworm_core::ConfigStore::new(&directory)?;
    let opts = options::resolve(Some(directory), shared, &store, CommandKind::Generate);

    if !quiet {
        println!("Generating '{}'...", opts.output_file.display());
    }
    let size = run_generate(&opts)?;
    if !quiet {
        println!(
            "{} '{}' ({})",
            "Generated".green(),
            opts.output_file.display(),
            format_size(size)
        );
    }
    Ok(())
}

/// Runs the processor for an already-resolved option set and returns the
/// size of the written output in bytes.
pub fn run_generate(opts: &ResolvedOptions) -> Result<u64> {
    let processor = Processor::new(
        &opts.directory,
        &opts.output_file,
        opts.ignore_file.as_deref(),
        ProcessorOptions {
            show_line_numbers: opts.show_line_numbers,
            follow_symlinks: opts.follow_symlinks,
        },
    )
    .context("Unable to create processor")?;
    processor.process().context("Unable to process files")
}

use crate::claude::SyncClient;
use crate::cli_args::SharedOpts;
use crate::commands::setup::setup_client;
use crate::options::{self, CommandKind};
use anyhow::{Context, Result};
use colored::Colorize;
use sandworm_core::{format_size, ConfigStore};
use std::fs;
use std::path::PathBuf;

/// Remote name the concatenated document is uploaded under, regardless of
/// the local output file name.
const REMOTE_FILE_NAME: &str = "project.txt";

pub fn handle_push_command(
    directory: Option<PathBuf>,
    shared: &SharedOpts,
    quiet: bool,
) -> Result<()> {
    let directory = directory.unwrap_or_else(|| PathBuf::from("."));
    let store = ConfigStore::new(&directory)?;
    let opts = options::resolve(Some(directory), shared, &store, CommandKind::Push);

    let mut client = setup_client(store, false)?;

    if !quiet {
        println!("Generating project file...");
    }
    let size = super::generate::run_generate(&opts)?;

    let upload = client.upload(&opts.output_file, REMOTE_FILE_NAME);

    // The timestamped file is a transport artifact; clean it up even when
    // the upload failed, unless the user asked to keep it.
    if !opts.keep_file {
        if let Err(err) = fs::remove_file(&opts.output_file) {
            log::warn!(
                "Could not remove '{}': {}",
                opts.output_file.display(),
                err
            );
        }
    }
    upload.context("Unable to push project file")?;

    if !quiet {
        println!("{} project file ({})", "Updated".green(), format_size(size));
    }
    Ok(())
}

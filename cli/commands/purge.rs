use crate::commands::setup::setup_client;
use anyhow::Result;
use colored::Colorize;
use sandworm_core::ConfigStore;
use std::path::Path;

pub fn handle_purge_command(quiet: bool) -> Result<()> {
    let store = ConfigStore::new(Path::new("."))?;
    let mut client = setup_client(store, false)?;

    let removed = client.purge_project_files(|file_name, current, total| {
        if !quiet {
            println!("{}/{}: Deleting '{}'...", current, total, file_name);
        }
    })?;

    if !quiet {
        if removed == 0 {
            println!("No files to delete.");
        } else {
            println!("{} Removed {} file(s)", "Done!".green(), removed);
        }
    }
    Ok(())
}

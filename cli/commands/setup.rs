use crate::claude::ClaudeClient;
use anyhow::{bail, Result};
use sandworm_core::ConfigStore;
use std::path::Path;

pub fn handle_setup_command() -> Result<()> {
    let store = ConfigStore::new(Path::new("."))?;
    setup_client(store, true)?;
    println!("\nSetup complete! Run 'sandworm push' to generate and push your project file.");
    Ok(())
}

/// Builds a client and runs interactive setup for any missing credentials.
/// With `force` every value is prompted for again.
pub fn setup_client(store: ConfigStore, force: bool) -> Result<ClaudeClient> {
    let mut client = ClaudeClient::new(store)?;
    if !client.setup(force)? {
        bail!("Setup did not complete");
    }
    Ok(client)
}

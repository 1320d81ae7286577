//! Serve command implementation.
//!
//! Reads one JSON request per line from stdin and answers on stdout. Logs
//! and human-facing messages go to stderr so they never mix with responses.

use std::io;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use localfile_lib::provider::ProviderConfig;
use localfile_lib::provider::server::ProviderServer;

use crate::output::print_diagnostics;

pub fn cmd_serve(base_dir: Option<&Path>) -> Result<()> {
  let provider = super::provider();
  let mut server = ProviderServer::new(provider.clone());

  if let Some(dir) = base_dir {
    let config = ProviderConfig::with_base_dir(dir.to_string_lossy());
    match provider.configure(&config) {
      Ok(store) => server = server.with_store(store),
      Err(diags) => {
        print_diagnostics(&diags);
        bail!("provider configuration failed");
      }
    }
  }

  info!(version = %provider.version(), configured = server.store().is_some(), "serving provider");

  let stdin = io::stdin();
  let stdout = io::stdout();
  server
    .serve(stdin.lock(), stdout.lock())
    .context("Failed to serve provider protocol")?;
  Ok(())
}

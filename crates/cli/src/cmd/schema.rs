//! Schema command: prints every schema the provider declares.

use anyhow::Result;
use localfile_lib::provider::server::ProviderServer;

use crate::output::print_json;

pub fn cmd_schema() -> Result<()> {
  let server = ProviderServer::new(super::provider());
  print_json(&server.schema())
}

mod schema;
mod serve;

pub use schema::cmd_schema;
pub use serve::cmd_serve;

use localfile_lib::provider::LocalfileProvider;

pub(crate) fn provider() -> LocalfileProvider {
  LocalfileProvider::new(env!("CARGO_PKG_VERSION"))
}

//! CLI command handlers, one file per subcommand.

mod destination;
mod fetch;
mod upload;
mod upload_folder;

pub use fetch::run_fetch;
pub use upload::run_upload;
pub use upload_folder::run_upload_folder;

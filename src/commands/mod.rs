// ABOUTME: Command module aggregator for the springship CLI.
// ABOUTME: Re-exports deploy and endpoints command handlers.

mod deploy;
mod endpoints;
mod target;

pub use deploy::deploy;
pub use endpoints::endpoints;

// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "springship")]
#[command(about = "Deploy Spring jar packages to managed Spring app hosts")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Environment whose properties are read and recorded
    #[arg(
        short,
        long,
        global = true,
        env = "SPRINGSHIP_ENV",
        default_value = "default"
    )]
    pub environment: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new springship.yml configuration file
    Init {
        /// Project name
        #[arg(long)]
        name: Option<String>,

        /// Name of the first service
        #[arg(long)]
        service: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy packaged services
    Deploy {
        /// Deploy only this service
        service: Option<String>,
    },

    /// List the public URLs of deployed services
    Endpoints {
        /// Show only this service
        service: Option<String>,
    },
}

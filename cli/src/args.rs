use crate::{
    commands::{
        config::ConfigArgs, create::CreateArgs, delete::DeleteArgs, get::GetArgs,
        update::UpdateArgs, wait::WaitArgs,
    },
    printer::OutputFormat,
};
use std::path::PathBuf;
use structopt::StructOpt;
use url::Url;

/// bigml is the command line interface to the BigML machine learning platform.
#[derive(Debug, StructOpt)]
#[structopt(
    global_settings = &[
        structopt::clap::AppSettings::ColoredHelp,
        structopt::clap::AppSettings::InferSubcommands,
    ]
)]
pub struct Args {
    #[structopt(long = "config-file", parse(from_os_str))]
    /// Path to the configuration file. Typically defaults to ~/.config/bigml on Linux.
    pub config: Option<PathBuf>,

    #[structopt(short = "c", long = "context")]
    /// Specify what context to use. Overrides the current context, if any.
    pub context: Option<String>,

    #[structopt(short = "v", long = "verbose")]
    /// Enable more verbose logging.
    pub verbose: bool,

    #[structopt(long = "endpoint", parse(try_from_str))]
    /// Specify what endpoint to use. Overrides the one from the current
    /// context, if any.
    pub endpoint: Option<Url>,

    #[structopt(long = "api-version")]
    /// Specify what API version path to use, e.g. `andromeda`.
    pub api_version: Option<String>,

    #[structopt(short = "k", long = "accept-invalid-certificates", parse(try_from_str))]
    pub accept_invalid_certificates: Option<bool>,

    #[structopt(long = "proxy")]
    /// URL for an HTTP proxy that will be used for all requests.
    pub proxy: Option<Url>,

    #[structopt(long = "username")]
    /// Specify what BigML username to use. Overrides the current context
    /// and `BIGML_USERNAME`.
    pub username: Option<String>,

    #[structopt(long = "api-key")]
    /// Specify what API key to use. Overrides the current context and
    /// `BIGML_API_KEY`.
    pub api_key: Option<String>,

    #[structopt(short = "o", long = "output", default_value = "table")]
    /// Output format. One of: json, table
    pub output: OutputFormat,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(name = "config")]
    /// Manage BigML credentials and endpoint contexts
    Config {
        #[structopt(subcommand)]
        config_args: ConfigArgs,
    },

    #[structopt(name = "create")]
    /// Create new resources
    Create {
        #[structopt(subcommand)]
        create_args: CreateArgs,
    },

    #[structopt(name = "delete")]
    /// Delete resources
    Delete {
        #[structopt(flatten)]
        delete_args: DeleteArgs,
    },

    #[structopt(name = "get")]
    /// Display resources, their fields and their status
    Get {
        #[structopt(subcommand)]
        get_args: GetArgs,
    },

    #[structopt(name = "update")]
    /// Update an existing resource
    Update {
        #[structopt(flatten)]
        update_args: UpdateArgs,
    },

    #[structopt(name = "wait")]
    /// Block until a resource is finished or faulty
    Wait {
        #[structopt(flatten)]
        wait_args: WaitArgs,
    },
}

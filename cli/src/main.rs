#![deny(clippy::all)]
mod args;
mod commands;
mod config;
mod printer;
mod utils;

use anyhow::{anyhow, Context, Result};
use bigml_client::{Client, Config as ClientConfig, DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
use log::{error, warn};
use std::{fs, path::PathBuf, process};
use structopt::StructOpt;

use crate::{
    args::{Args, Command},
    commands::{config as config_command, create, delete, get, update, wait},
    config::BigmlConfig,
    printer::Printer,
    utils::complete_credentials,
};

fn run(args: Args) -> Result<()> {
    let config_path = find_configuration(&args)?;
    let cli_config = config::read_bigml_config(&config_path)?;
    let printer = Printer::new(args.output);

    match &args.command {
        Command::Config { config_args } => {
            config_command::run(config_args, cli_config, config_path).map(|_| ())
        }
        Command::Create { create_args } => create::run(
            create_args,
            &client_from_args(&args, &cli_config)?,
            &printer,
        ),
        Command::Delete { delete_args } => {
            delete::run(delete_args, &client_from_args(&args, &cli_config)?)
        }
        Command::Get { get_args } => get::run(
            get_args,
            &client_from_args(&args, &cli_config)?,
            &printer,
        ),
        Command::Update { update_args } => update::run(
            update_args,
            &client_from_args(&args, &cli_config)?,
            &printer,
        ),
        Command::Wait { wait_args } => wait::run(
            wait_args,
            &client_from_args(&args, &cli_config)?,
            &printer,
        ),
    }
}

fn client_from_args(args: &Args, config: &BigmlConfig) -> Result<Client> {
    let current_context = if let Some(context_name) = args.context.as_ref() {
        let context = config.get_context(context_name);
        if context.is_none() {
            return Err(anyhow!("Unknown context `{}`.", context_name));
        };
        context
    } else {
        config.get_current_context()
    };

    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| current_context.map(|context| context.endpoint.clone()))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.clone());

    let api_version = args
        .api_version
        .clone()
        .or_else(|| current_context.map(|context| context.api_version.clone()))
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_owned());

    let credentials = complete_credentials(
        args.username
            .clone()
            .or_else(|| current_context.map(|context| context.username.clone())),
        args.api_key
            .clone()
            .or_else(|| current_context.and_then(|context| context.api_key.clone())),
    )?;

    let accept_invalid_certificates = args
        .accept_invalid_certificates
        .or_else(|| current_context.map(|context| context.accept_invalid_certificates))
        .unwrap_or(false);

    if accept_invalid_certificates {
        warn!(concat!(
            "TLS certificate verification is disabled. ",
            "Do NOT use this over an insecure network."
        ));
    }

    let proxy = args
        .proxy
        .clone()
        .or_else(|| current_context.and_then(|context| context.proxy.clone()));

    Client::new(ClientConfig {
        endpoint,
        api_version,
        credentials,
        accept_invalid_certificates,
        proxy,
        ..Default::default()
    })
    .context("Failed to initialise the BigML client.")
}

fn find_configuration(args: &Args) -> Result<PathBuf> {
    let config_path = if let Some(config_path) = args.config.clone() {
        if !config_path.exists() {
            warn!(
                "Configuration file `{}` doesn't exist.",
                config_path.display()
            );
        }
        config_path
    } else {
        let mut config_path =
            dirs::config_dir().context("Could not get path to the user's config directory")?;
        config_path.push("bigml");
        fs::create_dir_all(&config_path).with_context(|| {
            format!(
                "Could not create config directory {}",
                config_path.display()
            )
        })?;
        config_path.push("contexts.json");
        config_path
    };
    Ok(config_path)
}

fn main() {
    let args = Args::from_args();
    utils::init_env_logger(args.verbose);

    if let Err(error) = run(args) {
        error!("An error occurred:");
        for cause in error.chain() {
            error!(" |- {cause}");
        }

        #[cfg(feature = "backtrace")]
        {
            error!("{}", error.backtrace());
        }

        process::exit(1);
    }
}

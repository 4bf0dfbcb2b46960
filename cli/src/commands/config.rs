use anyhow::Result;
use bigml_client::{DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
use colored::Colorize;
use log::{error, info, warn};
use prettytable::{cell, row};
use std::path::Path;
use structopt::StructOpt;
use url::Url;

use crate::{
    config::{self, BigmlConfig, ContextConfig},
    printer::new_table,
    utils,
};

#[derive(Debug, StructOpt)]
pub enum ConfigArgs {
    #[structopt(name = "add")]
    /// Add a new context to the bigml config file
    AddContext {
        #[structopt(long = "name", short = "n")]
        /// The name of the context that will be created or updated
        name: Option<String>,

        #[structopt(long = "endpoint", short = "e")]
        /// The BigML endpoint that will be used for this context
        endpoint: Option<Url>,

        #[structopt(long = "api-version")]
        /// The API version path that will be used for this context
        api_version: Option<String>,

        #[structopt(long = "username", short = "u")]
        /// The BigML username that will be used for this context
        username: Option<String>,

        #[structopt(long = "api-key", short = "t")]
        /// The BigML API key that will be used for this context
        api_key: Option<String>,

        #[structopt(long = "accept-invalid-certificates", short = "k")]
        /// Whether to accept invalid TLS certificates
        accept_invalid_certificates: bool,

        #[structopt(long = "proxy")]
        /// URL for an HTTP proxy that will be used for all requests if specified
        proxy: Option<Option<Url>>,
    },

    #[structopt(name = "current")]
    /// Display the current context
    CurrentContext,

    #[structopt(name = "delete")]
    /// Delete the specified context from the bigml config file
    DeleteContext {
        /// The name(s) of the context(s) which will be deleted
        names: Vec<String>,
    },

    #[structopt(name = "ls")]
    /// List available contexts in a bigml config file
    ListContexts {
        #[structopt(long = "api-keys")]
        /// Show API keys (by default keys are hidden).
        api_keys: bool,
    },

    #[structopt(name = "use")]
    /// Set the current context in the bigml config file
    UseContext {
        /// The name of the context.
        name: String,
    },
}

pub fn run(
    args: &ConfigArgs,
    mut config: BigmlConfig,
    config_path: impl AsRef<Path>,
) -> Result<BigmlConfig> {
    match args {
        ConfigArgs::ListContexts { api_keys } if config.num_contexts() > 0 => {
            let mut contexts = config.get_all_contexts().clone();
            contexts.sort_unstable_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
            let mut table = new_table();
            table.set_titles(
                row![bFg => "Active", "Context", "Endpoint", "Version", "Username", "API Key", "Insecure", "Proxy"],
            );
            for context in contexts.iter() {
                let active = config
                    .get_current_context()
                    .map_or(false, |current_context| {
                        current_context.name == context.name
                    });
                table.add_row(row![
                    if active { "    ->" } else { "" },
                    if active {
                        context.name.bold().bright_white()
                    } else {
                        context.name.normal()
                    },
                    context.endpoint,
                    context.api_version,
                    context.username,
                    if *api_keys {
                        context.api_key.clone().unwrap_or_default()
                    } else {
                        "<Hidden>".into()
                    },
                    if context.accept_invalid_certificates {
                        "Yes"
                    } else {
                        "No"
                    },
                    context
                        .proxy
                        .as_ref()
                        .map(Url::to_string)
                        .unwrap_or_default()
                ]);
            }
            table.printstd();
        }
        ConfigArgs::ListContexts { .. } => {
            info!("No available contexts.");
        }
        ConfigArgs::AddContext {
            name,
            endpoint,
            api_version,
            username,
            api_key,
            accept_invalid_certificates,
            proxy,
        } => {
            add_or_edit_context(
                NewContextArgs {
                    name,
                    endpoint,
                    api_version,
                    username,
                    api_key,
                    accept_invalid_certificates: *accept_invalid_certificates,
                    proxy,
                },
                config.clone(),
                config_path,
            )?;
        }
        ConfigArgs::UseContext { name } => {
            if !config.set_current_context(name) {
                error!(
                    "No such context `{}` exists in `{}`.",
                    name,
                    config_path.as_ref().display()
                );
            } else {
                config::write_bigml_config(config_path, &config)?;
                info!("Switched to context `{}`.", name);
            }
        }
        ConfigArgs::CurrentContext => config.get_current_context().map_or_else(
            || info!("There is no default context in use."),
            |current_context| println!("{}", current_context.name),
        ),
        ConfigArgs::DeleteContext { names } => {
            for name in names {
                if config.delete_context(name) {
                    config::write_bigml_config(&config_path, &config)?;
                    info!(
                        "Deleted context `{}` from `{}`.",
                        name,
                        config_path.as_ref().display()
                    );
                } else {
                    error!(
                        "No such context `{}` exists in `{}`.",
                        name,
                        config_path.as_ref().display()
                    );
                }
            }
        }
    }
    Ok(config)
}

struct NewContextArgs<'a> {
    name: &'a Option<String>,
    endpoint: &'a Option<Url>,
    api_version: &'a Option<String>,
    username: &'a Option<String>,
    api_key: &'a Option<String>,
    accept_invalid_certificates: bool,
    proxy: &'a Option<Option<Url>>,
}

fn add_or_edit_context(
    args: NewContextArgs<'_>,
    mut config: BigmlConfig,
    config_path: impl AsRef<Path>,
) -> Result<()> {
    let name = loop {
        let name = match args.name {
            None => utils::read_from_stdin("Context name", None)?,
            Some(name) => name.clone(),
        };
        if !name.is_empty() {
            break name;
        } else {
            error!("Context name cannot be empty.");
        }
    };

    let existing_context = config.get_context(&name);
    if existing_context.is_some() {
        info!("Context `{}` already exists, it will be modified.", name);
    } else {
        info!("A new context `{}` will be created.", name);
    }

    let username = loop {
        let username = match args.username {
            None => utils::read_from_stdin(
                "Username",
                existing_context.map(|context| context.username.as_str()),
            )?,
            Some(username) => username.clone(),
        };
        if !username.is_empty() {
            break username;
        } else {
            error!("Username cannot be empty.");
        }
    };

    let api_key = match args.api_key {
        None => utils::read_optional_from_stdin("API key")?,
        api_key => api_key.clone(),
    };
    if api_key.is_none() {
        info!(concat!(
            "No API key was associated with the context. ",
            "You will have to enter it for every request."
        ));
    } else {
        warn!(
            "Be careful, API keys are stored in cleartext in {}.",
            config_path.as_ref().display()
        );
    }

    let endpoint = match args.endpoint {
        None => loop {
            match Url::parse(&utils::read_from_stdin(
                "Endpoint",
                Some(
                    existing_context
                        .map(|context| context.endpoint.as_str())
                        .unwrap_or_else(|| DEFAULT_ENDPOINT.as_str()),
                ),
            )?) {
                Ok(url) => break url,
                Err(error) => {
                    error!("Invalid endpoint URL: {}", error);
                }
            }
        },
        Some(endpoint) => endpoint.clone(),
    };

    let api_version = args.api_version.clone().unwrap_or_else(|| {
        existing_context
            .map(|context| context.api_version.clone())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_owned())
    });

    let context = ContextConfig {
        name: name.clone(),
        endpoint,
        api_version,
        username,
        api_key,
        accept_invalid_certificates: args.accept_invalid_certificates,
        proxy: args
            .proxy
            .clone()
            .unwrap_or_else(|| existing_context.and_then(|context| context.proxy.clone())),
    };

    let update_existing = existing_context.is_some();
    let is_new_context = !config.set_context(context);
    if is_new_context && config.num_contexts() == 1 {
        info!("Default context set to `{}`.", name);
        config.set_current_context(&name);
    }

    config::write_bigml_config(config_path, &config)?;

    if update_existing {
        info!("Context `{}` was updated.", name);
    } else {
        info!("New context `{}` was created.", name);
    }

    Ok(())
}

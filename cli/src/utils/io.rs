use anyhow::{bail, Context, Result};
use bigml_client::Credentials;
use colored::{ColoredString, Colorize};
use env_logger::{fmt::Formatter as LogFormatter, Builder as LogBuilder};
use log::{Level as LogLevel, LevelFilter as LogLevelFilter, Record as LogRecord};
use once_cell::sync::Lazy;
use std::{
    env,
    io::{self, Write},
    ops::Deref,
};

pub fn init_env_logger(verbose: bool) {
    let format = |formatter: &mut LogFormatter, record: &LogRecord<'_>| {
        let level = match record.level() {
            LogLevel::Debug => LOG_PREFIX_DEBUG.deref(),
            LogLevel::Info => LOG_PREFIX_INFO.deref(),
            LogLevel::Warn => LOG_PREFIX_WARN.deref(),
            LogLevel::Error => LOG_PREFIX_ERROR.deref(),
            LogLevel::Trace => LOG_PREFIX_TRACE.deref(),
        };
        writeln!(formatter, "{} {}", level, record.args())
    };

    let mut builder = LogBuilder::new();
    builder.format(format).filter(
        None,
        if verbose {
            LogLevelFilter::Debug
        } else {
            LogLevelFilter::Info
        },
    );

    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.init();
}

pub fn read_from_stdin(message: &str, default: Option<&str>) -> Result<String> {
    let mut input = String::new();
    write!(
        io::stderr(),
        "{} {}{}: ",
        LOG_PREFIX_INPUT.deref(),
        message,
        if let Some(value) = default {
            format!(" [{value}]")
        } else {
            "".into()
        },
    )
    .and_then(|_| io::stderr().flush())
    .and_then(|_| io::stdin().read_line(&mut input))
    .context("Failed to read from stdin.")?;
    input = input.trim().into();
    Ok(match (input.is_empty(), default) {
        (true, Some(default)) => default.into(),
        _ => input,
    })
}

/// Prompt for a value the user may leave empty.
pub fn read_optional_from_stdin(message: &str) -> Result<Option<String>> {
    let input = read_from_stdin(&format!("{message} [none]"), None)?;
    Ok(Some(input).filter(|input| !input.is_empty()))
}

/// Fill in missing credentials from `BIGML_USERNAME`/`BIGML_API_KEY` when both are set, and
/// prompt for anything still missing.
pub fn complete_credentials(
    username: Option<String>,
    api_key: Option<String>,
) -> Result<Credentials> {
    let from_env = Credentials::from_env();
    let (username, api_key) = match (username, api_key, from_env) {
        (Some(username), Some(api_key), _) => (username, api_key),
        (username, api_key, Some(from_env)) => (
            username.unwrap_or(from_env.username),
            api_key.unwrap_or(from_env.api_key),
        ),
        (username, api_key, None) => (
            match username {
                Some(username) => username,
                None => read_from_stdin("Username", None)?,
            },
            match api_key {
                Some(api_key) => api_key,
                None => read_optional_from_stdin("API key")?.unwrap_or_default(),
            },
        ),
    };

    if username.is_empty() {
        bail!("A BigML username is required.");
    }
    Ok(Credentials { username, api_key })
}

pub static LOG_PREFIX_DEBUG: Lazy<ColoredString> = Lazy::new(|| "D".normal());
pub static LOG_PREFIX_INFO: Lazy<ColoredString> = Lazy::new(|| "I".green());
pub static LOG_PREFIX_WARN: Lazy<ColoredString> = Lazy::new(|| "W".yellow().bold());
pub static LOG_PREFIX_ERROR: Lazy<ColoredString> = Lazy::new(|| "E".red().bold());
pub static LOG_PREFIX_TRACE: Lazy<ColoredString> = Lazy::new(|| "T".normal());
pub static LOG_PREFIX_INPUT: Lazy<ColoredString> = Lazy::new(|| "*".blue().bold());

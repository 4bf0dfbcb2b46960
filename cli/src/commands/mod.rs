pub mod config;
pub mod create;
pub mod delete;
pub mod get;
pub mod update;
pub mod wait;

use std::time::Duration;

/// Seconds given on the command line; zero disables waiting.
pub fn seconds(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

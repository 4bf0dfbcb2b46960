use once_cell::sync::Lazy;
use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Command,
};
use uuid::Uuid;

pub const USERNAME: &str = "alfred";
pub const API_KEY: &str = "79138a622755a2383660347f895444b1eb927730";

pub struct TestCli {
    cli_path: PathBuf,
    config_path: PathBuf,
}

static TEST_CLI: Lazy<TestCli> = Lazy::new(|| {
    let cli_path = env::current_exe()
        .ok()
        .and_then(|path| Some(path.parent()?.parent()?.join("bigml")))
        .expect("Could not resolve CLI executable from test executable");

    TestCli {
        cli_path,
        config_path: temporary_config_path(),
    }
});

/// A config file path that does not exist yet.
pub fn temporary_config_path() -> PathBuf {
    env::temp_dir().join(format!("bigml-cli-test-{}.json", Uuid::new_v4()))
}

impl TestCli {
    pub fn get() -> &'static Self {
        &TEST_CLI
    }

    /// A command talking to the mock server, with credentials on the command line.
    pub fn command(&self) -> Command {
        let mut command = self.command_with_config(&self.config_path);

        command
            .arg("--endpoint")
            .arg(mockito::server_url())
            .arg("--username")
            .arg(USERNAME)
            .arg("--api-key")
            .arg(API_KEY);

        command
    }

    /// A command reading its contexts from `config_path`.
    pub fn command_with_config(&self, config_path: &Path) -> Command {
        let mut command = Command::new(&self.cli_path);
        command
            .env_remove("BIGML_USERNAME")
            .env_remove("BIGML_API_KEY")
            .arg("--config-file")
            .arg(config_path);
        command
    }

    pub fn run(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> String {
        self.output(self.command().args(args))
    }

    pub fn run_and_error(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> String {
        self.output_error(self.command().args(args))
    }

    pub fn output(&self, command: &mut Command) -> String {
        let output = command.output().unwrap();

        if !output.status.success() {
            panic!(
                "failed to run command:\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        String::from_utf8(output.stdout).unwrap()
    }

    pub fn output_error(&self, command: &mut Command) -> String {
        let output = command.output().unwrap();

        if output.status.success() {
            panic!(
                "succeeded running command (expected failure):\n{}",
                String::from_utf8_lossy(&output.stdout)
            );
        }

        String::from_utf8(output.stderr).unwrap()
    }
}

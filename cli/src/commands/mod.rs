//! # Drim Commands
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per CLI command. Each exposes a clap `Args` struct and a
//! `handle_*` function taking the shared `AppContext`.
//!
//! `AppContext` carries everything a handler may touch: the console, the
//! loaded settings, the deployment driver, the prompter, the secret
//! generator and the working directory. `main` builds it once from the
//! global flags. Handlers never read process-wide state, so tests swap in
//! fakes for the driver and the prompter.
//!
//! ## Commands
//!
//! - `setup` / `deploy`: generate artifacts (see `generate`) and start
//! - `start`, `stop`, `restart`, `status`, `logs`: compose pass-through
//! - `backup`, `restore`: copy the SQLite database out of / into the backend
//! - `upgrade`: pull and recreate
//! - `uninstall`: tear everything down
//! - `configure`: edit `.env`
//!
use crate::common::docker::ComposeDriver;
use crate::common::ui::{Console, Prompter};
use crate::core::config::Config;
use crate::core::error::{DrimError, Result};
use crate::core::secrets::SecretGenerator;
use crate::generator::artifacts::COMPOSE_FILE;
use anyhow::anyhow;
use std::path::PathBuf;
use tracing::debug;

pub mod backup;
pub mod configure;
pub mod deploy;
pub mod generate;
pub mod logs;
pub mod restart;
pub mod restore;
pub mod setup;
pub mod start;
pub mod status;
pub mod stop;
pub mod uninstall;
pub mod upgrade;

/// Everything a command handler needs.
pub struct AppContext {
    pub console: Console,
    pub settings: Config,
    pub driver: Box<dyn ComposeDriver>,
    pub prompter: Box<dyn Prompter>,
    pub secrets: Box<dyn SecretGenerator>,
    /// Directory holding the generated artifacts.
    pub workdir: PathBuf,
    /// `--yes`: confirmations are answered without asking.
    pub assume_yes: bool,
}

impl AppContext {
    /// Confirms a destructive `action`.
    ///
    /// `--yes` skips the question. Without a terminal and without `--yes`
    /// this fails rather than guessing.
    pub fn confirm_destructive(&mut self, question: &str, action: &str) -> Result<bool> {
        if self.assume_yes {
            debug!("Confirmation for '{}' assumed by --yes", action);
            return Ok(true);
        }
        if !self.prompter.is_interactive() {
            return Err(anyhow!(DrimError::ConfirmationRequired {
                action: action.to_string(),
            }));
        }
        Ok(self.prompter.confirm(question, false)?)
    }

    /// Fails unless the runtime and its compose subcommand are usable.
    pub fn ensure_runtime(&self) -> Result<()> {
        if !self.driver.runtime_available() {
            return Err(anyhow!(DrimError::Config(
                "Container runtime not found. Install Docker (or set --runtime) and retry."
                    .to_string()
            )));
        }
        if !self.driver.compose_available() {
            return Err(anyhow!(DrimError::Config(
                "The container runtime has no 'compose' subcommand.".to_string()
            )));
        }
        Ok(())
    }

    /// Fails unless a generated `compose.yml` exists in the working directory.
    pub fn require_compose_file(&self) -> Result<()> {
        let path = self.workdir.join(COMPOSE_FILE);
        if path.is_file() {
            Ok(())
        } else {
            Err(anyhow!(DrimError::FileSystem(format!(
                "No {} in {}. Run `drim setup` or `drim deploy` first.",
                COMPOSE_FILE,
                self.workdir.display()
            ))))
        }
    }
}

/// Fakes shared by command tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::common::docker::LogOptions;
    use crate::common::ui::prompt::scripted::ScriptedPrompter;
    use crate::common::ui::NonInteractivePrompter;
    use crate::generator::builder::tests::CountingSecrets;
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    /// Records every driver call as a short string.
    #[derive(Default)]
    pub(crate) struct FakeDriver {
        pub(crate) calls: Rc<RefCell<Vec<String>>>,
        /// Container ID reported for running services.
        pub(crate) running_id: Option<String>,
        /// Container ID reported when stopped containers are included.
        pub(crate) existing_id: Option<String>,
        pub(crate) runtime_missing: bool,
        pub(crate) fail_on: Option<&'static str>,
    }

    impl FakeDriver {
        fn record(&self, call: String) -> Result<()> {
            let failing = self.fail_on.is_some_and(|f| call.starts_with(f));
            self.calls.borrow_mut().push(call.clone());
            if failing {
                return Err(anyhow!(DrimError::ExternalCommand {
                    cmd: call,
                    status: "exit status: 1".into(),
                    output: "simulated failure".into(),
                }));
            }
            Ok(())
        }
    }

    impl ComposeDriver for FakeDriver {
        fn runtime_available(&self) -> bool {
            !self.runtime_missing
        }
        fn compose_available(&self) -> bool {
            !self.runtime_missing
        }
        fn pull(&self) -> Result<()> {
            self.record("pull".into())
        }
        fn up(&self) -> Result<()> {
            self.record("up".into())
        }
        fn start(&self, services: &[&str]) -> Result<()> {
            self.record(format!("start {}", services.join(" ")).trim().to_string())
        }
        fn stop(&self, services: &[&str]) -> Result<()> {
            self.record(format!("stop {}", services.join(" ")).trim().to_string())
        }
        fn restart(&self, services: &[&str]) -> Result<()> {
            self.record(format!("restart {}", services.join(" ")).trim().to_string())
        }
        fn down(&self, remove_volumes: bool) -> Result<()> {
            self.record(if remove_volumes { "down -v" } else { "down" }.into())
        }
        fn ps(&self) -> Result<()> {
            self.record("ps".into())
        }
        fn logs(&self, options: &LogOptions) -> Result<()> {
            self.record(format!("logs {}", options.to_args().join(" ")).trim().to_string())
        }
        fn container_id(&self, service: &str, include_stopped: bool) -> Result<Option<String>> {
            self.record(format!("id {} {}", service, include_stopped))?;
            Ok(if include_stopped {
                self.existing_id.clone().or_else(|| self.running_id.clone())
            } else {
                self.running_id.clone()
            })
        }
        fn copy_from_container(&self, container: &str, source: &str, destination: &Path) -> Result<()> {
            self.record(format!("cp {}:{} {}", container, source, destination.display()))?;
            std::fs::write(destination, b"sqlite")?;
            Ok(())
        }
        fn copy_into_container(&self, source: &Path, container: &str, destination: &str) -> Result<()> {
            self.record(format!("cp {} {}:{}", source.display(), container, destination))
        }
        fn remove_image(&self, image: &str) -> Result<()> {
            self.record(format!("rmi {}", image))
        }
    }

    /// Context over `dir` with the given driver, non-interactive.
    pub(crate) fn context(dir: &Path, driver: FakeDriver) -> AppContext {
        AppContext {
            console: Console::new(false),
            settings: Config::default(),
            driver: Box::new(driver),
            prompter: Box::new(NonInteractivePrompter),
            secrets: Box::new(CountingSecrets::default()),
            workdir: dir.to_path_buf(),
            assume_yes: false,
        }
    }

    /// Same as `context`, answering prompts from `answers`.
    pub(crate) fn interactive_context(dir: &Path, driver: FakeDriver, answers: &[&str]) -> AppContext {
        let mut ctx = context(dir, driver);
        ctx.prompter = Box::new(ScriptedPrompter::new(answers));
        ctx
    }

    /// Driver plus a handle on its call log.
    pub(crate) fn driver() -> (FakeDriver, Rc<RefCell<Vec<String>>>) {
        let driver = FakeDriver::default();
        let calls = Rc::clone(&driver.calls);
        (driver, calls)
    }

    pub(crate) fn write_compose(dir: &Path) {
        std::fs::write(dir.join(COMPOSE_FILE), "services: {}\n").unwrap();
    }
}

use std::path::{Path, PathBuf};

use crate::{
    backend_config::{Endpoint, LauncherConfig},
    backend_readiness::ReadinessPoller,
    backend_supervisor::BackendSupervisor,
    backend_target::ResolveContext,
    process_control::ShutdownSweep,
    READY_POLL_INTERVAL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Packaged,
    Development,
}

impl RunMode {
    /// An explicit override wins when it parses; otherwise debug builds run
    /// the source checkout and release builds run the bundled executable.
    pub fn detect(override_value: Option<&str>, debug_build: bool) -> Self {
        if let Some(mode) = override_value.and_then(Self::parse) {
            return mode;
        }
        if debug_build {
            Self::Development
        } else {
            Self::Packaged
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "packaged" | "prod" | "production" => Some(Self::Packaged),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Packaged => "packaged",
            Self::Development => "development",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    pub(crate) command: PathBuf,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) mode: RunMode,
}

impl BackendTarget {
    pub fn command(&self) -> &Path {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Waiting,
    Ready,
}

/// Everything the shell shares between the startup task and the exit hooks.
#[derive(Debug)]
pub struct LauncherState {
    pub mode: RunMode,
    pub config: LauncherConfig,
    pub endpoint: Endpoint,
    pub supervisor: BackendSupervisor,
    pub poller: ReadinessPoller,
}

impl LauncherState {
    pub fn new(mode: RunMode, config: LauncherConfig) -> Self {
        let endpoint = Endpoint::new(config.port);
        let sweep = ShutdownSweep::for_current_platform(&config.backend_name);
        Self {
            mode,
            endpoint,
            supervisor: BackendSupervisor::new(sweep),
            poller: ReadinessPoller::new(READY_POLL_INTERVAL),
            config,
        }
    }

    pub fn resolve_context(&self, resource_dir: Option<PathBuf>) -> ResolveContext {
        ResolveContext {
            backend_name: self.config.backend_name.clone(),
            resource_dir,
            project_root: crate::runtime_paths::project_root_dir(),
            custom_command: crate::runtime_paths::non_blank_env(crate::BACKEND_CMD_ENV),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_valid_override() {
        assert_eq!(RunMode::detect(Some("Packaged"), true), RunMode::Packaged);
        assert_eq!(RunMode::detect(Some(" dev "), false), RunMode::Development);
    }

    #[test]
    fn detect_falls_back_to_build_profile_for_unknown_override() {
        assert_eq!(RunMode::detect(Some("bogus"), true), RunMode::Development);
        assert_eq!(RunMode::detect(None, false), RunMode::Packaged);
    }

    #[test]
    fn launcher_state_starts_waiting_with_configured_port() {
        let state = LauncherState::new(
            RunMode::Development,
            LauncherConfig {
                backend_name: "plantgrower".to_string(),
                port: 6060,
            },
        );
        assert_eq!(state.endpoint.url().as_str(), "https://127.0.0.1:6060/");
        assert_eq!(state.poller.state(), ReadinessState::Waiting);
    }
}

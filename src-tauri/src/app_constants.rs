use std::time::Duration;

pub const DEFAULT_BACKEND_NAME: &str = "handpuppets";
pub const DEFAULT_BACKEND_PORT: u16 = 5050;
pub const BACKEND_HOST: &str = "127.0.0.1";
pub const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const ROOT_DIR_ENV: &str = "HANDPUPPETS_ROOT";
pub const RUN_MODE_ENV: &str = "HANDPUPPETS_RUN_MODE";
pub const PROJECT_ROOT_ENV: &str = "HANDPUPPETS_PROJECT_ROOT";
pub const BACKEND_NAME_ENV: &str = "HANDPUPPETS_BACKEND_NAME";
pub const BACKEND_PORT_ENV: &str = "HANDPUPPETS_BACKEND_PORT";
pub const BACKEND_CMD_ENV: &str = "HANDPUPPETS_BACKEND_CMD";

pub const DEFAULT_ROOT_DIR_NAME: &str = ".handpuppets";
pub const DESKTOP_LOG_FILE: &str = "desktop.log";
pub const LAUNCHER_CONFIG_FILE: &str = "launcher.json";

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const MAIN_WINDOW_TITLE: &str = "Hand Puppets";
pub const LOADING_PAGE: &str = "loading.html";

#[cfg(target_os = "windows")]
pub const CREATE_NO_WINDOW: u32 = 0x0800_0000;

use std::{
    io,
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
};

/// Extra kill pass run on every stop, chosen once per platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownSweep {
    Disabled,
    ByName(String),
}

impl ShutdownSweep {
    /// macOS bundles can leave detached descendants named after the backend.
    pub fn for_current_platform(backend_name: &str) -> Self {
        if cfg!(target_os = "macos") {
            Self::ByName(backend_name.to_string())
        } else {
            Self::Disabled
        }
    }
}

#[cfg(unix)]
pub fn mark_executable(path: &Path) -> io::Result<()> {
    use std::{fs, os::unix::fs::PermissionsExt};

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
pub fn mark_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Hard-kills the child. It is reaped only when the kill was delivered, so a
/// failed kill can never leave the caller blocked in `wait`.
pub fn kill_child_process(child: &mut Child) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    {
        let status = Command::new("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if !status.success() {
            child.kill()?;
        }
        child.wait()?;
        Ok(())
    }

    #[cfg(not(target_os = "windows"))]
    {
        child.kill()?;
        child.wait()?;
        Ok(())
    }
}

pub fn kill_processes_by_name(name: &str) -> io::Result<ExitStatus> {
    let mut command = if cfg!(target_os = "windows") {
        let mut command = Command::new("taskkill");
        command.args(["/im", &format!("{name}.exe"), "/t", "/f"]);
        command
    } else {
        let mut command = Command::new("killall");
        command.args(["-9", name]);
        command
    };

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
}

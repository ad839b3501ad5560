//! Works out what to run for the backend in each run mode.

use std::path::{Path, PathBuf};

use crate::{error::LaunchError, BackendTarget, RunMode};

#[derive(Debug, Clone)]
pub struct ResolveContext {
    pub backend_name: String,
    pub resource_dir: Option<PathBuf>,
    pub project_root: PathBuf,
    pub custom_command: Option<String>,
}

pub fn resolve(mode: RunMode, context: &ResolveContext) -> Result<BackendTarget, LaunchError> {
    if let Some(custom_command) = context.custom_command.as_deref() {
        return resolve_custom(mode, custom_command, &context.project_root);
    }

    match mode {
        RunMode::Packaged => {
            let resource_dir = context
                .resource_dir
                .as_deref()
                .ok_or(LaunchError::ResourceDirUnavailable)?;
            Ok(resolve_packaged(resource_dir, &context.backend_name))
        }
        RunMode::Development => Ok(resolve_development(
            &context.project_root,
            &context.backend_name,
        )),
    }
}

fn resolve_custom(
    mode: RunMode,
    custom_command: &str,
    cwd: &Path,
) -> Result<BackendTarget, LaunchError> {
    let mut pieces = shlex::split(custom_command)
        .ok_or_else(|| LaunchError::InvalidCustomCommand(custom_command.to_string()))?;
    if pieces.is_empty() {
        return Err(LaunchError::InvalidCustomCommand(custom_command.to_string()));
    }

    let command = PathBuf::from(pieces.remove(0));
    Ok(BackendTarget {
        command,
        args: pieces,
        cwd: cwd.to_path_buf(),
        mode,
    })
}

/// One-dir bundles nest the executable in a folder named after it; one-file
/// bundles drop it straight into the resource root. The flat path is only
/// taken when it is a file: on unix it names the one-dir folder itself.
fn resolve_packaged(resource_dir: &Path, backend_name: &str) -> BackendTarget {
    let file_name = executable_file_name(backend_name);
    let primary = resource_dir.join(backend_name).join(&file_name);
    let fallback = resource_dir.join(&file_name);
    let command = if !primary.is_file() && fallback.is_file() {
        fallback
    } else {
        primary
    };
    let cwd = command
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| resource_dir.to_path_buf());

    BackendTarget {
        command,
        args: Vec::new(),
        cwd,
        mode: RunMode::Packaged,
    }
}

fn resolve_development(project_root: &Path, backend_name: &str) -> BackendTarget {
    let script = project_root.join(format!("{backend_name}.py"));
    BackendTarget {
        command: development_interpreter(project_root),
        args: vec!["-u".to_string(), script.to_string_lossy().to_string()],
        cwd: project_root.to_path_buf(),
        mode: RunMode::Development,
    }
}

pub fn development_interpreter(project_root: &Path) -> PathBuf {
    let relative = if cfg!(target_os = "windows") {
        PathBuf::from("Scripts").join("python.exe")
    } else {
        PathBuf::from("bin").join("python")
    };

    for venv in ["venv", ".venv"] {
        let candidate = project_root.join(venv).join(&relative);
        if candidate.is_file() {
            return candidate;
        }
    }

    if cfg!(target_os = "windows") {
        PathBuf::from("python")
    } else {
        PathBuf::from("python3")
    }
}

pub fn executable_file_name(backend_name: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{backend_name}.exe")
    } else {
        backend_name.to_string()
    }
}

pub fn build_debug_command(target: &BackendTarget) -> Vec<String> {
    let mut parts = vec![target.command.to_string_lossy().to_string()];
    parts.extend(target.args.iter().cloned());
    parts
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn context(resource_dir: Option<&Path>, project_root: &Path) -> ResolveContext {
        ResolveContext {
            backend_name: "handpuppets".to_string(),
            resource_dir: resource_dir.map(Path::to_path_buf),
            project_root: project_root.to_path_buf(),
            custom_command: None,
        }
    }

    #[test]
    fn packaged_prefers_nested_layout() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("handpuppets");
        fs::create_dir_all(&nested).unwrap();
        let exe = nested.join(executable_file_name("handpuppets"));
        fs::write(&exe, b"").unwrap();

        let target = resolve(RunMode::Packaged, &context(Some(dir.path()), dir.path())).unwrap();
        assert_eq!(target.command(), exe.as_path());
        assert_eq!(target.cwd(), nested.as_path());
        assert!(target.args().is_empty());
        assert_eq!(target.mode(), RunMode::Packaged);
    }

    #[test]
    fn packaged_falls_back_to_flat_layout() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join(executable_file_name("handpuppets"));
        fs::write(&exe, b"").unwrap();

        let target = resolve(RunMode::Packaged, &context(Some(dir.path()), dir.path())).unwrap();
        assert_eq!(target.command(), exe.as_path());
        assert_eq!(target.cwd(), dir.path());
    }

    #[test]
    fn packaged_names_nested_executable_when_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();
        let target = resolve(RunMode::Packaged, &context(Some(dir.path()), dir.path())).unwrap();
        assert_eq!(
            target.command(),
            dir.path()
                .join("handpuppets")
                .join(executable_file_name("handpuppets"))
                .as_path()
        );
    }

    #[test]
    fn packaged_never_resolves_to_the_bundle_directory() {
        let dir = tempfile::tempdir().unwrap();
        let bundle_dir = dir.path().join("handpuppets");
        fs::create_dir_all(&bundle_dir).unwrap();

        let target = resolve(RunMode::Packaged, &context(Some(dir.path()), dir.path())).unwrap();
        assert!(!target.command().is_dir());
        assert_eq!(
            target.command(),
            bundle_dir.join(executable_file_name("handpuppets")).as_path()
        );
        assert_eq!(target.cwd(), bundle_dir.as_path());
    }

    #[test]
    fn packaged_without_resource_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve(RunMode::Packaged, &context(None, dir.path()));
        assert!(matches!(result, Err(LaunchError::ResourceDirUnavailable)));
    }

    #[test]
    fn development_uses_system_interpreter_without_venv() {
        let dir = tempfile::tempdir().unwrap();
        let target = resolve(RunMode::Development, &context(None, dir.path())).unwrap();

        let expected = if cfg!(target_os = "windows") { "python" } else { "python3" };
        assert_eq!(target.command(), Path::new(expected));
        assert_eq!(
            target.args(),
            [
                "-u".to_string(),
                dir.path().join("handpuppets.py").to_string_lossy().to_string()
            ]
        );
        assert_eq!(target.cwd(), dir.path());
    }

    #[test]
    fn development_prefers_project_venv() {
        let dir = tempfile::tempdir().unwrap();
        let relative = if cfg!(target_os = "windows") {
            PathBuf::from("Scripts").join("python.exe")
        } else {
            PathBuf::from("bin").join("python")
        };
        let interpreter = dir.path().join(".venv").join(&relative);
        fs::create_dir_all(interpreter.parent().unwrap()).unwrap();
        fs::write(&interpreter, b"").unwrap();

        assert_eq!(development_interpreter(dir.path()), interpreter);
    }

    #[test]
    fn custom_command_is_split_with_shell_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(None, dir.path());
        ctx.custom_command = Some("uv run 'hand puppets.py' --debug".to_string());

        let target = resolve(RunMode::Packaged, &ctx).unwrap();
        assert_eq!(
            build_debug_command(&target),
            ["uv", "run", "hand puppets.py", "--debug"]
        );
        assert_eq!(target.cwd(), dir.path());
    }

    #[test]
    fn custom_command_with_unbalanced_quotes_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(None, dir.path());
        ctx.custom_command = Some("python 'unterminated".to_string());

        assert!(matches!(
            resolve(RunMode::Development, &ctx),
            Err(LaunchError::InvalidCustomCommand(_))
        ));
    }
}

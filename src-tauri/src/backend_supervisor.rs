//! Owns the backend child process for the lifetime of the launcher.
//!
//! The handle lives in a single `Mutex<Option<Child>>` cell and is only
//! reachable through `start` and `stop`. `stop` is safe to call from every
//! shutdown hook, any number of times, and once it has run no later `start`
//! will spawn.

use std::{
    process::{Child, Command, Stdio},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

use crate::{
    backend_target::{self, build_debug_command, ResolveContext},
    error::LaunchError,
    process_control::{self, ShutdownSweep},
    BackendTarget, RunMode,
};

#[derive(Debug)]
pub struct BackendSupervisor {
    child: Mutex<Option<Child>>,
    stopping: AtomicBool,
    sweep: ShutdownSweep,
}

impl BackendSupervisor {
    pub fn new(sweep: ShutdownSweep) -> Self {
        Self {
            child: Mutex::new(None),
            stopping: AtomicBool::new(false),
            sweep,
        }
    }

    /// Resolves and spawns the backend. Every failure is logged and reported
    /// as `None`; the poller keeps waiting either way.
    pub fn start<F>(&self, mode: RunMode, context: &ResolveContext, log: F) -> Option<u32>
    where
        F: Fn(&str),
    {
        let mut guard = self.lock_child(&log);
        // Checked under the lock: a stop() that already ran cannot miss a child
        // spawned here, and a pending one will take it.
        if self.stopping.load(Ordering::Acquire) {
            log("backend start skipped: launcher is shutting down");
            return None;
        }
        if let Some(child) = guard.as_ref() {
            let pid = child.id();
            log(&format!("backend start skipped: already tracking pid={pid}"));
            return Some(pid);
        }

        let target = match backend_target::resolve(mode, context) {
            Ok(target) => target,
            Err(error) => {
                log(&format!("backend spawn failed: pid=FAIL error={error}"));
                return None;
            }
        };

        if target.mode() == RunMode::Packaged {
            prepare_packaged_executable(&target, &log);
        }

        log(&format!(
            "spawning backend ({}): {:?} cwd={}",
            target.mode().as_str(),
            build_debug_command(&target),
            target.cwd().display()
        ));
        match spawn_target(&target) {
            Ok(child) => {
                let pid = child.id();
                log(&format!("backend spawned: pid={pid}"));
                *guard = Some(child);
                Some(pid)
            }
            Err(error) => {
                log(&format!("backend spawn failed: pid=FAIL error={error}"));
                None
            }
        }
    }

    pub fn stop<F>(&self, log: F)
    where
        F: Fn(&str),
    {
        self.stopping.store(true, Ordering::Release);
        let child = self.lock_child(&log).take();
        if let Some(mut child) = child {
            let pid = child.id();
            match process_control::kill_child_process(&mut child) {
                Ok(()) => log(&format!("backend stopped: pid={pid}")),
                Err(error) => log(&format!("failed to kill backend pid={pid}: {error}")),
            }
        }

        if let ShutdownSweep::ByName(name) = &self.sweep {
            match process_control::kill_processes_by_name(name) {
                Ok(status) if status.success() => {
                    log(&format!("shutdown sweep killed remaining '{name}' processes"))
                }
                Ok(status) => log(&format!(
                    "shutdown sweep found no '{name}' processes ({status})"
                )),
                Err(error) => log(&format!("shutdown sweep for '{name}' failed: {error}")),
            }
        }
    }

    fn lock_child<F>(&self, log: &F) -> MutexGuard<'_, Option<Child>>
    where
        F: Fn(&str),
    {
        match self.child.lock() {
            Ok(guard) => guard,
            Err(error) => {
                log(&format!("backend process lock poisoned: {error}"));
                error.into_inner()
            }
        }
    }

    #[cfg(test)]
    fn tracked_pid(&self) -> Option<u32> {
        self.child
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(Child::id))
    }
}

fn prepare_packaged_executable<F>(target: &BackendTarget, log: &F)
where
    F: Fn(&str),
{
    if !target.command().is_file() {
        log(&format!(
            "packaged backend executable is missing: {}",
            target.command().display()
        ));
        return;
    }
    if let Err(error) = process_control::mark_executable(target.command()) {
        log(&format!(
            "failed to mark {} executable: {error}",
            target.command().display()
        ));
    }
}

fn spawn_target(target: &BackendTarget) -> Result<Child, LaunchError> {
    let mut command = Command::new(target.command());
    command
        .args(target.args())
        .current_dir(target.cwd())
        .stdin(Stdio::null())
        .env("PYTHONUNBUFFERED", "1");

    match target.mode() {
        RunMode::Packaged => {
            command.stdout(Stdio::null()).stderr(Stdio::null());
            #[cfg(target_os = "windows")]
            {
                use std::os::windows::process::CommandExt;
                command.creation_flags(crate::CREATE_NO_WINDOW);
            }
        }
        RunMode::Development => {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }
    }

    command.spawn().map_err(|source| LaunchError::Spawn {
        command: build_debug_command(target),
        source,
    })
}

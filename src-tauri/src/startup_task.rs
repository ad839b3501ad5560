use crate::{
    backend_supervisor::BackendSupervisor,
    backend_target::ResolveContext,
    media_permission::{CameraAccess, PermissionGate},
    RunMode,
};

/// Permission first, then the backend. The backend is started whatever the
/// permission outcome was.
pub async fn start_backend_after_permission<C, P, B>(
    gate: &PermissionGate<C>,
    supervisor: &BackendSupervisor,
    mode: RunMode,
    context: &ResolveContext,
    permission_log: P,
    backend_log: B,
) -> Option<u32>
where
    C: CameraAccess,
    P: Fn(&str) + Send + Sync,
    B: Fn(&str),
{
    let outcome = gate.resolve(permission_log).await;
    backend_log(&format!("permission gate resolved: {outcome:?}"));
    supervisor.start(mode, context, backend_log)
}

//! Camera permission gate run before the backend starts.
//!
//! Only macOS asks; every other platform gets `PermissionGate::NotRequired`
//! and proceeds straight to the spawn.

use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAccessStatus {
    NotDetermined,
    Restricted,
    Denied,
    Granted,
}

impl MediaAccessStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotDetermined => "not-determined",
            Self::Restricted => "restricted",
            Self::Denied => "denied",
            Self::Granted => "granted",
        }
    }
}

pub trait CameraAccess: Send + Sync {
    fn status(&self) -> MediaAccessStatus;
    fn request(&self) -> impl Future<Output = bool> + Send;
}

pub enum PermissionGate<C> {
    NotRequired,
    Camera(C),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Skipped,
    AlreadyGranted,
    Requested { granted: bool },
}

impl PermissionGate<SystemCameraAccess> {
    pub fn for_current_platform() -> Self {
        if cfg!(target_os = "macos") {
            Self::Camera(SystemCameraAccess)
        } else {
            Self::NotRequired
        }
    }
}

impl<C: CameraAccess> PermissionGate<C> {
    /// Resolves once the user has answered (or immediately when nothing needs
    /// asking). The outcome is informational; startup continues regardless.
    pub async fn resolve<F>(&self, log: F) -> PermissionOutcome
    where
        F: Fn(&str) + Send + Sync,
    {
        let camera = match self {
            Self::NotRequired => return PermissionOutcome::Skipped,
            Self::Camera(camera) => camera,
        };

        log("checking camera permission");
        let status = camera.status();
        log(&format!("camera permission status: {}", status.as_str()));
        if status == MediaAccessStatus::Granted {
            return PermissionOutcome::AlreadyGranted;
        }

        log("requesting camera access");
        let granted = camera.request().await;
        log(&format!("camera access request result: {granted}"));
        PermissionOutcome::Requested { granted }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCameraAccess;

#[cfg(target_os = "macos")]
mod avfoundation {
    use std::sync::Mutex;

    use block2::RcBlock;
    use objc2::runtime::Bool;
    use objc2_av_foundation::{AVAuthorizationStatus, AVCaptureDevice, AVMediaTypeVideo};
    use tokio::sync::oneshot;

    use super::MediaAccessStatus;

    pub(super) fn status() -> MediaAccessStatus {
        let Some(media_type) = (unsafe { AVMediaTypeVideo }) else {
            return MediaAccessStatus::NotDetermined;
        };
        let status = unsafe { AVCaptureDevice::authorizationStatusForMediaType(media_type) };
        if status == AVAuthorizationStatus::Authorized {
            MediaAccessStatus::Granted
        } else if status == AVAuthorizationStatus::Denied {
            MediaAccessStatus::Denied
        } else if status == AVAuthorizationStatus::Restricted {
            MediaAccessStatus::Restricted
        } else {
            MediaAccessStatus::NotDetermined
        }
    }

    pub(super) async fn request() -> bool {
        let receiver = {
            let Some(media_type) = (unsafe { AVMediaTypeVideo }) else {
                return false;
            };
            let (sender, receiver) = oneshot::channel::<bool>();
            let sender = Mutex::new(Some(sender));
            let handler = RcBlock::new(move |granted: Bool| {
                let sender = sender.lock().ok().and_then(|mut guard| guard.take());
                if let Some(sender) = sender {
                    let _ = sender.send(granted.as_bool());
                }
            });
            unsafe {
                AVCaptureDevice::requestAccessForMediaType_completionHandler(media_type, &handler)
            };
            receiver
        };
        receiver.await.unwrap_or(false)
    }
}

#[cfg(target_os = "macos")]
impl CameraAccess for SystemCameraAccess {
    fn status(&self) -> MediaAccessStatus {
        avfoundation::status()
    }

    async fn request(&self) -> bool {
        avfoundation::request().await
    }
}

#[cfg(not(target_os = "macos"))]
impl CameraAccess for SystemCameraAccess {
    fn status(&self) -> MediaAccessStatus {
        MediaAccessStatus::Granted
    }

    async fn request(&self) -> bool {
        true
    }
}

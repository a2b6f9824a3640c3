//! Short-lived user notifications.
//!
//! Every toast removes itself [`TOAST_LIFETIME`] after it was added unless it
//! was dismissed first.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::Observable;

/// How long a toast stays visible.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(4);

const TOAST_ID_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// Random per-session toast identifier. Collisions are unlikely, not impossible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(String);

impl ToastId {
    fn random() -> Self {
        let mut bits = Uuid::new_v4().as_u128();
        let mut id = String::with_capacity(TOAST_ID_LEN);
        for _ in 0..TOAST_ID_LEN {
            id.push(char::from(BASE36[usize::try_from(bits % 36).unwrap_or_default()]));
            bits /= 36;
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: ToastId,
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub message: String,
}

/// Observable queue of active toasts.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Observable<Vec<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a toast and schedule its removal.
    ///
    /// Expiry runs on the current tokio runtime. Outside a runtime the toast
    /// stays until [`ToastQueue::remove`] is called.
    pub fn add(&self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        let toast = Toast {
            id: ToastId::random(),
            kind,
            message: message.into(),
        };
        let id = toast.id.clone();
        self.toasts.update(|toasts| toasts.push(toast));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let queue = self.clone();
                let expired = id.clone();
                handle.spawn(async move {
                    tokio::time::sleep(TOAST_LIFETIME).await;
                    queue.remove(&expired);
                });
            }
            Err(_) => {
                tracing::warn!(toast = %id, "No async runtime; toast will not expire");
            }
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.add(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.add(ToastKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.add(ToastKind::Info, message)
    }

    /// Remove a toast. Unknown ids are ignored, so expiry and manual
    /// dismissal may race freely.
    pub fn remove(&self, id: &ToastId) {
        self.toasts.update(|toasts| toasts.retain(|toast| &toast.id != id));
    }

    /// Current toasts, oldest first.
    pub fn current(&self) -> Vec<Toast> {
        self.toasts.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Vec<Toast>> {
        self.toasts.subscribe()
    }

    /// Drop every toast. Pending expiry timers become no-ops.
    pub fn clear(&self) {
        self.toasts.set(Vec::new());
    }
}

//! Online/offline state pushed in by the host environment.

use std::sync::Arc;

use tokio::sync::watch;

/// Event-driven connectivity flag.
///
/// The host calls [`ConnectivityMonitor::set_online`] on every environment
/// transition; nothing here polls. A monitor nobody updates reports online.
#[derive(Clone, Debug)]
pub struct ConnectivityMonitor {
    sender: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    pub fn new(online: bool) -> Self {
        let (sender, _receiver) = watch::channel(online);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn is_online(&self) -> bool {
        *self.sender.borrow()
    }

    /// Record a transition. Returns `true` when the state actually changed.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!(
                "Connectivity changed: {}",
                if online { "online" } else { "offline" }
            );
        }
        changed
    }

    /// Receiver that wakes on every recorded transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

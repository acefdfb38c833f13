//! Tray handle, events, and update types.
//!
//! The actual system tray implementation depends on platform-specific
//! libraries. This module defines the channel-based interface that the
//! agent core uses to communicate with the tray, independent of the GUI
//! backend.

use std::sync::mpsc;

use crate::menu::MenuState;

/// Configuration for the system tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Application display name shown in the tray tooltip.
    pub app_name: String,
    /// Optional icon data (PNG bytes).
    pub icon_data: Option<Vec<u8>>,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            app_name: "wowcache".into(),
            icon_data: None,
        }
    }
}

/// Events emitted by the tray to the agent core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// User clicked "Quit" in the context menu.
    QuitRequested,
}

/// A balloon notification to display at the tray icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balloon {
    pub title: String,
    pub message: String,
    /// `true` renders with the error icon.
    pub error: bool,
}

/// Updates sent from the agent core to the tray.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// An upload started (switch to the busy icon).
    UploadStarted,
    /// The upload finished, with a short outcome description (restore the
    /// normal icon).
    UploadFinished(String),
    /// Show a balloon notification.
    Notify(Balloon),
    /// Request tray shutdown.
    Shutdown,
}

/// Handle for communicating with the system tray from the agent core.
///
/// This is the async-safe side of the tray interface. The tray event loop
/// runs on the main thread and communicates via channels.
pub struct TrayHandle {
    /// Send updates to the tray.
    update_tx: mpsc::Sender<TrayUpdate>,
    /// Receive events from the tray.
    event_rx: mpsc::Receiver<TrayEvent>,
    /// Current menu state (for tracking).
    state: MenuState,
}

impl TrayHandle {
    /// Creates a new tray handle with its channel pair.
    ///
    /// Returns `(handle, event_sender, update_receiver)` — the sender/receiver
    /// pair is given to the tray event loop running on the main thread.
    pub fn new(config: TrayConfig) -> (Self, mpsc::Sender<TrayEvent>, mpsc::Receiver<TrayUpdate>) {
        let (update_tx, update_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = Self {
            update_tx,
            event_rx,
            state: MenuState {
                app_name: config.app_name,
                uploading: false,
                last_outcome: None,
            },
        };

        (handle, event_tx, update_rx)
    }

    /// Switches the tray to the uploading state.
    pub fn upload_started(&mut self) {
        self.state.uploading = true;
        let _ = self.update_tx.send(TrayUpdate::UploadStarted);
    }

    /// Switches the tray back to idle, recording the outcome.
    pub fn upload_finished(&mut self, outcome: impl Into<String>) {
        let outcome = outcome.into();
        self.state.uploading = false;
        self.state.last_outcome = Some(outcome.clone());
        let _ = self.update_tx.send(TrayUpdate::UploadFinished(outcome));
    }

    /// Shows a balloon notification at the tray icon.
    pub fn balloon(&self, title: &str, message: &str, error: bool) {
        let _ = self.update_tx.send(TrayUpdate::Notify(Balloon {
            title: title.to_string(),
            message: message.to_string(),
            error,
        }));
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) {
        tracing::debug!("tray shutdown requested");
        let _ = self.update_tx.send(TrayUpdate::Shutdown);
    }

    /// Tries to receive a tray event (non-blocking).
    pub fn try_recv_event(&self) -> Option<TrayEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Returns the current menu state.
    pub fn state(&self) -> &MenuState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tray_handle_creation() {
        let config = TrayConfig::default();
        let (handle, _event_tx, _update_rx) = TrayHandle::new(config);
        assert_eq!(handle.state().app_name, "wowcache");
        assert!(!handle.state().uploading);
    }

    #[test]
    fn tray_handle_upload_state() {
        let (mut handle, _event_tx, update_rx) = TrayHandle::new(TrayConfig::default());

        handle.upload_started();
        assert!(handle.state().uploading);

        handle.upload_finished("Uploaded");
        assert!(!handle.state().uploading);
        assert_eq!(handle.state().last_outcome.as_deref(), Some("Uploaded"));

        let mut updates = Vec::new();
        while let Ok(u) = update_rx.try_recv() {
            updates.push(u);
        }
        assert!(matches!(updates[0], TrayUpdate::UploadStarted));
        assert!(matches!(updates[1], TrayUpdate::UploadFinished(_)));
    }

    #[test]
    fn tray_handle_balloon() {
        let (handle, _event_tx, update_rx) = TrayHandle::new(TrayConfig::default());

        handle.balloon("Uploaded", "Cache successfully uploaded!", false);
        let update = update_rx.recv().unwrap();
        match update {
            TrayUpdate::Notify(balloon) => {
                assert_eq!(balloon.title, "Uploaded");
                assert!(!balloon.error);
            }
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[test]
    fn tray_handle_events() {
        let (handle, event_tx, _update_rx) = TrayHandle::new(TrayConfig::default());

        // No events yet.
        assert!(handle.try_recv_event().is_none());

        // Send a quit event from the tray.
        event_tx.send(TrayEvent::QuitRequested).unwrap();
        let event = handle.try_recv_event().unwrap();
        assert_eq!(event, TrayEvent::QuitRequested);
    }

    #[test]
    fn tray_handle_shutdown() {
        let (handle, _event_tx, update_rx) = TrayHandle::new(TrayConfig::default());

        handle.shutdown();
        let update = update_rx.recv().unwrap();
        assert!(matches!(update, TrayUpdate::Shutdown));
    }

    #[test]
    fn tray_config_default() {
        let config = TrayConfig::default();
        assert_eq!(config.app_name, "wowcache");
        assert!(config.icon_data.is_none());
    }
}

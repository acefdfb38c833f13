//! Dynamic context menu for the system tray.

/// Actions that can be triggered from the tray context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// User requested to quit the application.
    Quit,
}

/// A single menu item.
#[derive(Debug, Clone)]
pub struct MenuItem {
    /// Display text.
    pub label: String,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Optional action triggered on click.
    pub action: Option<MenuAction>,
}

/// Current state used to build the context menu.
#[derive(Debug, Clone)]
pub struct MenuState {
    /// Application display name.
    pub app_name: String,
    /// Whether an upload is currently in flight.
    pub uploading: bool,
    /// Short description of the most recent upload outcome, if any.
    pub last_outcome: Option<String>,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            app_name: "wowcache".into(),
            uploading: false,
            last_outcome: None,
        }
    }
}

impl MenuState {
    /// Builds the menu items from the current state.
    pub fn build_menu(&self) -> Vec<MenuItem> {
        let mut items = Vec::new();

        // Header: app name + status.
        let status = if self.uploading { "Uploading…" } else { "Idle" };
        items.push(MenuItem {
            label: format!("{} — {status}", self.app_name),
            enabled: false,
            action: None,
        });

        // Separator (represented as disabled empty item).
        items.push(MenuItem {
            label: String::new(),
            enabled: false,
            action: None,
        });

        match &self.last_outcome {
            Some(outcome) => items.push(MenuItem {
                label: format!("Last upload: {outcome}"),
                enabled: false,
                action: None,
            }),
            None => items.push(MenuItem {
                label: "No uploads yet".into(),
                enabled: false,
                action: None,
            }),
        }

        // Separator.
        items.push(MenuItem {
            label: String::new(),
            enabled: false,
            action: None,
        });

        // Quit.
        items.push(MenuItem {
            label: "Quit".into(),
            enabled: true,
            action: Some(MenuAction::Quit),
        });

        items
    }
}

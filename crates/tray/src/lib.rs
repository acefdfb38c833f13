//! System tray abstraction for the wowcache agent.
//!
//! The agent is a background process whose only surface is a tray icon:
//! idle or uploading state, balloon notifications for outcomes, and a quit
//! action. This crate defines the channel-based interface between the agent
//! core and whatever tray backend the host build wires up:
//! - [`TrayEvent`] — events from tray to agent (e.g. quit requested)
//! - [`TrayUpdate`] — updates from agent to tray (busy state, balloons)
//!
//! # Platform notes
//! - Linux: StatusNotifierItem (Wayland) or X11 tray protocol
//! - Windows: Win32 Shell_NotifyIcon
//! - The tray event loop must run on the main thread on some platforms

mod menu;
mod tray;

pub use menu::{MenuAction, MenuItem, MenuState};
pub use tray::{Balloon, TrayConfig, TrayEvent, TrayHandle, TrayUpdate};

//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with four states (Idle, Recording,
//! ReplayBuffer, Paused) and a context menu driving the recorder.

use crate::{AppCommand, AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const TOOLTIP_PREFIX: &str = "GPU Screen Recorder";
const ICON_SIZE: u32 = 32;

/// Menu item ids, sent to the app thread to map clicks to commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMenuIds {
    /// Start/Stop Recording.
    pub toggle: MenuId,
    /// Save Replay.
    pub save_replay: MenuId,
    /// Pause/Resume.
    pub pause: MenuId,
    /// Settings.
    pub settings: MenuId,
    /// Quit.
    pub quit: MenuId,
}

impl TrayMenuIds {
    /// Command for a clicked menu item.
    pub fn command_for(&self, id: &MenuId) -> Option<AppCommand> {
        if *id == self.toggle {
            Some(AppCommand::ToggleRecording)
        } else if *id == self.save_replay {
            Some(AppCommand::SaveReplay)
        } else if *id == self.pause {
            Some(AppCommand::TogglePause)
        } else if *id == self.settings {
            Some(AppCommand::OpenSettings)
        } else if *id == self.quit {
            Some(AppCommand::Shutdown)
        } else {
            None
        }
    }
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    toggle_item: MenuItem,
    save_item: MenuItem,
    pause_item: MenuItem,
    ids: TrayMenuIds,
    state: TrayIconState,
}

impl TrayManager {
    /// Create a new tray manager in the Idle state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let state = TrayIconState::Idle;
        let menu = Menu::new();

        let toggle_item = MenuItem::new(state.toggle_label(), true, None);
        let save_item = MenuItem::new("Save Replay", state.can_save_replay(), None);
        let pause_item = MenuItem::new(state.pause_label(), state.can_pause(), None);
        let settings_item = MenuItem::new("Settings", true, None);
        let quit_item = MenuItem::new("Quit", true, None);

        let ids = TrayMenuIds {
            toggle: toggle_item.id().clone(),
            save_replay: save_item.id().clone(),
            pause: pause_item.id().clone(),
            settings: settings_item.id().clone(),
            quit: quit_item.id().clone(),
        };

        menu.append_items(&[
            &toggle_item,
            &save_item,
            &pause_item,
            &PredefinedMenuItem::separator(),
            &settings_item,
            &PredefinedMenuItem::separator(),
            &quit_item,
        ])
        .map_err(|e| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(tooltip(state.status()))
            .with_menu(Box::new(menu))
            .with_icon(Self::load_icon(state)?)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            toggle_item,
            save_item,
            pause_item,
            ids,
            state,
        })
    }

    /// Update icon, tooltip and menu items for a new state.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        self.tray_icon
            .set_icon(Some(Self::load_icon(state)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.toggle_item.set_text(state.toggle_label());
        self.save_item.set_enabled(state.can_save_replay());
        self.pause_item.set_text(state.pause_label());
        self.pause_item.set_enabled(state.can_pause());

        self.state = state;
        self.set_tooltip(state.status())
    }

    /// Show a transient status until [`Self::restore_status`].
    #[track_caller]
    pub fn show_status(&mut self, status: &str) -> AppResult<()> {
        debug!(status, "Tray status");
        self.set_tooltip(status)
    }

    /// Put the tooltip back to the current state's status.
    #[track_caller]
    pub fn restore_status(&mut self) -> AppResult<()> {
        self.set_tooltip(self.state.status())
    }

    /// Menu item ids.
    pub fn menu_ids(&self) -> &TrayMenuIds {
        &self.ids
    }

    #[track_caller]
    fn set_tooltip(&self, status: &str) -> AppResult<()> {
        self.tray_icon
            .set_tooltip(Some(tooltip(status)))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        Icon::from_rgba(render_icon(state.color(), ICON_SIZE), ICON_SIZE, ICON_SIZE).map_err(
            |e| AppError::TrayError {
                reason: format!("Failed to create icon from RGBA: {}", e),
                location: ErrorLocation::from(Location::caller()),
            },
        )
    }
}

fn tooltip(status: &str) -> String {
    format!("{} - {}", TOOLTIP_PREFIX, status)
}

/// A filled circle of `color` on a transparent `size`x`size` RGBA canvas.
pub(crate) fn render_icon(color: [u8; 3], size: u32) -> Vec<u8> {
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;

    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let alpha = if dx * dx + dy * dy <= radius * radius {
                255
            } else {
                0
            };
            rgba.extend_from_slice(&[color[0], color[1], color[2], alpha]);
        }
    }
    rgba
}

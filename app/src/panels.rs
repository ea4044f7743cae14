use std::time::Duration;

use rusty_ui::{OpenParams, Panel, PanelError, UiConfig, UiFrame, Update};

#[derive(UiConfig, Default)]
#[ui(asset = "menu/main", layer = 0)]
pub struct MainMenu {
    pub visits: u32,
}

impl Panel for MainMenu {
    fn on_show(&mut self) {
        self.visits += 1;
        log::info!("main menu shown ({} times)", self.visits);
    }
}

#[derive(UiConfig, Default)]
#[ui(asset = "menu/settings", layer = 0)]
pub struct Settings {
    volume: u8,
}

impl Panel for Settings {
    fn on_open(&mut self, params: &OpenParams) {
        if let Some(volume) = params.get::<u8>(0) {
            self.volume = *volume;
        }
        log::info!("settings opened at volume {}", self.volume);
    }

    fn on_close(&mut self) {
        log::info!("settings closed at volume {}", self.volume);
    }
}

/// Status bar that pops a toast every `interval` of shown time.
#[derive(UiConfig)]
#[ui(asset = "hud/status", layer = 1)]
pub struct StatusBar {
    interval: Duration,
    elapsed: Duration,
    toasts: u32,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            elapsed: Duration::ZERO,
            toasts: 0,
        }
    }
}

impl Panel for StatusBar {
    fn as_update(&mut self) -> Option<&mut dyn Update> {
        Some(self)
    }
}

impl Update for StatusBar {
    fn on_update(&mut self, frame: &mut UiFrame<'_>) -> Result<(), PanelError> {
        self.elapsed += frame.delta();
        if self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.toasts += 1;
            let message = format!("toast #{}", self.toasts);
            frame.navigator().open::<Toast>(OpenParams::new().with(message));
        }
        Ok(())
    }
}

/// Dismisses itself after `ttl`.
#[derive(UiConfig)]
#[ui(asset = "hud/toast", layer = 2)]
pub struct Toast {
    message: String,
    ttl: Duration,
    shown: Duration,
}

impl Default for Toast {
    fn default() -> Self {
        Self {
            message: String::new(),
            ttl: Duration::from_millis(200),
            shown: Duration::ZERO,
        }
    }
}

impl Panel for Toast {
    fn on_open(&mut self, params: &OpenParams) {
        if let Some(message) = params.get::<String>(0) {
            self.message.clone_from(message);
        }
        self.shown = Duration::ZERO;
    }

    fn on_show(&mut self) {
        log::info!("toast: {}", self.message);
    }

    fn as_update(&mut self) -> Option<&mut dyn Update> {
        Some(self)
    }
}

impl Update for Toast {
    fn on_update(&mut self, frame: &mut UiFrame<'_>) -> Result<(), PanelError> {
        self.shown += frame.delta();
        if self.shown >= self.ttl {
            frame.navigator().close(frame.key());
        }
        Ok(())
    }
}

use std::collections::HashSet;
use std::sync::mpsc;

use awm_config::Config;

use crate::input::{BindTable, InteractiveGrab};
use crate::layout::Layout;
use crate::platform::{OutputEvent, OutputId, PlatformEvent, SurfacePlatform};
use crate::utils::spawning::CHILD_ENV;
use crate::utils::{sh_command, Point};
use crate::window::{WindowId, Windows};

/// The window manager: every piece of core state, driven one platform event at a time.
pub struct State<P> {
    pub platform: P,
    pub windows: Windows,
    pub layout: Layout,
    pub grab: InteractiveGrab,

    pub config: Config,
    pub binds: BindTable,
    /// Keycodes whose press was consumed by a shortcut, so their release is consumed too.
    pub suppressed_keys: HashSet<u32>,
    pub pointer_location: Point<f64>,

    config_updates: Option<mpsc::Receiver<Config>>,
    pub stopped: bool,
}

impl<P: SurfacePlatform> State<P> {
    pub fn new(config: Config, platform: P) -> Self {
        let _span = tracy_client::span!("State::new");

        let layout = Layout::new(usize::from(config.layout.workspaces_per_output));
        let binds = BindTable::from_config(&config);
        *CHILD_ENV.write().unwrap() = config.environment.clone();

        Self {
            platform,
            windows: Windows::new(),
            layout,
            grab: InteractiveGrab::Idle,
            config,
            binds,
            suppressed_keys: HashSet::new(),
            pointer_location: Point::default(),
            config_updates: None,
            stopped: false,
        }
    }

    /// Runs the startup commands.
    pub fn start(&mut self) {
        for command in &self.config.spawn_sh_at_startup {
            info!("running startup command: {}", command.command);
            self.platform.spawn(sh_command(&command.command));
        }
    }

    /// Applies configs sent from a [`Watcher`](crate::utils::watcher::Watcher) before each event.
    pub fn set_config_updates(&mut self, updates: mpsc::Receiver<Config>) {
        self.config_updates = Some(updates);
    }

    pub fn handle_event(&mut self, event: PlatformEvent) {
        let _span = tracy_client::span!("State::handle_event");

        if self.stopped {
            trace!("ignoring {event:?} after quitting");
            return;
        }

        self.apply_config_updates();

        match event {
            PlatformEvent::Window(event) => self.on_window(event),
            PlatformEvent::Pointer(event) => self.on_pointer(event),
            PlatformEvent::Key(event) => self.on_keyboard(event),
            PlatformEvent::Output(event) => self.on_output(event),
        }

        self.refresh_grab();
    }

    /// Replaces the config. Outputs keep their workspaces; the new count applies to outputs
    /// connected later.
    pub fn reload_config(&mut self, config: Config) {
        let _span = tracy_client::span!("State::reload_config");

        self.binds = BindTable::from_config(&config);
        self.layout
            .set_workspaces_per_output(usize::from(config.layout.workspaces_per_output));
        *CHILD_ENV.write().unwrap() = config.environment.clone();
        self.config = config;

        info!("applied new config");
    }

    /// Runs the exit commands and stops the session.
    pub fn quit(&mut self) {
        if self.stopped {
            return;
        }

        for command in &self.config.spawn_sh_at_exit {
            info!("running exit command: {}", command.command);
            self.platform.spawn(sh_command(&command.command));
        }

        self.stopped = true;
        self.grab.reset();
        self.platform.terminate();
    }

    /// The output under the pointer.
    pub fn focused_output(&self) -> Option<OutputId> {
        self.platform
            .output_at(self.pointer_location)
            .filter(|id| self.layout.output(*id).is_some())
    }

    /// Activates the window within its workspace and gives it keyboard focus.
    pub fn focus_window(&mut self, window: WindowId) {
        match self.layout.workspace_for_window_mut(window) {
            Some(ws) => {
                ws.activate_window(window, &mut self.windows, &mut self.platform);
            }
            None => self.windows.focus(window, &mut self.platform),
        }
    }

    pub fn min_window_size(&self) -> i32 {
        i32::from(self.config.layout.min_window_size).max(1)
    }

    fn apply_config_updates(&mut self) {
        let Some(updates) = &self.config_updates else {
            return;
        };

        // Only the newest config matters.
        let mut newest = None;
        loop {
            match updates.try_recv() {
                Ok(config) => newest = Some(config),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    debug!("config watcher went away");
                    self.config_updates = None;
                    break;
                }
            }
        }

        if let Some(config) = newest {
            self.reload_config(config);
        }
    }

    fn on_output(&mut self, event: OutputEvent) {
        match event {
            OutputEvent::Added {
                output,
                usable_area,
            } => {
                self.layout
                    .add_output(output, usable_area, &mut self.windows, &mut self.platform);
            }
            OutputEvent::Removed { output } => {
                let orphans =
                    self.layout
                        .remove_output(output, &mut self.windows, &mut self.platform);

                for window in orphans {
                    debug!("destroying {window:?}: no output left to show it");
                    self.grab.window_gone(window);
                    self.windows.unfocus(window, &mut self.platform);
                    self.platform.set_window_visible(window, false);
                    self.windows.remove(window);
                }
            }
            OutputEvent::UsableAreaChanged {
                output,
                usable_area,
            } => {
                let Some(old_area) = self.layout.output(output).map(|o| o.usable_area()) else {
                    warn!("usable area changed on unknown {output:?}");
                    return;
                };
                self.layout.set_usable_area(output, usable_area);

                // Windows maximized to this output keep filling it.
                let mut refit: Vec<_> = self
                    .windows
                    .iter()
                    .filter(|w| w.is_maximized() && w.geometry == old_area)
                    .map(|w| w.id)
                    .collect();
                refit.sort_unstable();

                for window in refit {
                    self.windows.set_geometry(window, usable_area, &mut self.platform);
                }
            }
        }
    }

    /// Ends a grab whose window can no longer be interacted with.
    fn refresh_grab(&mut self) {
        let Some(window) = self.grab.window() else {
            return;
        };

        let visible = self.windows.get(window).is_some_and(|w| w.is_visible());
        if !visible || self.windows.focused() != Some(window) {
            debug!("ending interactive grab: {window:?} lost focus");
            self.grab.reset();
        }
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        self.layout.verify_invariants(&self.windows);

        if let Some(window) = self.grab.window() {
            let record = self
                .windows
                .get(window)
                .expect("grabbed window must exist");
            assert!(record.is_visible(), "grabbed window must be visible");
            assert_eq!(self.windows.focused(), Some(window));
        }
    }
}

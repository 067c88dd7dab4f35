//! Event loop: terminal input, MIDI draining, timers and redraws.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chordshark_core::config::Config;
use chordshark_core::midi::{MidiInputManager, MidiPortInfo};
use chordshark_core::prefs::{FilePreferenceStore, Preferences};

use crate::render::{self, DeviceView};
use crate::trainer::Trainer;
use crate::ui::{AppEvent, InputEvent, InputSource, KeyCode, RatatuiBackend};

/// Upper bound on one input wait so the MIDI channel is drained promptly.
const MAX_POLL: Duration = Duration::from_millis(16);

/// Which port to open at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupPort {
    Connect(usize),
    /// The stored device is gone; forget it and open this port instead.
    ForgetAndConnect(usize),
    /// The stored device is gone; forget it and stay disconnected.
    ForgetStored,
    None,
}

/// The stored device wins; otherwise the first port when auto-connect is on.
pub fn startup_port(ports: &[MidiPortInfo], stored: Option<&str>, auto_connect: bool) -> StartupPort {
    if let Some(name) = stored {
        return match ports.iter().find(|p| p.name == name) {
            Some(p) => StartupPort::Connect(p.index),
            None if auto_connect && !ports.is_empty() => StartupPort::ForgetAndConnect(ports[0].index),
            None => StartupPort::ForgetStored,
        };
    }
    match ports.first() {
        Some(p) if auto_connect => StartupPort::Connect(p.index),
        _ => StartupPort::None,
    }
}

/// Port after `current` in list order, wrapping.
pub fn next_port(ports: &[MidiPortInfo], current: Option<usize>) -> Option<usize> {
    if ports.is_empty() {
        return None;
    }
    let pos = current
        .and_then(|idx| ports.iter().position(|p| p.index == idx))
        .map(|pos| (pos + 1) % ports.len())
        .unwrap_or(0);
    Some(ports[pos].index)
}

/// Returns true when the key means quit.
fn is_quit(event: &InputEvent) -> bool {
    match event.key {
        KeyCode::Char('q') | KeyCode::Escape => true,
        KeyCode::Char('c') => event.modifiers.ctrl,
        _ => false,
    }
}

pub struct AppRuntime {
    trainer: Trainer<FilePreferenceStore>,
    midi_input: MidiInputManager,
    device_status: Option<String>,
    lamp_lit: bool,
    render_needed: bool,
}

impl AppRuntime {
    pub fn new() -> Self {
        let config = Config::load();
        let prefs = Preferences::new(FilePreferenceStore::load_default(), config.default_key());
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed);
        let trainer = Trainer::new(&config, prefs, seed);

        let mut runtime = Self {
            trainer,
            midi_input: MidiInputManager::new(),
            device_status: None,
            lamp_lit: false,
            render_needed: true,
        };
        runtime.connect_startup_device(config.midi_auto_connect());
        runtime
    }

    fn connect_startup_device(&mut self, auto_connect: bool) {
        self.midi_input.refresh_ports();
        let stored = self.trainer.prefs().midi_input();
        match startup_port(self.midi_input.list_ports(), stored.as_deref(), auto_connect) {
            StartupPort::Connect(index) => self.connect(index, Instant::now()),
            StartupPort::ForgetAndConnect(index) => {
                self.forget_stored_device(stored.as_deref());
                self.connect(index, Instant::now());
            }
            StartupPort::ForgetStored => self.forget_stored_device(stored.as_deref()),
            StartupPort::None => {}
        }
    }

    fn forget_stored_device(&mut self, name: Option<&str>) {
        log::info!(target: "midi", "stored device '{}' not present", name.unwrap_or_default());
        self.trainer.prefs_mut().clear_midi_input();
    }

    fn connect(&mut self, index: usize, now: Instant) {
        self.trainer.clear_held(now);
        match self.midi_input.connect(index) {
            Ok(()) => {
                self.device_status = None;
                let name = self.midi_input.connected_port_name().map(str::to_string);
                self.trainer.prefs_mut().set_midi_input(name.as_deref());
            }
            Err(e) => {
                log::warn!(target: "midi", "connect failed: {}", e);
                self.device_status = Some(format!("Could not connect: {}", e));
            }
        }
    }

    fn cycle_device(&mut self, now: Instant) {
        self.midi_input.refresh_ports();
        let current = self.midi_input.connected_port_index();
        match next_port(self.midi_input.list_ports(), current) {
            Some(index) => self.connect(index, now),
            None => {
                self.midi_input.disconnect();
                self.trainer.clear_held(now);
                self.device_status = None;
            }
        }
    }

    fn device_view(&self) -> DeviceView {
        DeviceView {
            available: self.midi_input.is_available(),
            connected: self.midi_input.connected_port_name().map(str::to_string),
            port_count: self.midi_input.list_ports().len(),
            status: self.device_status.clone(),
        }
    }

    /// Returns true to quit.
    fn handle_key(&mut self, event: &InputEvent, now: Instant) -> bool {
        if is_quit(event) {
            return true;
        }
        // only tonic stepping auto-repeats
        if event.is_repeat && !matches!(event.key, KeyCode::Left | KeyCode::Right) {
            return false;
        }
        match event.key {
            KeyCode::Left => self.trainer.shift_tonic(-1, now),
            KeyCode::Right => self.trainer.shift_tonic(1, now),
            KeyCode::Char('m') => self.trainer.toggle_mode(now),
            KeyCode::Char('d') => self.cycle_device(now),
            KeyCode::Char('t') => self.trainer.toggle_practice(now),
            KeyCode::Char('f') => self.trainer.cycle_filter(),
            _ => return false,
        }
        self.render_needed = true;
        false
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        self.trainer
            .next_deadline(now)
            .map(|at| at.saturating_duration_since(now))
            .unwrap_or(MAX_POLL)
            .min(MAX_POLL)
    }

    fn process_tick(&mut self) {
        let now = Instant::now();
        let events = self.midi_input.poll_events();
        if !events.is_empty() {
            self.trainer.apply_midi(&events, now);
            self.render_needed = true;
        }
        if self.trainer.poll(now) {
            self.render_needed = true;
        }
        let lit = self.trainer.held().recent_activity(now);
        if lit != self.lamp_lit {
            self.lamp_lit = lit;
            self.render_needed = true;
        }
    }

    /// Main event loop.
    pub fn run(&mut self, backend: &mut RatatuiBackend) -> std::io::Result<()> {
        let mut result = Ok(());
        loop {
            let timeout = self.poll_timeout(Instant::now());
            match backend.poll_event(timeout) {
                Some(AppEvent::Key(event)) => {
                    if self.handle_key(&event, Instant::now()) {
                        break;
                    }
                }
                Some(AppEvent::Resize(_, _)) => self.render_needed = true,
                None => {}
            }

            self.process_tick();

            if self.render_needed {
                let device = self.device_view();
                let trainer = &self.trainer;
                let now = Instant::now();
                if let Err(e) = backend.draw(|f| render::draw(f, trainer, &device, now)) {
                    log::error!("draw failed: {}", e);
                    result = Err(e);
                    break;
                }
                self.render_needed = false;
            }
        }
        self.shutdown();
        result
    }

    pub fn shutdown(&mut self) {
        self.trainer.shutdown();
        self.midi_input.disconnect();
        log::info!("shutdown");
    }
}

/// Public entry point.
pub fn run(backend: &mut RatatuiBackend) -> std::io::Result<()> {
    let mut runtime = AppRuntime::new();
    runtime.run(backend)
}

/// `--list-ports`: print input ports and exit.
pub fn list_ports() {
    let mut midi_input = MidiInputManager::new();
    if !midi_input.is_available() {
        eprintln!("MIDI input is not available on this system");
        return;
    }
    midi_input.refresh_ports();
    let ports = midi_input.list_ports();
    if ports.is_empty() {
        println!("No MIDI input ports found");
    }
    for port in ports {
        println!("{}: {}", port.index, port.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Modifiers;

    fn ports(names: &[&str]) -> Vec<MidiPortInfo> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| MidiPortInfo {
                index,
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn startup_prefers_stored_device() {
        let p = ports(&["Midi Through", "Keystation"]);
        assert_eq!(startup_port(&p, Some("Keystation"), true), StartupPort::Connect(1));
        assert_eq!(startup_port(&p, Some("Keystation"), false), StartupPort::Connect(1));
    }

    #[test]
    fn startup_falls_back_to_first_port() {
        let p = ports(&["Midi Through", "Keystation"]);
        assert_eq!(startup_port(&p, None, true), StartupPort::Connect(0));
        assert_eq!(startup_port(&p, None, false), StartupPort::None);
    }

    #[test]
    fn startup_forgets_vanished_device() {
        let p = ports(&["Midi Through", "Keystation"]);
        assert_eq!(startup_port(&p, Some("Gone"), true), StartupPort::ForgetAndConnect(0));
        assert_eq!(startup_port(&[], Some("Gone"), true), StartupPort::ForgetStored);
        let p = ports(&["Midi Through"]);
        assert_eq!(startup_port(&p, Some("Gone"), false), StartupPort::ForgetStored);
        assert_eq!(startup_port(&p, Some("Midi Through"), false), StartupPort::Connect(0));
        assert_eq!(startup_port(&[], None, true), StartupPort::None);
    }

    #[test]
    fn next_port_wraps() {
        let p = ports(&["a", "b", "c"]);
        assert_eq!(next_port(&p, None), Some(0));
        assert_eq!(next_port(&p, Some(0)), Some(1));
        assert_eq!(next_port(&p, Some(2)), Some(0));
        assert_eq!(next_port(&p, Some(9)), Some(0));
        assert_eq!(next_port(&[], Some(0)), None);
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit(&InputEvent::new(KeyCode::Char('q'))));
        assert!(is_quit(&InputEvent::new(KeyCode::Escape)));
        assert!(!is_quit(&InputEvent::new(KeyCode::Char('c'))));
        let ctrl_c = InputEvent {
            key: KeyCode::Char('c'),
            modifiers: Modifiers { ctrl: true },
            is_repeat: false,
        };
        assert!(is_quit(&ctrl_c));
    }
}

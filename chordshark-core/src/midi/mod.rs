use midir::{MidiInput, MidiInputConnection};
use std::sync::mpsc::{self, Receiver};

const CLIENT_NAME: &str = "chordshark";

/// Controller number for "All Notes Off".
const CC_ALL_NOTES_OFF: u8 = 123;

/// A note event from the input device, with the driver timestamp in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    pub timestamp_us: u64,
    pub kind: MidiEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEventKind {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    AllNotesOff { channel: u8 },
}

impl MidiEvent {
    pub fn new(timestamp_us: u64, kind: MidiEventKind) -> Self {
        Self { timestamp_us, kind }
    }
}

/// Information about an available MIDI port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

/// MIDI input manager
pub struct MidiInputManager {
    midi_in: Option<MidiInput>,
    connection: Option<MidiInputConnection<()>>,
    event_receiver: Option<Receiver<MidiEvent>>,
    connected_port_name: Option<String>,
    available_ports: Vec<MidiPortInfo>,
}

impl MidiInputManager {
    pub fn new() -> Self {
        let midi_in = match MidiInput::new(CLIENT_NAME) {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!(target: "midi", "MIDI input unavailable: {}", e);
                None
            }
        };
        Self {
            midi_in,
            connection: None,
            event_receiver: None,
            connected_port_name: None,
            available_ports: Vec::new(),
        }
    }

    /// Whether the platform MIDI backend could be opened at all.
    pub fn is_available(&self) -> bool {
        self.midi_in.is_some()
    }

    /// Refresh the list of available MIDI input ports
    pub fn refresh_ports(&mut self) {
        self.available_ports.clear();

        if let Some(ref midi_in) = self.midi_in {
            let ports = midi_in.ports();
            for (index, port) in ports.iter().enumerate() {
                if let Ok(name) = midi_in.port_name(port) {
                    self.available_ports.push(MidiPortInfo { index, name });
                }
            }
        }
        log::debug!(target: "midi", "{} input port(s) available", self.available_ports.len());
    }

    pub fn list_ports(&self) -> &[MidiPortInfo] {
        &self.available_ports
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    /// Index of the connected port within the last refreshed port list.
    pub fn connected_port_index(&self) -> Option<usize> {
        let name = self.connected_port_name.as_deref()?;
        self.available_ports
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.index)
    }

    /// Connect to a MIDI input port by index
    pub fn connect(&mut self, port_index: usize) -> Result<(), String> {
        self.disconnect();

        // midir consumes the MidiInput on connect, so open a fresh one.
        let midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| e.to_string())?;
        let ports = midi_in.ports();

        let port = ports
            .get(port_index)
            .ok_or_else(|| format!("Invalid port index: {}", port_index))?;
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let (tx, rx) = mpsc::channel();
        self.event_receiver = Some(rx);

        let connection = midi_in
            .connect(
                port,
                "chordshark-input",
                move |timestamp, message, _| {
                    if let Some(kind) = parse_midi_message(message) {
                        let _ = tx.send(MidiEvent::new(timestamp, kind));
                    }
                },
                (),
            )
            .map_err(|e| e.to_string())?;

        log::info!(target: "midi", "connected to '{}'", port_name);
        self.connection = Some(connection);
        self.connected_port_name = Some(port_name);

        self.midi_in = MidiInput::new(CLIENT_NAME).ok();

        Ok(())
    }

    /// Connect to the port with the given name, as stored in preferences.
    pub fn connect_by_name(&mut self, name: &str) -> Result<(), String> {
        self.refresh_ports();
        let index = self
            .available_ports
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.index)
            .ok_or_else(|| format!("MIDI port not found: {}", name))?;
        self.connect(index)
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
            log::info!(target: "midi", "disconnected");
        }
        self.event_receiver = None;
        self.connected_port_name = None;
    }

    /// Drain pending MIDI events (non-blocking)
    pub fn poll_events(&self) -> Vec<MidiEvent> {
        let mut events = Vec::new();
        if let Some(ref rx) = self.event_receiver {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        events
    }
}

impl Default for MidiInputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiInputManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Parse a raw MIDI message. Only note traffic is kept.
pub fn parse_midi_message(data: &[u8]) -> Option<MidiEventKind> {
    let (&status, rest) = data.split_first()?;
    let channel = status & 0x0F;

    match (status & 0xF0, rest) {
        (0x80, [note, _, ..]) => Some(MidiEventKind::NoteOff {
            channel,
            note: *note,
        }),
        // Note On with velocity 0 is a Note Off
        (0x90, [note, 0, ..]) => Some(MidiEventKind::NoteOff {
            channel,
            note: *note,
        }),
        (0x90, [note, velocity, ..]) => Some(MidiEventKind::NoteOn {
            channel,
            note: *note,
            velocity: *velocity,
        }),
        (0xB0, [CC_ALL_NOTES_OFF, _, ..]) => Some(MidiEventKind::AllNotesOff { channel }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_on() {
        let event = parse_midi_message(&[0x90, 60, 100]);
        assert_eq!(
            event,
            Some(MidiEventKind::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100
            })
        );
    }

    #[test]
    fn test_parse_note_on_channel() {
        let event = parse_midi_message(&[0x93, 64, 1]);
        assert_eq!(
            event,
            Some(MidiEventKind::NoteOn {
                channel: 3,
                note: 64,
                velocity: 1
            })
        );
    }

    #[test]
    fn test_parse_note_off() {
        let event = parse_midi_message(&[0x80, 60, 0]);
        assert_eq!(event, Some(MidiEventKind::NoteOff { channel: 0, note: 60 }));
    }

    #[test]
    fn test_parse_note_on_velocity_zero() {
        let event = parse_midi_message(&[0x90, 60, 0]);
        assert!(matches!(event, Some(MidiEventKind::NoteOff { note: 60, .. })));
    }

    #[test]
    fn test_parse_all_notes_off() {
        let event = parse_midi_message(&[0xB2, 123, 0]);
        assert_eq!(event, Some(MidiEventKind::AllNotesOff { channel: 2 }));
    }

    #[test]
    fn test_other_controllers_ignored() {
        assert!(parse_midi_message(&[0xB0, 64, 127]).is_none());
        assert!(parse_midi_message(&[0xE0, 0x00, 0x40]).is_none());
        assert!(parse_midi_message(&[0xC0, 5]).is_none());
    }

    #[test]
    fn test_parse_empty_message_returns_none() {
        assert!(parse_midi_message(&[]).is_none());
    }

    #[test]
    fn test_parse_short_messages_return_none() {
        assert!(parse_midi_message(&[0x90, 60]).is_none());
        assert!(parse_midi_message(&[0x80]).is_none());
        assert!(parse_midi_message(&[0xB0, 123]).is_none());
    }

    #[test]
    fn test_parse_unknown_status_returns_none() {
        assert!(parse_midi_message(&[0x00]).is_none());
        assert!(parse_midi_message(&[0xF0, 0x01, 0x02]).is_none());
    }
}

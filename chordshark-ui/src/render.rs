use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chordshark_core::prefs::PreferenceStore;
use chordshark_core::recognition::RecognitionState;
use chordshark_types::{note_name_with_octave, pitch_class_names};

use crate::trainer::Trainer;
use crate::ui::{Color, Style};

const MISMATCH_TEXT: &str = "Not a diatonic triad or 7th in this key";
/// Keyboard strip range, C3 through B5.
const PIANO_LOW: u8 = 48;
const PIANO_HIGH: u8 = 83;
const KEY_GLYPH: &str = "██";
const KEY_GAP: &str = "  ";
const HELP_TEXT: &str = "←/→ key  m mode  d device  t practice  f filter  q quit";

/// What the device line shows.
#[derive(Debug, Clone, Default)]
pub struct DeviceView {
    pub available: bool,
    pub connected: Option<String>,
    pub port_count: usize,
    pub status: Option<String>,
}

pub fn draw<S: PreferenceStore>(
    frame: &mut Frame,
    trainer: &Trainer<S>,
    device: &DeviceView,
    now: Instant,
) {
    let [key_area, recognition_area, held_area, practice_area, device_area, help_area] =
        Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(5),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    render_key(frame, key_area, trainer);
    render_recognition(frame, recognition_area, trainer);
    render_held(frame, held_area, trainer);
    render_practice(frame, practice_area, trainer);
    render_device(frame, device_area, trainer, device, now);

    let help = Paragraph::new(HELP_TEXT).style(Style::new().fg(Color::DARK_GRAY));
    frame.render_widget(help, help_area);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::GRAY))
        .title(Span::styled(format!(" {} ", title), Style::new().fg(Color::CYAN).bold()))
}

fn render_key<S: PreferenceStore>(frame: &mut Frame, area: Rect, trainer: &Trainer<S>) {
    let key = trainer.key();
    let line = Line::from(vec![
        Span::raw("Key: "),
        Span::styled(key.name(), Style::new().fg(Color::GOLD).bold()),
    ]);
    frame.render_widget(Paragraph::new(line).block(panel("chordshark")), area);
}

fn render_recognition<S: PreferenceStore>(frame: &mut Frame, area: Rect, trainer: &Trainer<S>) {
    let engine = trainer.engine();
    let spelling = trainer.key().spelling();

    let lines: Vec<Line> = match engine.state() {
        RecognitionState::Idle => vec![Line::styled(
            "Play a chord",
            Style::new().fg(Color::GRAY),
        )],
        RecognitionState::Listening => vec![Line::styled(
            "Listening...",
            Style::new().fg(Color::LISTENING),
        )],
        RecognitionState::Mismatch => vec![Line::styled(
            MISMATCH_TEXT,
            Style::new().fg(Color::MISMATCH).bold(),
        )],
        RecognitionState::Success => match &engine.result().chord {
            Some(chord) => {
                let mut detail = format!("{}  {}", chord.degree, chord.chord_type.name());
                if let Some(label) = engine.result().inversion_label() {
                    detail.push_str("  ");
                    detail.push_str(label);
                }
                vec![
                    Line::styled(
                        chord.display_name(spelling),
                        Style::new().fg(Color::SUCCESS).bold(),
                    ),
                    Line::from(detail),
                ]
            }
            None => Vec::new(),
        },
    };

    let title = format!("Chord ({})", engine.state().name());
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(panel(&title));
    frame.render_widget(paragraph, area);
}

fn is_black_key(note: u8) -> bool {
    matches!(note % 12, 1 | 3 | 6 | 8 | 10)
}

/// One key of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyCell {
    black: bool,
    held: bool,
}

/// Keys from `PIANO_LOW` to `PIANO_HIGH` in order, flagged when held. Notes outside the range are ignored.
fn key_cells(held: &[u8]) -> Vec<KeyCell> {
    (PIANO_LOW..=PIANO_HIGH)
        .map(|note| KeyCell {
            black: is_black_key(note),
            held: held.contains(&note),
        })
        .collect()
}

/// Two rows: black keys above, white keys below.
fn piano_lines(held: &[u8]) -> [Line<'static>; 2] {
    let cells = key_cells(held);
    let row = |black: bool| -> Line<'static> {
        let spans: Vec<Span> = cells
            .iter()
            .map(|cell| {
                if cell.black != black {
                    return Span::raw(KEY_GAP);
                }
                let color = match (cell.held, cell.black) {
                    (true, _) => Color::MIDI_COLOR,
                    (false, true) => Color::DARK_GRAY,
                    (false, false) => Color::WHITE,
                };
                Span::styled(KEY_GLYPH, Style::new().fg(color))
            })
            .collect();
        Line::from(spans)
    };
    [row(true), row(false)]
}

fn render_held<S: PreferenceStore>(frame: &mut Frame, area: Rect, trainer: &Trainer<S>) {
    let spelling = trainer.key().spelling();
    let held = trainer.held();
    let text = if held.is_empty() {
        "-".to_string()
    } else {
        let notes: Vec<String> = held
            .notes()
            .iter()
            .map(|&n| note_name_with_octave(n as i32, spelling))
            .collect();
        format!(
            "{}   [{}]",
            notes.join(" "),
            pitch_class_names(&held.pitch_classes(), spelling).join(" ")
        )
    };
    let [black_row, white_row] = piano_lines(&held.notes());
    let lines = vec![Line::from(text), black_row, white_row];
    frame.render_widget(Paragraph::new(lines).block(panel("Held")), area);
}

fn render_practice<S: PreferenceStore>(frame: &mut Frame, area: Rect, trainer: &Trainer<S>) {
    let practice = trainer.practice();
    let spelling = trainer.key().spelling();

    let lines = match practice.target() {
        Some(target) if practice.is_active() => {
            let mut lines = vec![Line::from(vec![
                Span::raw("Play: "),
                Span::styled(target.display_name(spelling), Style::new().fg(Color::GOLD).bold()),
                Span::raw(format!("  ({} {})", target.degree, target.chord_type.name())),
            ])];
            if practice.is_correct() {
                lines.push(Line::styled("Correct!", Style::new().fg(Color::SUCCESS).bold()));
            }
            lines
        }
        _ => vec![Line::styled(
            "Press t to start",
            Style::new().fg(Color::GRAY),
        )],
    };

    let title = format!("Practice [{}]", practice.filter().name());
    frame.render_widget(Paragraph::new(lines).block(panel(&title)), area);
}

fn render_device<S: PreferenceStore>(
    frame: &mut Frame,
    area: Rect,
    trainer: &Trainer<S>,
    device: &DeviceView,
    now: Instant,
) {
    let lamp = if trainer.held().recent_activity(now) {
        Span::styled("● ", Style::new().fg(Color::MIDI_COLOR))
    } else {
        Span::styled("○ ", Style::new().fg(Color::DARK_GRAY))
    };

    let text = match (&device.status, &device.connected) {
        (Some(status), _) => status.clone(),
        (None, _) if !device.available => "MIDI unavailable".to_string(),
        (None, Some(name)) => format!("{} ({} port(s))", name, device.port_count),
        (None, None) if device.port_count == 0 => "No MIDI inputs found".to_string(),
        (None, None) => "Not connected, press d to pick a device".to_string(),
    };

    let line = Line::from(vec![lamp, Span::raw(text)]);
    frame.render_widget(Paragraph::new(line).block(panel("MIDI")), area);
}

//! Practice mode: prompt a random diatonic chord and wait for the player to
//! hit it.

use std::time::{Duration, Instant};

use chordshark_types::{ChordId, ChordType, DiatonicChord};

use crate::timer::Deadline;

pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(1500);

/// Which chords a practice round draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChordFilter {
    Triad,
    Seventh,
    #[default]
    All,
}

impl ChordFilter {
    pub const ALL: [ChordFilter; 3] = [ChordFilter::Triad, ChordFilter::Seventh, ChordFilter::All];

    pub fn name(&self) -> &'static str {
        match self {
            ChordFilter::Triad => "triad",
            ChordFilter::Seventh => "7th",
            ChordFilter::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<ChordFilter> {
        match s.trim().to_lowercase().as_str() {
            "triad" | "triads" => Some(ChordFilter::Triad),
            "seventh" | "sevenths" | "7th" => Some(ChordFilter::Seventh),
            "all" => Some(ChordFilter::All),
            _ => None,
        }
    }

    pub fn next(&self) -> ChordFilter {
        match self {
            ChordFilter::Triad => ChordFilter::Seventh,
            ChordFilter::Seventh => ChordFilter::All,
            ChordFilter::All => ChordFilter::Triad,
        }
    }

    pub fn accepts(&self, chord_type: ChordType) -> bool {
        match self {
            ChordFilter::Triad => chord_type == ChordType::Triad,
            ChordFilter::Seventh => chord_type == ChordType::Seventh,
            ChordFilter::All => true,
        }
    }
}

pub fn practice_pool(catalog: &[DiatonicChord], filter: ChordFilter) -> Vec<&DiatonicChord> {
    catalog
        .iter()
        .filter(|c| filter.accepts(c.chord_type))
        .collect()
}

fn next_random(rng: &mut u64) -> u64 {
    *rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    *rng >> 33
}

/// Pick a chord from `pool`, avoiding `exclude` unless it is the only choice.
pub fn pick_target<'a>(
    pool: &[&'a DiatonicChord],
    exclude: Option<ChordId>,
    rng: &mut u64,
) -> Option<&'a DiatonicChord> {
    let candidates: Vec<&'a DiatonicChord> = pool
        .iter()
        .copied()
        .filter(|c| Some(c.id) != exclude)
        .collect();
    let candidates = if candidates.is_empty() {
        pool.to_vec()
    } else {
        candidates
    };
    if candidates.is_empty() {
        return None;
    }
    let index = (next_random(rng) % candidates.len() as u64) as usize;
    Some(candidates[index])
}

/// One practice session: a target chord, a "correct" flash, and the timer
/// that advances to the next target.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    active: bool,
    filter: ChordFilter,
    target: Option<DiatonicChord>,
    correct: bool,
    advance: Deadline,
    advance_delay: Duration,
    rng: u64,
}

impl PracticeSession {
    pub fn new(filter: ChordFilter, advance_delay: Duration, seed: u64) -> Self {
        Self {
            active: false,
            filter,
            target: None,
            correct: false,
            advance: Deadline::new(),
            advance_delay,
            rng: seed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn filter(&self) -> ChordFilter {
        self.filter
    }

    pub fn target(&self) -> Option<&DiatonicChord> {
        self.target.as_ref()
    }

    /// True between a correct answer and the advance to the next target.
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.advance.at()
    }

    /// The filter can only change between sessions.
    pub fn set_filter(&mut self, filter: ChordFilter) {
        if self.active {
            return;
        }
        self.filter = filter;
    }

    /// Start a session. Does nothing if the pool is empty.
    pub fn start(&mut self, catalog: &[DiatonicChord]) {
        self.correct = false;
        self.advance.cancel();
        self.target = self.pick(catalog, None);
        self.active = self.target.is_some();
        if let Some(target) = &self.target {
            log::info!(target: "practice", "started, first target {}", target.id);
        }
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.target = None;
        self.correct = false;
        self.advance.cancel();
        log::info!(target: "practice", "stopped");
    }

    /// Report a recognized chord. Returns true if it was the target.
    pub fn on_recognized(&mut self, chord: ChordId, now: Instant) -> bool {
        if !self.active || self.correct {
            return false;
        }
        let hit = self.target.as_ref().is_some_and(|t| t.id == chord);
        if hit {
            self.correct = true;
            self.advance.schedule(now, self.advance_delay);
            log::debug!(target: "practice", "hit {}", chord);
        }
        hit
    }

    /// Advance to the next target when due. Returns true if the target changed.
    pub fn poll(&mut self, catalog: &[DiatonicChord], now: Instant) -> bool {
        if !self.advance.fire(now) {
            return false;
        }
        let previous = self.target.as_ref().map(|t| t.id);
        self.correct = false;
        self.target = self.pick(catalog, previous);
        if self.target.is_none() {
            self.active = false;
        }
        true
    }

    /// Re-pick the target from a new key's catalog.
    pub fn on_key_changed(&mut self, catalog: &[DiatonicChord]) {
        if self.active {
            self.start(catalog);
        }
    }

    fn pick(&mut self, catalog: &[DiatonicChord], exclude: Option<ChordId>) -> Option<DiatonicChord> {
        let pool = practice_pool(catalog, self.filter);
        pick_target(&pool, exclude, &mut self.rng).cloned()
    }
}

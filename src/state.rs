use serde::{Serialize, Serializer};

/// Night classification carried in each sample row.
///
/// `Unknown` until the first classification completes (which needs at least
/// two stored photos); afterwards mirrors the most recent classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightFlag {
    Unknown,
    Day,
    Night,
}

impl NightFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            NightFlag::Unknown => "unknown",
            NightFlag::Day => "false",
            NightFlag::Night => "true",
        }
    }

    pub fn is_night(&self) -> bool {
        matches!(self, NightFlag::Night)
    }
}

impl From<bool> for NightFlag {
    fn from(night: bool) -> Self {
        if night {
            NightFlag::Night
        } else {
            NightFlag::Day
        }
    }
}

impl Serialize for NightFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Run phases of the loop controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// First cycle only: settle delay before the first capture.
    Warming,
    /// Steady state: one sample per cycle.
    Sampling,
    /// Terminal: elapsed time reached, camera released.
    Finished,
}

/// Mutable per-run state, owned exclusively by the loop controller.
///
/// Threaded through the cycle methods as an explicit value rather than held
/// in globals, so the advance/retreat policy is unit-testable without
/// hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopState {
    /// 1-based cycle counter; advances every cycle, including failed ones.
    pub cycle_index: u32,
    /// 1-based photo slot counter; non-decreasing except for the overwrite
    /// retreat.
    pub photo_index: u32,
    /// Classification computed at the end of the previous cycle.
    pub last_night_flag: NightFlag,
}

impl LoopState {
    pub fn new() -> Self {
        Self {
            cycle_index: 1,
            photo_index: 1,
            last_night_flag: NightFlag::Unknown,
        }
    }

    /// Move to the next photo slot after a capture.
    pub fn advance_photo(&mut self) {
        self.photo_index += 1;
    }

    /// True once two prior slots exist, i.e. classification can run.
    pub fn can_classify(&self) -> bool {
        self.photo_index >= 3
    }

    /// Newest stored slot (the one just captured).
    pub fn newest_slot(&self) -> u32 {
        self.photo_index - 1
    }

    /// Record a fresh classification. On night the photo counter retreats by
    /// one so the next capture overwrites the dark slot instead of
    /// allocating a new one.
    pub fn apply_classification(&mut self, night: bool) {
        self.last_night_flag = NightFlag::from(night);
        if night {
            self.photo_index -= 1;
        }
    }

    /// Close out the cycle.
    pub fn next_cycle(&mut self) {
        self.cycle_index += 1;
    }
}

impl Default for LoopState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_cycle_one_slot_one_unknown() {
        let state = LoopState::new();
        assert_eq!(state.cycle_index, 1);
        assert_eq!(state.photo_index, 1);
        assert_eq!(state.last_night_flag, NightFlag::Unknown);
    }

    #[test]
    fn classification_needs_two_stored_slots() {
        let mut state = LoopState::new();
        assert!(!state.can_classify());
        state.advance_photo(); // slot 1 captured
        assert!(!state.can_classify());
        state.advance_photo(); // slot 2 captured
        assert!(state.can_classify());
        assert_eq!(state.newest_slot(), 2);
    }

    #[test]
    fn day_classification_keeps_advance() {
        let mut state = LoopState::new();
        state.advance_photo();
        state.advance_photo();
        state.apply_classification(false);
        assert_eq!(state.photo_index, 3);
        assert_eq!(state.last_night_flag, NightFlag::Day);
    }

    #[test]
    fn night_classification_cancels_advance() {
        let mut state = LoopState::new();
        state.photo_index = 3;
        state.advance_photo();
        state.apply_classification(true);
        // advance then retreat cancel: net unchanged
        assert_eq!(state.photo_index, 3);
        assert!(state.last_night_flag.is_night());
    }

    #[test]
    fn night_flag_csv_spelling() {
        assert_eq!(NightFlag::Unknown.as_str(), "unknown");
        assert_eq!(NightFlag::Day.as_str(), "false");
        assert_eq!(NightFlag::Night.as_str(), "true");
    }
}

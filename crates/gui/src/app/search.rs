//! Search box debouncing

/// Holds the search text and fires once typing pauses
#[derive(Default)]
pub struct SearchDebounce {
    pub text: String,
    /// Time of the last edit not yet applied
    edited_at: Option<f64>,
}

impl SearchDebounce {
    /// Record an edit of `text` at `now` (seconds)
    pub fn edited(&mut self, now: f64) {
        self.edited_at = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Query to apply, once `debounce_ms` passed since the last edit
    pub fn poll(&mut self, now: f64, debounce_ms: u64) -> Option<String> {
        let edited_at = self.edited_at?;
        if (now - edited_at) * 1000.0 < debounce_ms as f64 {
            return None;
        }
        self.edited_at = None;
        Some(self.text.clone())
    }

    /// Apply immediately (Enter, clear button)
    pub fn flush(&mut self) -> String {
        self.edited_at = None;
        self.text.clone()
    }
}

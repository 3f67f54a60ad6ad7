//! Typewriter reveal of node text, advanced once per frame.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct TypingReveal {
    total_chars: usize,
    revealed: usize,
    ms_per_char: u64,
    carry: Duration,
}

impl TypingReveal {
    pub fn new(text: &str, ms_per_char: u64) -> Self {
        let total_chars = text.chars().count();
        Self {
            total_chars,
            revealed: if ms_per_char == 0 { total_chars } else { 0 },
            ms_per_char,
            carry: Duration::ZERO,
        }
    }

    /// Advance by one frame's worth of time. Returns true once everything
    /// is visible.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.is_complete() {
            return true;
        }
        self.carry += dt;
        let step = u128::from(self.ms_per_char) * 1_000_000;
        let chars = self.carry.as_nanos() / step;
        let leftover = self.carry.as_nanos() % step;
        self.carry = Duration::from_nanos(leftover as u64);
        let chars = usize::try_from(chars).unwrap_or(usize::MAX);
        self.revealed = self.revealed.saturating_add(chars).min(self.total_chars);
        self.is_complete()
    }

    pub fn skip(&mut self) {
        self.revealed = self.total_chars;
        self.carry = Duration::ZERO;
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total_chars
    }

    pub fn revealed_chars(&self) -> usize {
        self.revealed
    }

    /// The visible prefix of `text`, cut on a char boundary
    pub fn visible<'t>(&self, text: &'t str) -> &'t str {
        match text.char_indices().nth(self.revealed) {
            Some((byte, _)) => &text[..byte],
            None => text,
        }
    }
}

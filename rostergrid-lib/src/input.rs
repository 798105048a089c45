//! The filter box and the coercer that keeps it uppercase.

/// Value and selection of a text box.
///
/// Selection offsets count characters, not bytes, and satisfy
/// `selection_start <= selection_end <= char count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    value: String,
    selection_start: usize,
    selection_end: usize,
}

impl FilterInput {
    /// Creates a box holding `value` with the caret at the end.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let end = value.chars().count();
        Self {
            value,
            selection_start: end,
            selection_end: end,
        }
    }

    /// Sets the selection, clamped to the value.
    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        self.set_selection(start, end);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `(start, end)` in characters.
    pub fn selection(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    /// Returns the caret position when nothing is selected.
    pub fn caret(&self) -> Option<usize> {
        (self.selection_start == self.selection_end).then_some(self.selection_start)
    }

    /// Sets the selection, clamped to the value.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.value.chars().count();
        let end = end.min(len);
        self.selection_start = start.min(end);
        self.selection_end = end;
    }

    /// Replaces the value, keeping the selection where it fits.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        let (start, end) = self.selection();
        self.set_selection(start, end);
    }

    /// Types `text` over the selection and leaves the caret after it.
    pub fn insert_str(&mut self, text: &str) {
        let from = self.byte_offset(self.selection_start);
        let to = self.byte_offset(self.selection_end);
        self.value.replace_range(from..to, text);
        let caret = self.selection_start + text.chars().count();
        self.selection_start = caret;
        self.selection_end = caret;
    }

    /// Deletes the selection, or the character before the caret.
    pub fn backspace(&mut self) {
        if self.selection_start == self.selection_end {
            if self.selection_start == 0 {
                return;
            }
            self.selection_start -= 1;
        }
        let from = self.byte_offset(self.selection_start);
        let to = self.byte_offset(self.selection_end);
        self.value.replace_range(from..to, "");
        self.selection_end = self.selection_start;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

/// Forces the filter box to uppercase after every key release.
///
/// The selection survives the rewrite. Uppercasing can change the
/// character count (`ß` becomes `SS`); offsets are clamped to the new
/// length rather than shifted.
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseInputCoercer;

impl UppercaseInputCoercer {
    /// Rewrites the box in place; returns `true` if the value changed.
    pub fn on_key_up(&self, input: &mut FilterInput) -> bool {
        let upper = input.value.to_uppercase();
        if upper == input.value {
            return false;
        }
        let (start, end) = input.selection();
        input.value = upper;
        input.set_selection(start, end);
        true
    }
}

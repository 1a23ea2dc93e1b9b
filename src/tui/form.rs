//! Add-widget form shown from the header.

use crate::store::WidgetStore;
use crate::WidgetKind;

/// Longest title the form accepts, in characters.
pub const MAX_TITLE_LEN: usize = 40;

/// Draft of a new widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddWidgetForm {
    /// Kind to create.
    pub kind: WidgetKind,
    /// Title typed so far.
    pub title: String,
}

impl Default for AddWidgetForm {
    fn default() -> Self {
        Self {
            kind: WidgetKind::Table,
            title: String::new(),
        }
    }
}

impl AddWidgetForm {
    /// Empty form with the table kind selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the next kind, wrapping around.
    pub fn cycle_kind(&mut self) {
        let idx = WidgetKind::ALL
            .iter()
            .position(|k| *k == self.kind)
            .unwrap_or(0);
        self.kind = WidgetKind::ALL[(idx + 1) % WidgetKind::ALL.len()];
    }

    /// Appends a character, ignoring control characters and overflow.
    pub fn push(&mut self, c: char) {
        if !c.is_control() && self.title.chars().count() < MAX_TITLE_LEN {
            self.title.push(c);
        }
    }

    /// Deletes the last character.
    pub fn backspace(&mut self) {
        self.title.pop();
    }

    /// Returns `true` if submitting would create a widget.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Adds the widget to `store`.
    ///
    /// A blank title is rejected and returns `None`; the caller keeps the
    /// form open in that case.
    pub fn submit(&self, store: &mut WidgetStore) -> Option<String> {
        store.add_widget(self.kind, &self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_kind_wraps() {
        let mut form = AddWidgetForm::new();
        form.cycle_kind();
        assert_eq!(form.kind, WidgetKind::Chart);
        form.cycle_kind();
        assert_eq!(form.kind, WidgetKind::Stats);
        form.cycle_kind();
        assert_eq!(form.kind, WidgetKind::Table);
    }

    #[test]
    fn push_skips_control_and_caps_length() {
        let mut form = AddWidgetForm::new();
        form.push('\u{7}');
        assert!(form.title.is_empty());
        for _ in 0..MAX_TITLE_LEN + 5 {
            form.push('x');
        }
        assert_eq!(form.title.chars().count(), MAX_TITLE_LEN);
        form.backspace();
        assert_eq!(form.title.chars().count(), MAX_TITLE_LEN - 1);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut store = WidgetStore::in_memory("tester");
        let before = store.len();
        let mut form = AddWidgetForm::new();
        form.push(' ');
        assert!(!form.is_valid());
        assert_eq!(form.submit(&mut store), None);
        assert_eq!(store.len(), before);
    }

    #[test]
    fn submit_creates_widget_of_selected_kind() {
        let mut store = WidgetStore::in_memory("tester");
        let mut form = AddWidgetForm::new();
        form.cycle_kind();
        "Revenue".chars().for_each(|c| form.push(c));

        let id = form.submit(&mut store).expect("valid form");
        let record = store.get(&id).expect("added");
        assert_eq!(record.kind, WidgetKind::Chart);
        assert_eq!(record.title, "Revenue");
    }
}

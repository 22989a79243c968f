//! Keystroke-driven suggestion dropdown.
//!
//! [`AutocompleteController`] holds the input text, the current suggestion
//! list and the keyboard selection. Every input event returns an
//! [`AutocompleteAction`] telling the caller what, if anything, to do next;
//! the controller itself never performs a lookup.

use std::sync::Arc;

use regex::RegexBuilder;
use tracing::debug;

use crate::{catalog::Catalog, model::City};

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// What the caller should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteAction {
    None,
    /// Look up the weather for this city.
    Lookup(String),
    /// Release input focus.
    ReleaseFocus,
}

/// A piece of a suggestion's name, emphasized when it matches the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionView {
    pub name: Vec<Span>,
    pub country: String,
    pub selected: bool,
}

/// Rendered state of the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropdown {
    Closed,
    NoResults,
    Suggestions(Vec<SuggestionView>),
}

impl Dropdown {
    pub const NO_RESULTS_TEXT: &'static str = "No cities found. Try a different search.";

    pub fn is_open(&self) -> bool {
        !matches!(self, Dropdown::Closed)
    }
}

#[derive(Debug, Clone)]
pub struct AutocompleteController {
    catalog: Arc<Catalog>,
    text: String,
    suggestions: Vec<City>,
    selected: Option<usize>,
    open: bool,
    focused: bool,
}

impl AutocompleteController {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            text: String::new(),
            suggestions: Vec::new(),
            selected: None,
            open: false,
            focused: false,
        }
    }

    /// Raw contents of the input field.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn suggestions(&self) -> &[City] {
        &self.suggestions
    }

    /// `None` when no suggestion is selected.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Replace the input text without refiltering (e.g. a recent-city chip).
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The input text changed.
    pub fn input(&mut self, text: impl Into<String>) -> AutocompleteAction {
        self.text = text.into();
        self.refresh();
        AutocompleteAction::None
    }

    /// The input gained focus.
    pub fn focus(&mut self) -> AutocompleteAction {
        self.focused = true;
        self.refresh();
        AutocompleteAction::None
    }

    /// Focus moved somewhere outside the control.
    pub fn blur_outside(&mut self) -> AutocompleteAction {
        self.focused = false;
        self.close();
        AutocompleteAction::None
    }

    pub fn key(&mut self, key: Key) -> AutocompleteAction {
        match key {
            Key::ArrowDown => {
                if let Some(last) = self.rendered_items().checked_sub(1) {
                    self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
                }
                AutocompleteAction::None
            }
            Key::ArrowUp => {
                if self.rendered_items() > 0 {
                    self.selected = self.selected.and_then(|i| i.checked_sub(1));
                }
                AutocompleteAction::None
            }
            Key::Enter => match self.selected {
                Some(index) => self.commit(index),
                None => AutocompleteAction::Lookup(self.text.clone()),
            },
            Key::Escape => {
                self.close();
                self.focused = false;
                AutocompleteAction::ReleaseFocus
            }
        }
    }

    /// A rendered suggestion was clicked.
    pub fn click(&mut self, index: usize) -> AutocompleteAction {
        if index < self.rendered_items() { self.commit(index) } else { AutocompleteAction::None }
    }

    pub fn dropdown(&self) -> Dropdown {
        if !self.open {
            return Dropdown::Closed;
        }
        if self.suggestions.is_empty() {
            return Dropdown::NoResults;
        }

        let items = self
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, city)| SuggestionView {
                name: highlight(&city.name, &self.text),
                country: city.country.clone(),
                selected: self.selected == Some(i),
            })
            .collect();

        Dropdown::Suggestions(items)
    }

    fn rendered_items(&self) -> usize {
        if self.open { self.suggestions.len() } else { 0 }
    }

    fn refresh(&mut self) {
        self.selected = None;

        if self.text.trim().is_empty() {
            self.close();
            return;
        }

        self.suggestions = self.catalog.filter(&self.text);
        self.open = true;
        debug!(query = %self.text, count = self.suggestions.len(), "autocomplete refreshed");
    }

    fn commit(&mut self, index: usize) -> AutocompleteAction {
        let Some(city) = self.suggestions.get(index) else {
            return AutocompleteAction::None;
        };

        self.text = city.name.clone();
        self.close();
        AutocompleteAction::Lookup(self.text.clone())
    }

    fn close(&mut self) {
        self.open = false;
        self.selected = None;
        self.suggestions.clear();
    }
}

/// Split `text` around the first case-insensitive occurrence of `query`.
///
/// The query is matched literally; characters with special meaning in
/// patterns are escaped.
pub fn highlight(text: &str, query: &str) -> Vec<Span> {
    let plain = || vec![Span { text: text.to_string(), emphasized: false }];

    if query.is_empty() {
        return plain();
    }

    let Ok(re) = RegexBuilder::new(&regex::escape(query)).case_insensitive(true).build() else {
        return plain();
    };
    let Some(m) = re.find(text) else {
        return plain();
    };

    let mut spans = Vec::with_capacity(3);
    if m.start() > 0 {
        spans.push(Span { text: text[..m.start()].to_string(), emphasized: false });
    }
    spans.push(Span { text: m.as_str().to_string(), emphasized: true });
    if m.end() < text.len() {
        spans.push(Span { text: text[m.end()..].to_string(), emphasized: false });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> AutocompleteController {
        let catalog = Catalog::new(vec![
            City::new("Paris", "France"),
            City::new("Perth", "Australia"),
            City::new("Porto", "Portugal"),
        ]);
        AutocompleteController::new(Arc::new(catalog))
    }

    fn names(c: &AutocompleteController) -> Vec<&str> {
        c.suggestions().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn empty_query_closes_dropdown() {
        let mut c = controller();
        c.input("pa");
        assert!(c.dropdown().is_open());

        c.input("   ");
        assert_eq!(c.dropdown(), Dropdown::Closed);
        assert_eq!(c.selected(), None);
        assert!(c.suggestions().is_empty());
    }

    #[test]
    fn matching_query_lists_suggestions() {
        let mut c = controller();
        c.input("par");
        assert_eq!(names(&c), vec!["Paris"]);
        assert!(matches!(c.dropdown(), Dropdown::Suggestions(items) if items.len() == 1));

        c.input("p");
        assert_eq!(names(&c), vec!["Paris", "Perth", "Porto"]);
    }

    #[test]
    fn unmatched_query_shows_no_results() {
        let mut c = controller();
        c.input("zzz");
        assert_eq!(c.dropdown(), Dropdown::NoResults);
    }

    #[test]
    fn focus_refilters_existing_text() {
        let mut c = controller();
        c.set_text("per");
        assert_eq!(c.dropdown(), Dropdown::Closed);

        c.focus();
        assert!(c.is_focused());
        assert_eq!(names(&c), vec!["Perth"]);
    }

    #[test]
    fn input_resets_selection() {
        let mut c = controller();
        c.input("p");
        c.key(Key::ArrowDown);
        c.key(Key::ArrowDown);
        assert_eq!(c.selected(), Some(1));

        c.input("po");
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn arrow_navigation_stays_in_bounds() {
        let mut c = controller();
        c.input("p");

        c.key(Key::ArrowUp);
        assert_eq!(c.selected(), None);

        for _ in 0..10 {
            c.key(Key::ArrowDown);
            let i = c.selected().unwrap();
            assert!(i <= 2);
        }
        assert_eq!(c.selected(), Some(2));

        for _ in 0..10 {
            c.key(Key::ArrowUp);
        }
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn arrows_are_noops_without_rendered_items() {
        let mut c = controller();
        c.input("zzz");
        c.key(Key::ArrowDown);
        assert_eq!(c.selected(), None);

        c.input("");
        c.key(Key::ArrowDown);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn enter_with_selection_commits_and_looks_up() {
        let mut c = controller();
        c.input("p");
        c.key(Key::ArrowDown);
        c.key(Key::ArrowDown);

        let action = c.key(Key::Enter);
        assert_eq!(action, AutocompleteAction::Lookup("Perth".into()));
        assert_eq!(c.text(), "Perth");
        assert_eq!(c.dropdown(), Dropdown::Closed);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn enter_without_selection_looks_up_raw_text() {
        let mut c = controller();
        c.input("Springfield");
        assert_eq!(c.dropdown(), Dropdown::NoResults);

        let action = c.key(Key::Enter);
        assert_eq!(action, AutocompleteAction::Lookup("Springfield".into()));
        assert_eq!(c.text(), "Springfield");
    }

    #[test]
    fn escape_closes_and_releases_focus() {
        let mut c = controller();
        c.focus();
        c.input("p");
        c.key(Key::ArrowDown);

        assert_eq!(c.key(Key::Escape), AutocompleteAction::ReleaseFocus);
        assert_eq!(c.dropdown(), Dropdown::Closed);
        assert_eq!(c.selected(), None);
        assert!(c.suggestions().is_empty());
        assert!(!c.is_focused());
    }

    #[test]
    fn blur_outside_closes_without_commit() {
        let mut c = controller();
        c.input("p");
        c.key(Key::ArrowDown);

        assert_eq!(c.blur_outside(), AutocompleteAction::None);
        assert_eq!(c.dropdown(), Dropdown::Closed);
        assert_eq!(c.text(), "p");
    }

    #[test]
    fn click_matches_enter_with_selection() {
        let mut c = controller();
        c.input("p");
        assert_eq!(c.click(2), AutocompleteAction::Lookup("Porto".into()));
        assert_eq!(c.text(), "Porto");
        assert_eq!(c.dropdown(), Dropdown::Closed);

        assert_eq!(c.click(0), AutocompleteAction::None);
    }

    #[test]
    fn dropdown_marks_selected_item() {
        let mut c = controller();
        c.input("p");
        c.key(Key::ArrowDown);

        let Dropdown::Suggestions(items) = c.dropdown() else {
            panic!("expected suggestions");
        };
        let selected: Vec<bool> = items.iter().map(|i| i.selected).collect();
        assert_eq!(selected, vec![true, false, false]);
    }

    #[test]
    fn highlight_emphasizes_first_match_case_insensitively() {
        let spans = highlight("Paris", "AR");
        assert_eq!(
            spans,
            vec![
                Span { text: "P".into(), emphasized: false },
                Span { text: "ar".into(), emphasized: true },
                Span { text: "is".into(), emphasized: false },
            ]
        );
    }

    #[test]
    fn highlight_escapes_pattern_characters() {
        let spans = highlight("St. John's (Old Town)", "(old");
        assert_eq!(spans[1], Span { text: "(Old".into(), emphasized: true });

        let spans = highlight("Paris", "p.r");
        assert_eq!(spans, vec![Span { text: "Paris".into(), emphasized: false }]);
    }

    #[test]
    fn highlight_without_query_is_plain() {
        assert_eq!(highlight("Oslo", ""), vec![Span { text: "Oslo".into(), emphasized: false }]);
    }
}

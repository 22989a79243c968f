use inquire::{
    CustomUserError,
    autocompletion::{Autocomplete, Replacement},
};
use weather_alert_core::{AutocompleteController, Dropdown};

/// Feeds catalog suggestions to an `inquire` text prompt.
#[derive(Debug, Clone)]
pub struct CitySuggester {
    controller: AutocompleteController,
}

impl CitySuggester {
    pub fn new(controller: AutocompleteController) -> Self {
        Self { controller }
    }

    fn names(&mut self, input: &str) -> Vec<String> {
        self.controller.input(input);
        match self.controller.dropdown() {
            Dropdown::Suggestions(_) => {
                self.controller.suggestions().iter().map(|c| c.name.clone()).collect()
            }
            Dropdown::Closed | Dropdown::NoResults => Vec::new(),
        }
    }
}

impl Autocomplete for CitySuggester {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.names(input))
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion.or_else(|| self.names(input).into_iter().next()))
    }
}

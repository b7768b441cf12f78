use super::experiment::{Difficulty, Experiment};

/// Categories offered by the catalog browser. `All` disables the filter.
pub const CATEGORIES: [&str; 4] = ["All", "Chemistry", "Physics", "Biology"];

/// Search and facet selection applied to the catalog list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub search: String,
    /// `None` means every category.
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Selects a category by name; `"All"` clears the filter.
    pub fn category(mut self, name: &str) -> Self {
        self.category = (name != "All").then(|| name.to_string());
        self
    }

    pub fn difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.category.is_none() && self.difficulty.is_none()
    }

    pub fn matches(&self, experiment: &Experiment) -> bool {
        let needle = self.search.to_lowercase();
        let text_ok = needle.is_empty()
            || experiment.title.to_lowercase().contains(&needle)
            || experiment.description.to_lowercase().contains(&needle);
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| experiment.category == c);
        let difficulty_ok = self.difficulty.map_or(true, |d| experiment.difficulty == d);

        text_ok && category_ok && difficulty_ok
    }

    pub fn apply<'a>(&'a self, experiments: &'a [Experiment]) -> impl Iterator<Item = &'a Experiment> + 'a {
        experiments.iter().filter(move |e| self.matches(e))
    }
}

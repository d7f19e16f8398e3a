use crate::state::AppState;

/// Search box state owned by the presentation client.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub show_results: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after the input widget edited `query`.
    pub fn on_input(&mut self) {
        self.show_results = true;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.on_input();
    }

    pub fn is_active(&self) -> bool {
        self.show_results && !self.query.is_empty()
    }

    pub fn results(&self, state: &AppState) -> Vec<String> {
        if !self.is_active() {
            return Vec::new();
        }
        state.search(&self.query)
    }

    /// Selects a result and closes the search.
    pub fn pick(&mut self, title: &str, state: &AppState) {
        state.select(title);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.query.clear();
        self.show_results = false;
    }
}

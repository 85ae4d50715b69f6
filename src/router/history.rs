/// Source of the current URL path.
///
/// A history only records paths. Hosts that can change the path on their own
/// (the browser's back button) tell the application through
/// [`Application::sync`](super::Application::sync).
pub trait History {
    fn current_path(&self) -> String;

    /// Records `path` as the new current path.
    fn push(&mut self, path: String);
}

/// A [`History`] kept in memory, for hosts without a URL bar and for tests.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    current: String,
    past: Vec<String>,
    future: Vec<String>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_initial_path("/")
    }
}

impl MemoryHistory {
    pub fn with_initial_path(path: impl Into<String>) -> Self {
        MemoryHistory {
            current: path.into(),
            past: Vec::new(),
            future: Vec::new(),
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn go_back(&mut self) {
        if let Some(previous) = self.past.pop() {
            let old = std::mem::replace(&mut self.current, previous);
            self.future.push(old);
        }
    }

    pub fn can_go_forward(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn go_forward(&mut self) {
        if let Some(next) = self.future.pop() {
            let old = std::mem::replace(&mut self.current, next);
            self.past.push(old);
        }
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        self.current.clone()
    }

    fn push(&mut self, path: String) {
        if self.current == path {
            return;
        }
        let old = std::mem::replace(&mut self.current, path);
        self.past.push(old);
        self.future.clear();
    }
}

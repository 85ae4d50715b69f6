/// Place in the host document where the active view is rendered.
pub trait MountTarget {
    /// Replaces the rendered content with `markup`.
    fn render(&mut self, markup: &str);
}

/// Mount target that keeps the last rendered markup in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTarget {
    content: String,
    renders: usize,
}

impl MemoryTarget {
    pub fn content(&self) -> &str {
        &self.content
    }

    /// How many times the content was replaced.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl MountTarget for MemoryTarget {
    fn render(&mut self, markup: &str) {
        self.content.clear();
        self.content.push_str(markup);
        self.renders += 1;
    }
}

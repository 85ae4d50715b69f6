use std::rc::Rc;

use log::debug;

use super::ViewDefinition;

#[derive(Debug, Clone)]
pub struct RouteEntry {
    path: String,
    view: Rc<ViewDefinition>,
}

impl RouteEntry {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn view(&self) -> &Rc<ViewDefinition> {
        &self.view
    }
}

/// Ordered set of routes, matched by exact path.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route. Registering a path twice keeps the entry in its original
    /// position and points it at the latest view.
    pub fn register(&mut self, path: impl Into<String>, view: Rc<ViewDefinition>) -> &mut Self {
        let path = path.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.path == path) {
            debug!("route {path} re-registered: {} -> {view}", entry.view);
            entry.view = view;
        } else {
            self.entries.push(RouteEntry { path, view });
        }
        self
    }

    /// Builder form of [`RouteTable::register`].
    pub fn route(mut self, path: impl Into<String>, view: Rc<ViewDefinition>) -> Self {
        self.register(path, view);
        self
    }

    pub fn lookup(&self, path: &str) -> Option<&Rc<ViewDefinition>> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| &entry.view)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(name: &str) -> Rc<ViewDefinition> {
        Rc::new(ViewDefinition::new(name, format!("<p>{name}</p>")))
    }

    #[test]
    fn lookup_is_exact() {
        let table = RouteTable::new().route("/foo", view("foo"));
        assert_eq!(table.lookup("/foo").map(|v| v.name()), Some("foo"));
        assert!(table.lookup("/foo/").is_none());
        assert!(table.lookup("/Foo").is_none());
        assert!(table.lookup("/fo").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn entries_keep_registration_order() {
        let table = RouteTable::new()
            .route("/b", view("b"))
            .route("/a", view("a"))
            .route("/c", view("c"));
        let paths: Vec<_> = table.entries().iter().map(RouteEntry::path).collect();
        assert_eq!(paths, ["/b", "/a", "/c"]);
    }

    #[test]
    fn duplicate_path_replaces_view_in_place() {
        let mut table = RouteTable::new();
        table
            .register("/x", view("first"))
            .register("/y", view("y"))
            .register("/x", view("second"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].path(), "/x");
        assert_eq!(table.lookup("/x").map(|v| v.name()), Some("second"));
    }

    #[test]
    fn views_are_shared_between_entries() {
        let shared = view("shared");
        let table = RouteTable::new()
            .route("/one", Rc::clone(&shared))
            .route("/two", Rc::clone(&shared));
        let one = table.lookup("/one").unwrap();
        let two = table.lookup("/two").unwrap();
        assert!(Rc::ptr_eq(one, two));
        assert_eq!(Rc::strong_count(&shared), 3);
    }

    #[test]
    fn empty_table() {
        let table = RouteTable::new();
        assert!(table.is_empty());
        assert!(table.lookup("/").is_none());
    }
}

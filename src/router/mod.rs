mod app;
mod base;
mod history;
mod table;
mod target;
mod view;

use std::rc::Rc;

pub use app::{Application, Lifecycle};
pub use base::BasePath;
pub use history::{History, MemoryHistory};
pub use table::{RouteEntry, RouteTable};
pub use target::{MemoryTarget, MountTarget};
pub use view::ViewDefinition;

/// Route table paired with the history that supplies the current path.
pub struct Router<H> {
    table: RouteTable,
    history: H,
}

impl<H: History> Router<H> {
    pub fn new(table: RouteTable, history: H) -> Self {
        Router { table, history }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn current_path(&self) -> String {
        self.history.current_path()
    }

    pub fn resolve(&self, path: &str) -> Option<&Rc<ViewDefinition>> {
        self.table.lookup(path)
    }
}

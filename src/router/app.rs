use std::rc::Rc;

use log::{debug, info, warn};

use super::{History, MountTarget, Router, ViewDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounted,
}

/// A router bound to the place it renders into.
pub struct Application<H, T> {
    router: Router<H>,
    target: Option<T>,
    active: Option<Rc<ViewDefinition>>,
}

impl<H: History, T: MountTarget> Application<H, T> {
    pub fn new(router: Router<H>) -> Self {
        Application {
            router,
            target: None,
            active: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.target.is_some() {
            Lifecycle::Mounted
        } else {
            Lifecycle::Unmounted
        }
    }

    /// Binds the application to `target` and renders the current path.
    ///
    /// Mounting happens once; later calls are ignored and drop their target.
    pub fn mount(&mut self, target: T) {
        if self.target.is_some() {
            warn!("application is already mounted, ignoring mount request");
            return;
        }
        self.target = Some(target);
        info!(
            "mounted application with {} routes",
            self.router.table().len()
        );
        self.sync();
    }

    /// Renders the view registered for `path`. Unknown paths and navigation
    /// before mount leave the rendered content untouched.
    pub fn navigate(&mut self, path: &str) {
        let Some(target) = self.target.as_mut() else {
            debug!("navigation to {path} before mount ignored");
            return;
        };
        match self.router.resolve(path) {
            Some(view) => {
                debug!("rendering {view} for {path}");
                target.render(view.template());
                self.active = Some(Rc::clone(view));
            }
            None => debug!("no route matches {path}"),
        }
    }

    /// Records `path` in the history, then navigates to it.
    pub fn push(&mut self, path: &str) {
        self.router.history_mut().push(path.to_string());
        self.navigate(path);
    }

    /// Navigates to whatever path the history currently reports.
    pub fn sync(&mut self) {
        let path = self.router.current_path();
        self.navigate(&path);
    }

    pub fn active_view(&self) -> Option<&ViewDefinition> {
        self.active.as_deref()
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn router(&self) -> &Router<H> {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router<H> {
        &mut self.router
    }
}

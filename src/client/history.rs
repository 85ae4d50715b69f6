use log::error;
use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::router::{BasePath, History};

/// [`History`] backed by the browser's History API.
///
/// Locations under the base path map to prefix-free routes and back.
pub struct BrowserHistory {
    window: Window,
    history: web_sys::History,
    base: BasePath,
}

impl BrowserHistory {
    pub fn new(window: Window, base: BasePath) -> Result<Self, JsValue> {
        let history = window.history()?;
        Ok(BrowserHistory {
            window,
            history,
            base,
        })
    }
}

impl History for BrowserHistory {
    fn current_path(&self) -> String {
        let location = self.window.location().pathname().unwrap_or_else(|err| {
            error!("failed to read location: {err:?}");
            String::from("/")
        });
        // Outside the base nothing is routable; keep the raw path so lookups miss.
        self.base.strip(&location).unwrap_or(location)
    }

    fn push(&mut self, path: String) {
        let url = self.base.join(&path);
        if let Err(err) = self
            .history
            .push_state_with_url(&JsValue::NULL, "", Some(&url))
        {
            error!("failed to push {url}: {err:?}");
        }
    }
}

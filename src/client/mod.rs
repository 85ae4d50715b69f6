use std::{cell::RefCell, rc::Rc};

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlAnchorElement, MouseEvent, Window};

use crate::{
    router::{Application, BasePath, History, MountTarget, Router},
    views,
};

mod dom;
mod history;

pub use dom::ElementTarget;
pub use history::BrowserHistory;

pub const MOUNT_ID: &str = "app";
pub const BASE_PATH: Option<&str> = option_env!("APP_BASE_PATH");

pub fn launch() -> Result<(), JsValue> {
    wasm_logger::init(wasm_logger::Config::default());
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global `window`"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("`window` has no document"))?;

    let base = base_path(&document);
    let history = BrowserHistory::new(window.clone(), base.clone())?;
    let target = ElementTarget::find(&document, MOUNT_ID)?;
    let app = Rc::new(RefCell::new(Application::new(Router::new(
        views::route_table(),
        history,
    ))));
    app.borrow_mut().mount(target);

    let on_popstate = {
        let app = Rc::clone(&app);
        EventListener::new(&window, "popstate", move |_| app.borrow_mut().sync())
    };
    let on_click = {
        let app = Rc::clone(&app);
        let window_for_links = window.clone();
        EventListener::new_with_options(
            &document,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| intercept_link(&*app, &window_for_links, &base, event),
        )
    };
    // Both listeners live as long as the page.
    on_popstate.forget();
    on_click.forget();
    Ok(())
}

/// Prefix from the page's `<base href>`, falling back to `APP_BASE_PATH`.
fn base_path(document: &Document) -> BasePath {
    let from_page = document
        .query_selector("base[href]")
        .ok()
        .flatten()
        .and_then(|base| base.get_attribute("href"));
    BasePath::new(from_page.as_deref().or(BASE_PATH).unwrap_or_default())
}

/// Turns clicks on links to registered routes into in-app navigation.
fn intercept_link<H: History, T: MountTarget>(
    app: &RefCell<Application<H, T>>,
    window: &Window,
    base: &BasePath,
    event: &Event,
) {
    let Some(path) = link_path(window, base, event) else {
        return;
    };
    if app.borrow().router().resolve(&path).is_none() {
        return;
    }
    event.prevent_default();
    app.borrow_mut().push(&path);
}

fn link_path(window: &Window, base: &BasePath, event: &Event) -> Option<String> {
    let click = event.dyn_ref::<MouseEvent>()?;
    if click.button() != 0 || click.ctrl_key() || click.meta_key() || click.shift_key() || click.alt_key() {
        return None;
    }
    let element = event.target()?.dyn_into::<Element>().ok()?;
    let anchor = element
        .closest("a[href]")
        .ok()??
        .dyn_into::<HtmlAnchorElement>()
        .ok()?;
    if anchor.has_attribute("target") || anchor.origin() != window.location().origin().ok()? {
        return None;
    }
    base.strip(&anchor.pathname())
}

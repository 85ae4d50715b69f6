use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::router::MountTarget;

pub struct ElementTarget {
    element: Element,
}

impl ElementTarget {
    pub fn find(document: &Document, id: &str) -> Result<Self, JsValue> {
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("mount element #{id} not found")))?;
        Ok(ElementTarget { element })
    }
}

impl MountTarget for ElementTarget {
    fn render(&mut self, markup: &str) {
        self.element.set_inner_html(markup);
    }
}

use std::rc::Rc;

use crate::router::{RouteTable, ViewDefinition};

pub fn foo() -> ViewDefinition {
    ViewDefinition::new("Foo", "<div>foo</div>")
}

pub fn bar() -> ViewDefinition {
    ViewDefinition::new("Bar", "<div>bar</div>")
}

pub fn route_table() -> RouteTable {
    RouteTable::new()
        .route("/foo", Rc::new(foo()))
        .route("/bar", Rc::new(bar()))
}

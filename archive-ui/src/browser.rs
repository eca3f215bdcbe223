#![cfg(target_arch = "wasm32")]

use std::collections::HashMap;

use archive_core::markup::LIST;
use archive_core::{ArchiveError, DocumentScope, DomResult, Listener, ObserverKind, ObserverSpec};
use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, IntersectionObserver,
    IntersectionObserverInit, Node, Window,
};

use crate::wasm_ui;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

fn host_err(err: JsValue) -> ArchiveError {
    ArchiveError::Host(format!("{err:?}"))
}

/// `DocumentScope` trên DOM thật của trình duyệt.
pub struct BrowserDocument {
    window: Window,
    document: Document,
    observers: HashMap<ObserverKind, IntersectionObserver>,
}

impl BrowserDocument {
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            observers: HashMap::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn is_hidden(&self) -> bool {
        self.document.hidden()
    }

    pub fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    pub fn has_list(&self) -> bool {
        matches!(self.document.query_selector(&format!(".{LIST}")), Ok(Some(_)))
    }

    pub fn path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    /// Mỗi loại observer được tạo một lần cho mỗi lượt khởi tạo.
    fn observer(&mut self, spec: &ObserverSpec) -> DomResult<IntersectionObserver> {
        if let Some(observer) = self.observers.get(&spec.kind) {
            return Ok(observer.clone());
        }

        let callback: ObserverCallback = match spec.kind {
            ObserverKind::ScrollSpy => Closure::wrap(Box::new(
                |entries: Array, _observer: IntersectionObserver| wasm_ui::on_spy_entries(entries),
            )
                as Box<dyn FnMut(Array, IntersectionObserver)>),
            ObserverKind::Reveal => Closure::wrap(Box::new(
                |entries: Array, observer: IntersectionObserver| {
                    wasm_ui::on_reveal_entries(entries, &observer)
                },
            )
                as Box<dyn FnMut(Array, IntersectionObserver)>),
        };

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&spec.root_margin);
        init.set_threshold(&JsValue::from_f64(spec.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(host_err)?;
        callback.forget();

        self.observers.insert(spec.kind, observer.clone());
        Ok(observer)
    }
}

impl DocumentScope for BrowserDocument {
    type Node = Element;

    fn find_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn first_by_class(&self, scope: &Element, class: &str) -> Option<Element> {
        scope.query_selector(&format!(".{class}")).ok().flatten()
    }

    fn all_by_class(&self, scope: &Element, class: &str) -> Vec<Element> {
        let Ok(list) = scope.query_selector_all(&format!(".{class}")) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn first_by_tag(&self, scope: &Element, tag: &str) -> Option<Element> {
        scope.query_selector(tag).ok().flatten()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn next_sibling(&self, node: &Element) -> Option<Element> {
        node.next_element_sibling()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .collect()
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn create_element(&mut self, tag: &str) -> DomResult<Element> {
        self.document.create_element(tag).map_err(host_err)
    }

    fn create_svg_element(&mut self, tag: &str) -> DomResult<Element> {
        self.document
            .create_element_ns(Some(SVG_NS), tag)
            .map_err(host_err)
    }

    fn append_child(&mut self, parent: &Element, child: &Element) -> DomResult<()> {
        parent.append_child(child).map(drop).map_err(host_err)
    }

    fn insert_before(
        &mut self,
        parent: &Element,
        child: &Element,
        reference: Option<&Element>,
    ) -> DomResult<()> {
        let reference = reference.map(AsRef::<Node>::as_ref);
        parent
            .insert_before(child, reference)
            .map(drop)
            .map_err(host_err)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) -> DomResult<()> {
        node.set_attribute(name, value).map_err(host_err)
    }

    fn add_class(&mut self, node: &Element, class: &str) -> DomResult<()> {
        node.class_list().add_1(class).map_err(host_err)
    }

    fn remove_class(&mut self, node: &Element, class: &str) -> DomResult<()> {
        node.class_list().remove_1(class).map_err(host_err)
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) -> DomResult<()> {
        match node.dyn_ref::<HtmlElement>() {
            Some(html) => html.style().set_property(property, value).map_err(host_err),
            None => Ok(()),
        }
    }

    fn set_text(&mut self, node: &Element, text: &str) -> DomResult<()> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn clear_children(&mut self, node: &Element) -> DomResult<()> {
        node.set_inner_html("");
        Ok(())
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn document_top(&self, node: &Element) -> f64 {
        node.get_bounding_client_rect().top() + self.scroll_y()
    }

    fn scroll_to(&mut self, y: f64) -> DomResult<()> {
        self.window.scroll_to_with_x_and_y(0.0, y);
        Ok(())
    }

    fn listen(&mut self, node: &Element, listener: Listener) -> DomResult<()> {
        let callback = match listener {
            Listener::NavLink { year } => Closure::wrap(Box::new(move |event: Event| {
                wasm_ui::on_nav_click(&event, year)
            }) as Box<dyn FnMut(Event)>),
            Listener::YearHeader { .. } => {
                let header = node.clone();
                Closure::wrap(
                    Box::new(move |_event: Event| wasm_ui::on_header_click(&header))
                        as Box<dyn FnMut(Event)>,
                )
            }
        };
        node.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
            .map_err(host_err)?;
        callback.forget();
        Ok(())
    }

    fn observe(&mut self, node: &Element, spec: &ObserverSpec) -> DomResult<()> {
        self.observer(spec)?.observe(node);
        Ok(())
    }
}

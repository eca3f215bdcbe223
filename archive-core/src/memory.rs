//! Cây tài liệu trong bộ nhớ, dùng cho kiểm thử, CLI và bridge WASM.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use crate::dom::{DocumentScope, DomResult, Listener, ObserverSpec};
use crate::ArchiveError;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element { tag: String, svg: bool },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
        }
    }

    fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    body: NodeId,
    scroll_y: f64,
    layout: HashMap<NodeId, f64>,
    listeners: Vec<(NodeId, Listener)>,
    observed: Vec<(NodeId, ObserverSpec)>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let body = NodeData::new(NodeKind::Element {
            tag: "body".to_string(),
            svg: false,
        });
        Self {
            nodes: vec![body],
            body: NodeId(0),
            scroll_y: 0.0,
            layout: HashMap::new(),
            listeners: Vec::new(),
            observed: Vec::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Tạo phần tử con có class, dùng khi dựng fixture.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let id = self.push(NodeKind::Element {
            tag: tag.to_string(),
            svg: false,
        });
        self.nodes[id.0].classes = classes.iter().map(|c| c.to_string()).collect();
        self.attach(parent, id, None);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push(NodeKind::Text(text.to_string()));
        self.attach(parent, id, None);
        id
    }

    pub fn set_document_top(&mut self, node: NodeId, top: f64) {
        self.layout.insert(node, top);
    }

    pub fn listeners(&self) -> &[(NodeId, Listener)] {
        &self.listeners
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.iter().filter(|(id, _)| *id == node).count()
    }

    pub fn observed(&self) -> &[(NodeId, ObserverSpec)] {
        &self.observed
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.nodes[node.0].classes
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].styles.get(property).map(String::as_str)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// HTML của toàn bộ `body`, dùng để so sánh cấu trúc giữa các lần chạy.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render(self.body, &mut out);
        out
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    fn attach(&mut self, parent: NodeId, node: NodeId, index: Option<usize>) {
        self.detach(node);
        let children = &mut self.nodes[parent.0].children;
        match index {
            Some(index) => children.insert(index, node),
            None => children.push(node),
        }
        self.nodes[node.0].parent = Some(parent);
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn check(&self, node: NodeId) -> DomResult<()> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(ArchiveError::Host(format!("node {} không tồn tại", node.0)))
        }
    }

    fn render(&self, node: NodeId, out: &mut String) {
        let data = &self.nodes[node.0];
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { tag, svg } => {
                let _ = write!(out, "<{tag}");
                if *svg && tag == "svg" && !data.attributes.contains_key("xmlns") {
                    let _ = write!(out, " xmlns=\"{SVG_NS}\"");
                }
                if !data.classes.is_empty() {
                    let _ = write!(out, " class=\"{}\"", data.classes.join(" "));
                }
                for (name, value) in &data.attributes {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                if !data.styles.is_empty() {
                    let style: Vec<String> = data
                        .styles
                        .iter()
                        .map(|(prop, value)| format!("{prop}: {value}"))
                        .collect();
                    let _ = write!(out, " style=\"{}\"", style.join("; "));
                }
                out.push('>');
                for child in &data.children {
                    self.render(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

impl DocumentScope for MemoryDocument {
    type Node = NodeId;

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|node| self.nodes[node.0].attributes.get("id").map(String::as_str) == Some(id))
    }

    fn first_by_class(&self, scope: &NodeId, class: &str) -> Option<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .find(|node| self.has_class(node, class))
    }

    fn all_by_class(&self, scope: &NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .filter(|node| self.has_class(node, class))
            .collect()
    }

    fn first_by_tag(&self, scope: &NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .find(|node| self.tag(*node) == Some(tag))
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = &self.nodes[parent.0].children;
        let position = siblings.iter().position(|child| child == node)?;
        siblings[position + 1..]
            .iter()
            .copied()
            .find(|sibling| self.nodes[sibling.0].is_element())
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|child| self.nodes[child.0].is_element())
            .collect()
    }

    fn text(&self, node: &NodeId) -> String {
        let mut out = String::new();
        if let NodeKind::Text(text) = &self.nodes[node.0].kind {
            out.push_str(text);
        }
        for id in self.descendants(*node) {
            if let NodeKind::Text(text) = &self.nodes[id.0].kind {
                out.push_str(text);
            }
        }
        out
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        if name == "class" {
            let classes = &self.nodes.get(node.0)?.classes;
            return (!classes.is_empty()).then(|| classes.join(" "));
        }
        self.nodes.get(node.0)?.attributes.get(name).cloned()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes
            .get(node.0)
            .map(|data| data.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        Ok(self.push(NodeKind::Element {
            tag: tag.to_string(),
            svg: false,
        }))
    }

    fn create_svg_element(&mut self, tag: &str) -> DomResult<NodeId> {
        Ok(self.push(NodeKind::Element {
            tag: tag.to_string(),
            svg: true,
        }))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        reference: Option<&NodeId>,
    ) -> DomResult<()> {
        self.check(*parent)?;
        self.check(*child)?;
        if self.is_ancestor(*child, *parent) {
            return Err(ArchiveError::Host(
                "không thể chèn một node vào chính hậu duệ của nó".to_string(),
            ));
        }
        match reference {
            Some(reference) if reference == child => Ok(()),
            Some(reference) => {
                if self.nodes[reference.0].parent != Some(*parent) {
                    return Err(ArchiveError::Host(
                        "node tham chiếu không phải con của parent".to_string(),
                    ));
                }
                self.detach(*child);
                let index = self.nodes[parent.0]
                    .children
                    .iter()
                    .position(|id| id == reference);
                self.attach(*parent, *child, index);
                Ok(())
            }
            None => {
                self.attach(*parent, *child, None);
                Ok(())
            }
        }
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> DomResult<()> {
        self.check(*node)?;
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> DomResult<()> {
        self.check(*node)?;
        let classes = &mut self.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) -> DomResult<()> {
        self.check(*node)?;
        self.nodes[node.0].classes.retain(|c| c != class);
        Ok(())
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) -> DomResult<()> {
        self.check(*node)?;
        self.nodes[node.0]
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> DomResult<()> {
        self.clear_children(node)?;
        self.append_text(*node, text);
        Ok(())
    }

    fn clear_children(&mut self, node: &NodeId) -> DomResult<()> {
        self.check(*node)?;
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        Ok(())
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn document_top(&self, node: &NodeId) -> f64 {
        self.layout.get(node).copied().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, y: f64) -> DomResult<()> {
        self.scroll_y = y;
        Ok(())
    }

    fn listen(&mut self, node: &NodeId, listener: Listener) -> DomResult<()> {
        self.check(*node)?;
        self.listeners.push((*node, listener));
        Ok(())
    }

    fn observe(&mut self, node: &NodeId, spec: &ObserverSpec) -> DomResult<()> {
        self.check(*node)?;
        self.observed.push((*node, spec.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_before_moves_existing_node() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let first = doc.append_element(body, "div", &["a"]);
        let second = doc.append_element(body, "div", &["b"]);

        doc.insert_before(&body, &second, Some(&first)).unwrap();

        assert_eq!(doc.children(&body), vec![second, first]);
        assert_eq!(doc.to_html(), "<body><div class=\"b\"></div><div class=\"a\"></div></body>");
    }

    #[test]
    fn insert_before_rejects_foreign_reference() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let outer = doc.append_element(body, "div", &[]);
        let inner = doc.append_element(outer, "span", &[]);
        let loose = doc.create_element("p").unwrap();

        let err = doc.insert_before(&body, &loose, Some(&inner)).unwrap_err();
        assert!(matches!(err, ArchiveError::Host(_)));
    }

    #[test]
    fn text_concatenates_descendants_and_next_sibling_skips_text() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let holder = doc.append_element(body, "div", &[]);
        doc.append_text(holder, " 20");
        let span = doc.append_element(holder, "span", &[]);
        doc.append_text(span, "24 ");
        doc.append_text(body, "\n");
        let after = doc.append_element(body, "div", &[]);

        assert_eq!(doc.text(&holder), " 2024 ");
        assert_eq!(doc.next_sibling(&holder), Some(after));
        assert_eq!(doc.next_sibling(&after), None);
    }

    #[test]
    fn svg_root_carries_namespace() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let svg = doc.create_svg_element("svg").unwrap();
        let line = doc.create_svg_element("polyline").unwrap();
        doc.append_child(&svg, &line).unwrap();
        doc.append_child(&body, &svg).unwrap();

        assert_eq!(
            doc.to_html(),
            "<body><svg xmlns=\"http://www.w3.org/2000/svg\"><polyline></polyline></svg></body>"
        );
    }
}

//! Phạm vi tài liệu được tiêm vào từng thành phần thay cho truy vấn toàn cục.
//!
//! Mọi thành phần chỉ nhìn DOM qua [`DocumentScope`], nên cùng một logic chạy
//! được trên trình duyệt (web-sys) lẫn trên cây trong bộ nhớ khi kiểm thử.

use std::fmt::Debug;

use crate::ArchiveError;

pub type DomResult<T> = Result<T, ArchiveError>;

/// Listener mà host phải gắn vào một node (sự kiện `click`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    /// Liên kết sidebar: chặn điều hướng mặc định rồi cuộn mượt tới năm.
    NavLink { year: i32 },
    /// Header năm đã nâng cấp: bấm ở đâu trong header cũng chuyển trạng thái.
    YearHeader { year: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    ScrollSpy,
    Reveal,
}

/// Yêu cầu quan sát giao cắt viewport cho một node.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverSpec {
    pub kind: ObserverKind,
    pub root_margin: String,
    pub threshold: f64,
}

pub trait DocumentScope {
    type Node: Clone + PartialEq + Debug;

    fn find_by_id(&self, id: &str) -> Option<Self::Node>;
    fn first_by_class(&self, scope: &Self::Node, class: &str) -> Option<Self::Node>;
    /// Mọi hậu duệ mang `class`, theo thứ tự tài liệu.
    fn all_by_class(&self, scope: &Self::Node, class: &str) -> Vec<Self::Node>;
    fn first_by_tag(&self, scope: &Self::Node, tag: &str) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Phần tử anh em kế tiếp (bỏ qua text node).
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn text(&self, node: &Self::Node) -> String;
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn create_element(&mut self, tag: &str) -> DomResult<Self::Node>;
    fn create_svg_element(&mut self, tag: &str) -> DomResult<Self::Node>;
    /// Chuyển `child` (kể cả khi đang gắn ở nơi khác) vào cuối `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> DomResult<()>;
    /// `reference = None` tương đương `append_child`.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> DomResult<()>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> DomResult<()>;
    fn add_class(&mut self, node: &Self::Node, class: &str) -> DomResult<()>;
    fn remove_class(&mut self, node: &Self::Node, class: &str) -> DomResult<()>;
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str) -> DomResult<()>;
    /// Thay toàn bộ nội dung bằng một text node.
    fn set_text(&mut self, node: &Self::Node, text: &str) -> DomResult<()>;
    fn clear_children(&mut self, node: &Self::Node) -> DomResult<()>;

    fn scroll_y(&self) -> f64;
    /// Toạ độ mép trên của node tính từ đầu tài liệu.
    fn document_top(&self, node: &Self::Node) -> f64;
    fn scroll_to(&mut self, y: f64) -> DomResult<()>;

    fn listen(&mut self, node: &Self::Node, listener: Listener) -> DomResult<()>;
    fn observe(&mut self, node: &Self::Node, spec: &ObserverSpec) -> DomResult<()>;

    fn toggle_class(&mut self, node: &Self::Node, class: &str, on: bool) -> DomResult<()> {
        if on {
            self.add_class(node, class)
        } else {
            self.remove_class(node, class)
        }
    }

    /// Tạo phần tử mới kèm danh sách class.
    fn element_with_classes(&mut self, tag: &str, classes: &[&str]) -> DomResult<Self::Node> {
        let node = self.create_element(tag)?;
        for class in classes {
            self.add_class(&node, class)?;
        }
        Ok(node)
    }
}

//! Máy trạng thái mở/thu gọn theo từng năm.
//!
//! Thuộc tính `aria-expanded` trên nút là nguồn sự thật duy nhất; class
//! `collapsed` của khối nội dung và `rotated` của nút luôn suy ra từ nó.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::aggregate::parse_year;
use crate::dom::{DocumentScope, DomResult, Listener};
use crate::markup::{
    ARIA_EXPANDED, COLLAPSED, DATA_INITIALIZED, DATA_YEAR, ITEM, ROTATED, YEAR, YEAR_CONTENT,
    YEAR_HEADER, YEAR_TOGGLE,
};
use crate::ArchiveError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CollapseState {
    Expanded,
    Collapsed,
}

impl CollapseState {
    /// Mọi giá trị khác `"false"` (kể cả thiếu thuộc tính) đều là mở.
    pub fn from_aria(value: Option<&str>) -> Self {
        match value {
            Some("false") => CollapseState::Collapsed,
            _ => CollapseState::Expanded,
        }
    }

    pub fn aria_value(self) -> &'static str {
        match self {
            CollapseState::Expanded => "true",
            CollapseState::Collapsed => "false",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            CollapseState::Expanded => CollapseState::Collapsed,
            CollapseState::Collapsed => CollapseState::Expanded,
        }
    }

    pub fn is_collapsed(self) -> bool {
        self == CollapseState::Collapsed
    }
}

/// Kết quả một lần chuyển trạng thái.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapseTransition<N> {
    pub year: i32,
    pub state: CollapseState,
    pub block: N,
}

/// Gắn listener cho các header chưa được nối; trả về số header vừa nối.
pub fn wire<D: DocumentScope>(doc: &mut D, list: &D::Node) -> DomResult<usize> {
    let mut wired = 0;
    for header in doc.all_by_class(list, YEAR_HEADER) {
        if doc.attribute(&header, DATA_INITIALIZED).is_some() {
            continue;
        }
        let Some(year) = header_year(&*doc, &header) else {
            continue;
        };
        if doc.first_by_class(&header, YEAR_TOGGLE).is_none() {
            continue;
        }
        let has_content = match doc.next_sibling(&header) {
            Some(next) => doc.has_class(&next, YEAR_CONTENT) || !doc.has_class(&next, YEAR),
            None => false,
        };
        if !has_content {
            debug!("event=archive_collapse status=skipped year={year} reason=no_items");
            continue;
        }

        doc.listen(&header, Listener::YearHeader { year })?;
        doc.set_attribute(&header, DATA_INITIALIZED, "true")?;
        wired += 1;
    }
    Ok(wired)
}

pub fn header_year<D: DocumentScope>(doc: &D, header: &D::Node) -> Option<i32> {
    doc.attribute(header, DATA_YEAR)
        .as_deref()
        .and_then(parse_year)
}

/// Khối nội dung của năm; tạo lần đầu bằng cách chuyển các bài anh em
/// (tới marker năm kế tiếp) vào trong.
pub fn ensure_block<D: DocumentScope>(doc: &mut D, header: &D::Node) -> DomResult<D::Node> {
    if let Some(next) = doc.next_sibling(header) {
        if doc.has_class(&next, YEAR_CONTENT) {
            return Ok(next);
        }
    }
    let parent = doc
        .parent(header)
        .ok_or(ArchiveError::MissingMarkup("parent of year header"))?;

    let mut siblings = Vec::new();
    let mut cursor = doc.next_sibling(header);
    while let Some(node) = cursor {
        if doc.has_class(&node, YEAR) {
            break;
        }
        cursor = doc.next_sibling(&node);
        siblings.push(node);
    }

    let block = doc.element_with_classes("div", &[YEAR_CONTENT])?;
    if let Some(year) = doc.attribute(header, DATA_YEAR) {
        doc.set_attribute(&block, DATA_YEAR, &year)?;
    }
    let reference = doc.next_sibling(header);
    doc.insert_before(&parent, &block, reference.as_ref())?;
    for node in &siblings {
        if doc.has_class(node, ITEM) {
            doc.append_child(&block, node)?;
        }
    }
    trace!(
        "event=archive_collapse status=block_created items={}",
        siblings.len()
    );
    Ok(block)
}

/// Đảo trạng thái của một header đã nâng cấp.
pub fn toggle<D: DocumentScope>(
    doc: &mut D,
    header: &D::Node,
) -> DomResult<Option<CollapseTransition<D::Node>>> {
    let Some(year) = header_year(&*doc, header) else {
        return Ok(None);
    };
    let Some(button) = doc.first_by_class(header, YEAR_TOGGLE) else {
        return Ok(None);
    };
    let block = ensure_block(doc, header)?;

    let state = CollapseState::from_aria(doc.attribute(&button, ARIA_EXPANDED).as_deref()).toggled();
    doc.set_attribute(&button, ARIA_EXPANDED, state.aria_value())?;
    doc.toggle_class(&block, COLLAPSED, state.is_collapsed())?;
    doc.toggle_class(&button, ROTATED, state.is_collapsed())?;

    debug!("event=archive_collapse year={year} state={state:?}");
    Ok(Some(CollapseTransition { year, state, block }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aria_round_trip() {
        assert_eq!(CollapseState::from_aria(None), CollapseState::Expanded);
        assert_eq!(CollapseState::from_aria(Some("true")), CollapseState::Expanded);
        assert_eq!(CollapseState::from_aria(Some("false")), CollapseState::Collapsed);
        let state = CollapseState::Expanded;
        assert_eq!(state.toggled().toggled(), state);
        assert_eq!(CollapseState::from_aria(Some(state.toggled().aria_value())), CollapseState::Collapsed);
    }
}

//! Bọc danh sách gốc vào khung container → content → articles.

use log::debug;

use crate::dom::{DocumentScope, DomResult};
use crate::markup::{ARTICLES, CONTAINER, CONTENT, LIST_TITLE};

/// Dựng khung một lần; trả về `false` nếu khung đã tồn tại.
///
/// Danh sách được chuyển chỗ chứ không nhân bản, listener trên các node con
/// vẫn giữ nguyên.
pub fn wrap<D: DocumentScope>(doc: &mut D, root: &D::Node, list: &D::Node) -> DomResult<bool> {
    if doc.first_by_class(root, CONTAINER).is_some() {
        debug!("event=archive_pipeline stage=restructure status=skipped reason=already_wrapped");
        return Ok(false);
    }

    let container = doc.element_with_classes("div", &[CONTAINER])?;
    let content = doc.element_with_classes("div", &[CONTENT])?;
    let articles = doc.element_with_classes("div", &[ARTICLES])?;

    doc.append_child(&articles, list)?;
    doc.append_child(&content, &articles)?;
    doc.append_child(&container, &content)?;
    doc.append_child(root, &container)?;

    if let Some(title) = doc.first_by_class(root, LIST_TITLE) {
        doc.insert_before(&container, &title, Some(&content))?;
    }
    Ok(true)
}

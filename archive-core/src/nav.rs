//! Sidebar điều hướng theo năm.

use log::debug;

use crate::dom::{DocumentScope, DomResult, Listener};
use crate::markup::{ARTICLES, CONTENT, DATA_YEAR, NAV_ID, NAV_LINK, SIDEBAR};
use crate::model::TimelineLink;

/// Chèn sidebar trước cột bài viết, mỗi năm một liên kết.
///
/// Sidebar đã có thì giữ nguyên, không gắn thêm listener.
pub fn render<D: DocumentScope>(
    doc: &mut D,
    root: &D::Node,
    links: &[TimelineLink],
) -> DomResult<()> {
    let Some(content) = doc.first_by_class(root, CONTENT) else {
        return Ok(());
    };
    if doc.first_by_class(&content, SIDEBAR).is_some() {
        debug!("event=archive_pipeline stage=nav status=skipped reason=already_rendered");
        return Ok(());
    }

    let sidebar = doc.element_with_classes("aside", &[SIDEBAR])?;
    let header = doc.element_with_classes("div", &["timeline-header"])?;
    let title = doc.element_with_classes("h2", &["timeline-title"])?;
    doc.set_text(&title, "Timeline")?;
    let subtitle = doc.element_with_classes("p", &["timeline-subtitle"])?;
    doc.set_text(&subtitle, "Navigate by year")?;
    doc.append_child(&header, &title)?;
    doc.append_child(&header, &subtitle)?;

    let nav = doc.element_with_classes("nav", &["timeline-nav"])?;
    doc.set_attribute(&nav, "id", NAV_ID)?;
    doc.append_child(&sidebar, &header)?;
    doc.append_child(&sidebar, &nav)?;

    let articles = doc.first_by_class(&content, ARTICLES);
    doc.insert_before(&content, &sidebar, articles.as_ref())?;

    for link in links {
        let anchor = doc.element_with_classes("a", &[NAV_LINK])?;
        doc.set_attribute(&anchor, "href", &link.href)?;
        doc.set_attribute(&anchor, DATA_YEAR, &link.year.to_string())?;
        doc.set_attribute(&anchor, "aria-label", &link.label())?;

        let year = doc.element_with_classes("span", &["timeline-year"])?;
        doc.set_text(&year, &link.year.to_string())?;
        let count = doc.element_with_classes("span", &["timeline-count"])?;
        doc.set_text(&count, &link.count.to_string())?;
        doc.append_child(&anchor, &year)?;
        doc.append_child(&anchor, &count)?;

        doc.listen(&anchor, Listener::NavLink { year: link.year })?;
        doc.append_child(&nav, &anchor)?;
    }
    Ok(())
}

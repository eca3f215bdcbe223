//! Nâng cấp marker năm thành header có nút thu gọn.

use crate::aggregate::Aggregation;
use crate::dom::{DocumentScope, DomResult};
use crate::markup::{ARIA_EXPANDED, DATA_YEAR, ITEM, YEAR_HEADER, YEAR_TOGGLE};

const CHEVRON_POINTS: &str = "6 9 12 15 18 9";

/// Nâng cấp node neo của từng nhóm năm; trả về số header vừa nâng cấp.
///
/// Marker hỏng và marker trùng năm không làm neo được giữ nguyên như HTML gốc.
pub fn enhance<D: DocumentScope>(
    doc: &mut D,
    aggregation: &Aggregation<D::Node>,
) -> DomResult<usize> {
    let mut enhanced = 0;
    for group in &aggregation.groups {
        let marker = &group.marker;
        if !doc.has_class(marker, ITEM) || doc.has_class(marker, YEAR_HEADER) {
            continue;
        }

        let anchor = group.anchor_id();
        if doc.attribute(marker, "id").is_none() && doc.find_by_id(&anchor).is_none() {
            doc.set_attribute(marker, "id", &anchor)?;
        }
        doc.add_class(marker, YEAR_HEADER)?;
        doc.set_attribute(marker, DATA_YEAR, &group.year.to_string())?;

        render_header(doc, marker, group.year, group.count())?;
        enhanced += 1;
    }
    Ok(enhanced)
}

fn render_header<D: DocumentScope>(
    doc: &mut D,
    marker: &D::Node,
    year: i32,
    count: usize,
) -> DomResult<()> {
    doc.clear_children(marker)?;

    let dot_holder = doc.element_with_classes("div", &["year-marker"])?;
    let dot = doc.element_with_classes("span", &["year-dot"])?;
    doc.append_child(&dot_holder, &dot)?;

    let title = doc.element_with_classes("span", &["year-title"])?;
    doc.set_text(&title, &year.to_string())?;
    let count_el = doc.element_with_classes("span", &["year-count"])?;
    doc.set_text(&count_el, &format!("{count} posts"))?;

    let toggle = doc.element_with_classes("button", &[YEAR_TOGGLE])?;
    doc.set_attribute(&toggle, "type", "button")?;
    doc.set_attribute(&toggle, DATA_YEAR, &year.to_string())?;
    doc.set_attribute(&toggle, ARIA_EXPANDED, "true")?;
    doc.set_attribute(&toggle, "aria-label", &format!("Toggle {year} articles"))?;
    let icon = chevron(doc)?;
    doc.append_child(&toggle, &icon)?;

    for child in [&dot_holder, &title, &count_el, &toggle] {
        doc.append_child(marker, child)?;
    }
    Ok(())
}

fn chevron<D: DocumentScope>(doc: &mut D) -> DomResult<D::Node> {
    let svg = doc.create_svg_element("svg")?;
    for (name, value) in [
        ("width", "16"),
        ("height", "16"),
        ("viewBox", "0 0 24 24"),
        ("fill", "none"),
        ("stroke", "currentColor"),
        ("stroke-width", "2"),
        ("stroke-linecap", "round"),
        ("stroke-linejoin", "round"),
        ("aria-hidden", "true"),
    ] {
        doc.set_attribute(&svg, name, value)?;
    }
    let polyline = doc.create_svg_element("polyline")?;
    doc.set_attribute(&polyline, "points", CHEVRON_POINTS)?;
    doc.append_child(&svg, &polyline)?;
    Ok(svg)
}

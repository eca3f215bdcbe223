//! Trích thông tin bài viết và gom thời gian, tiêu đề, tag vào một khối info.

use chrono::{DateTime, NaiveDate};

use crate::dom::{DocumentScope, DomResult};
use crate::markup::{ARTICLE_TAG, ITEM_IMG, ITEM_INFO, ITEM_TAGS, ITEM_TIME, ITEM_TITLE, TAG_LINK};
use crate::model::ArchiveItem;

/// Đọc một bài viết từ markup (trước hoặc sau khi trang trí đều được).
pub fn describe<D: DocumentScope>(doc: &D, item: &D::Node) -> ArchiveItem {
    let title = doc
        .first_by_class(item, ITEM_TITLE)
        .map(|node| doc.text(&node).trim().to_string())
        .unwrap_or_default();

    let time_el = doc.first_by_class(item, ITEM_TIME);
    let display_time = time_el
        .as_ref()
        .map(|node| doc.text(node).trim().to_string())
        .filter(|text| !text.is_empty());
    let published = time_el
        .as_ref()
        .and_then(|node| doc.first_by_tag(node, "time"))
        .and_then(|node| doc.attribute(&node, "datetime"))
        .and_then(|raw| parse_date(&raw));

    let thumbnail = doc
        .first_by_class(item, ITEM_IMG)
        .and_then(|holder| doc.first_by_tag(&holder, "img"))
        .and_then(|img| doc.attribute(&img, "src"));

    ArchiveItem {
        title,
        display_time,
        published,
        thumbnail,
        tags: tag_labels(doc, item),
    }
}

/// Chấp nhận RFC 3339 hoặc `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

fn tag_labels<D: DocumentScope>(doc: &D, item: &D::Node) -> Vec<String> {
    let mut nodes = doc.all_by_class(item, ARTICLE_TAG);
    if nodes.is_empty() {
        nodes = doc.all_by_class(item, TAG_LINK);
    }
    nodes
        .iter()
        .map(|node| doc.text(node).trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Dựng `.article-sort-item-info` tại vị trí của thời gian/tiêu đề.
///
/// Trả về `false` khi bài đã có khối info hoặc không có gì để gom.
pub fn decorate<D: DocumentScope>(doc: &mut D, item: &D::Node) -> DomResult<bool> {
    if doc.first_by_class(item, ITEM_INFO).is_some() {
        return Ok(false);
    }
    let time = doc.first_by_class(item, ITEM_TIME);
    let title = doc.first_by_class(item, ITEM_TITLE);
    let Some(anchor) = time.clone().or_else(|| title.clone()) else {
        return Ok(false);
    };
    let Some(anchor_parent) = doc.parent(&anchor) else {
        return Ok(false);
    };

    let info = doc.element_with_classes("div", &[ITEM_INFO])?;
    doc.insert_before(&anchor_parent, &info, Some(&anchor))?;
    for node in [time, title].into_iter().flatten() {
        doc.append_child(&info, &node)?;
    }

    match doc.first_by_class(item, ITEM_TAGS) {
        Some(tags) => doc.append_child(&info, &tags)?,
        None => {
            let labels = tag_labels(&*doc, item);
            if !labels.is_empty() {
                let tags = doc.element_with_classes("div", &[ITEM_TAGS])?;
                for label in labels {
                    let span = doc.element_with_classes("span", &[ARTICLE_TAG])?;
                    doc.set_text(&span, &label)?;
                    doc.append_child(&tags, &span)?;
                }
                doc.append_child(&info, &tags)?;
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_both_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_date("2024-03-01T08:00:00.000Z"), expected);
        assert_eq!(parse_date("2024-03-01"), expected);
        assert_eq!(parse_date("March"), None);
    }
}

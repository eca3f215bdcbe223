//! Gom danh sách phẳng (marker năm xen kẽ bài viết) thành các nhóm theo năm.

use crate::dom::DocumentScope;
use crate::markup::{DATA_YEAR, ITEM, YEAR, YEAR_HEADER};
use crate::model::YearGroup;

/// Một phần tử của danh sách thô theo thứ tự tài liệu.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry<N> {
    Marker { node: N, text: String },
    Item(N),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation<N> {
    /// Sắp xếp giảm dần theo năm, mỗi năm xuất hiện một lần.
    pub groups: Vec<YearGroup<N>>,
    /// Marker không đọc được năm; chúng và các bài theo sau bị bỏ qua.
    pub skipped: Vec<String>,
}

impl<N> Aggregation<N> {
    pub fn total(&self) -> usize {
        self.groups.iter().map(YearGroup::count).sum()
    }

    pub fn group(&self, year: i32) -> Option<&YearGroup<N>> {
        self.groups.iter().find(|group| group.year == year)
    }
}

/// Đọc số nguyên ở đầu chuỗi (sau khi bỏ khoảng trắng), giống `parseInt`.
pub fn parse_year(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

/// Gom các bài viết theo marker năm đứng trước chúng.
///
/// Marker trùng năm dùng chung một nhóm: loạt bài không rỗng gặp sau cùng
/// thắng, và marker của loạt đó làm node neo. Marker trùng còn lại cùng bài
/// của chúng nằm ngoài kết quả, giống marker hỏng.
pub fn aggregate<N: Clone>(entries: impl IntoIterator<Item = RawEntry<N>>) -> Aggregation<N> {
    let mut groups: Vec<YearGroup<N>> = Vec::new();
    let mut skipped = Vec::new();
    let mut current: Option<(i32, N)> = None;
    let mut run: Vec<N> = Vec::new();

    fn flush<N>(groups: &mut [YearGroup<N>], current: Option<(i32, N)>, run: &mut Vec<N>) {
        let items = std::mem::take(run);
        let Some((year, marker)) = current else { return };
        if items.is_empty() {
            return;
        }
        if let Some(group) = groups.iter_mut().find(|group| group.year == year) {
            group.marker = marker;
            group.items = items;
        }
    }

    for entry in entries {
        match entry {
            RawEntry::Marker { node, text } => {
                flush(&mut groups, current.take(), &mut run);
                let Some(year) = parse_year(&text) else {
                    skipped.push(text.trim().to_string());
                    continue;
                };
                if !groups.iter().any(|group| group.year == year) {
                    groups.push(YearGroup {
                        year,
                        marker: node.clone(),
                        items: Vec::new(),
                    });
                }
                current = Some((year, node));
            }
            RawEntry::Item(node) => {
                if current.is_some() {
                    run.push(node);
                }
            }
        }
    }
    flush(&mut groups, current, &mut run);

    groups.sort_by(|a, b| b.year.cmp(&a.year));
    Aggregation { groups, skipped }
}

/// Đọc danh sách thô từ DOM: mọi `.article-sort-item` trong `list`.
///
/// Marker đã được nâng cấp được đọc qua `data-year` thay vì nội dung hiển thị.
pub fn collect_entries<D: DocumentScope>(doc: &D, list: &D::Node) -> Vec<RawEntry<D::Node>> {
    doc.all_by_class(list, ITEM)
        .into_iter()
        .map(|node| {
            if doc.has_class(&node, YEAR) {
                let text = if doc.has_class(&node, YEAR_HEADER) {
                    doc.attribute(&node, DATA_YEAR).unwrap_or_default()
                } else {
                    doc.text(&node)
                };
                RawEntry::Marker { node, text }
            } else {
                RawEntry::Item(node)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(node: u32, text: &str) -> RawEntry<u32> {
        RawEntry::Marker {
            node,
            text: text.to_string(),
        }
    }

    #[test]
    fn parse_year_follows_leading_integer() {
        assert_eq!(parse_year(" 2024 "), Some(2024));
        assert_eq!(parse_year("2023年"), Some(2023));
        assert_eq!(parse_year("Archive"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("-"), None);
    }

    #[test]
    fn groups_are_descending_and_counts_sum() {
        let entries = vec![
            marker(1, "2021"),
            RawEntry::Item(2),
            marker(3, "2024"),
            RawEntry::Item(4),
            RawEntry::Item(5),
            marker(6, "2023"),
            RawEntry::Item(7),
        ];
        let result = aggregate(entries);

        let years: Vec<i32> = result.groups.iter().map(|g| g.year).collect();
        assert_eq!(years, vec![2024, 2023, 2021]);
        assert_eq!(result.total(), 4);
        assert_eq!(result.group(2024).map(|g| g.items.clone()), Some(vec![4, 5]));
    }

    #[test]
    fn malformed_marker_drops_its_trailing_items() {
        let entries = vec![
            marker(1, "2022"),
            RawEntry::Item(2),
            marker(3, "Archive"),
            RawEntry::Item(4),
            RawEntry::Item(5),
            marker(6, "2021"),
            RawEntry::Item(7),
        ];
        let result = aggregate(entries);

        assert_eq!(result.groups.len(), 2);
        assert_eq!(result.total(), 2);
        assert_eq!(result.skipped, vec!["Archive".to_string()]);
    }

    #[test]
    fn items_before_first_marker_are_ignored() {
        let result = aggregate(vec![RawEntry::Item(0), marker(1, "2020"), RawEntry::Item(2)]);
        assert_eq!(result.total(), 1);
    }

    #[test]
    fn duplicate_year_anchors_on_marker_of_last_run() {
        let entries = vec![
            marker(1, "2024"),
            RawEntry::Item(2),
            marker(3, "2024"),
            RawEntry::Item(4),
            RawEntry::Item(5),
        ];
        let result = aggregate(entries);

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].marker, 3);
        assert_eq!(result.groups[0].items, vec![4, 5]);
    }

    #[test]
    fn empty_duplicate_does_not_steal_the_anchor() {
        let entries = vec![
            marker(1, "2024"),
            RawEntry::Item(2),
            marker(3, "2024"),
            marker(4, "2023"),
            RawEntry::Item(5),
        ];
        let result = aggregate(entries);

        let group = result.group(2024).expect("Thiếu nhóm 2024");
        assert_eq!(group.marker, 1);
        assert_eq!(group.items, vec![2]);
        assert_eq!(result.total(), 2);
    }
}

//! Hàng thẻ thống kê phía trên timeline.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dom::{DocumentScope, DomResult};
use crate::markup::{CONTAINER, CONTENT, STATS, STAT_CARD};
use crate::model::YearGroup;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StatsSummary {
    pub total: usize,
    pub years: usize,
    pub this_year: usize,
    /// `round(total / years)`, bằng 0 khi chưa có năm nào.
    pub avg_per_year: usize,
}

impl StatsSummary {
    pub fn compute<N>(groups: &[YearGroup<N>], current_year: i32) -> Self {
        let total = groups.iter().map(YearGroup::count).sum::<usize>();
        let years = groups.len();
        let this_year = groups
            .iter()
            .find(|group| group.year == current_year)
            .map(YearGroup::count)
            .unwrap_or(0);
        let avg_per_year = if years == 0 {
            0
        } else {
            (2 * total + years) / (2 * years)
        };
        Self {
            total,
            years,
            this_year,
            avg_per_year,
        }
    }

    /// Các thẻ theo thứ tự cố định: (nhãn, giá trị, biến thể).
    pub fn cards(&self) -> [(&'static str, usize, Option<&'static str>); 4] {
        [
            ("Total Posts", self.total, Some("primary")),
            ("Years", self.years, None),
            ("This Year", self.this_year, Some("accent")),
            ("Avg/Year", self.avg_per_year, None),
        ]
    }
}

/// Chèn khối thống kê ngay trước hàng nội dung, một lần cho mỗi khung.
pub fn render<D: DocumentScope>(doc: &mut D, root: &D::Node, stats: &StatsSummary) -> DomResult<()> {
    let Some(container) = doc.first_by_class(root, CONTAINER) else {
        return Ok(());
    };
    let Some(content) = doc.first_by_class(&container, CONTENT) else {
        return Ok(());
    };
    if doc.first_by_class(&container, STATS).is_some() {
        debug!("event=archive_pipeline stage=stats status=skipped reason=already_rendered");
        return Ok(());
    }

    let block = doc.element_with_classes("div", &[STATS])?;
    for (index, (label, value, variant)) in stats.cards().into_iter().enumerate() {
        let card = doc.element_with_classes("div", &[STAT_CARD])?;
        let value_el = doc.element_with_classes("div", &["stat-value"])?;
        if let Some(variant) = variant {
            doc.add_class(&card, variant)?;
            doc.add_class(&value_el, variant)?;
        }
        doc.set_style(&card, "animation-delay", &format!("{:.1}s", index as f64 * 0.1))?;

        let label_el = doc.element_with_classes("div", &["stat-label"])?;
        doc.set_text(&label_el, label)?;
        doc.set_text(&value_el, &value.to_string())?;
        doc.append_child(&card, &label_el)?;
        doc.append_child(&card, &value_el)?;
        doc.append_child(&block, &card)?;
    }
    doc.insert_before(&container, &block, Some(&content))
}

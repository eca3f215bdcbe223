//! ViewModel của timeline: dựng một lần mỗi lượt chạy rồi chiếu lên DOM.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::markup::year_anchor;
use crate::stats::StatsSummary;

/// Một bài viết nằm dưới một năm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ArchiveItem {
    pub title: String,
    /// Thời gian hiển thị đúng như markup.
    pub display_time: Option<String>,
    pub published: Option<NaiveDate>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Nhóm bài viết của một năm, giữ tham chiếu tới node chứ không sao chép.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup<N> {
    pub year: i32,
    /// Marker năm xuất hiện đầu tiên trong tài liệu.
    pub marker: N,
    /// Bài viết theo thứ tự tài liệu.
    pub items: Vec<N>,
}

impl<N> YearGroup<N> {
    pub fn anchor_id(&self) -> String {
        year_anchor(self.year)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Liên kết sidebar cho một năm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineLink {
    pub year: i32,
    pub count: usize,
    pub href: String,
}

impl TimelineLink {
    pub fn new(year: i32, count: usize) -> Self {
        Self {
            year,
            count,
            href: format!("#{}", year_anchor(year)),
        }
    }

    /// Nhãn đọc được, ví dụ `2024 (3)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.year, self.count)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearView {
    pub year: i32,
    pub anchor_id: String,
    pub items: Vec<ArchiveItem>,
}

impl YearView {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Kết quả tổng hợp của một lượt chạy pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchiveView {
    /// Tăng dần theo từng lượt chạy của cùng một controller.
    pub revision: u64,
    pub current_year: i32,
    pub stats: StatsSummary,
    pub years: Vec<YearView>,
    pub links: Vec<TimelineLink>,
    /// Nội dung các marker năm không đọc được, giữ nguyên trong DOM.
    #[serde(default)]
    pub skipped_markers: Vec<String>,
}

impl ArchiveView {
    pub fn year(&self, year: i32) -> Option<&YearView> {
        self.years.iter().find(|view| view.year == year)
    }
}

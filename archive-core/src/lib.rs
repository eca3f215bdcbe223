//! Logic lõi biến danh sách lưu trữ phẳng thành timeline theo năm.

use serde::{Deserialize, Serialize};

pub mod aggregate;
pub mod collapse;
pub mod decorate;
pub mod dom;
pub mod headers;
pub mod listing;
pub mod markup;
pub mod memory;
pub mod model;
pub mod nav;
pub mod pipeline;
pub mod restructure;
pub mod reveal;
pub mod scroll;
pub mod spy;
pub mod stats;
pub mod triggers;

pub use aggregate::{parse_year, Aggregation, RawEntry};
pub use collapse::{CollapseState, CollapseTransition};
pub use dom::{DocumentScope, DomResult, Listener, ObserverKind, ObserverSpec};
pub use listing::{Listing, ListingEntry};
pub use memory::{MemoryDocument, NodeId};
pub use model::{ArchiveItem, ArchiveView, TimelineLink, YearGroup, YearView};
pub use pipeline::{ArchiveController, ArchiveRuntime};
pub use reveal::{ObserveDecision, RevealState};
pub use scroll::{FrameOutcome, ScrollAnimation, ScrollHandle, SmoothScroller};
pub use spy::{ScrollSpyState, SpyChange};
pub use stats::StatsSummary;
pub use triggers::{is_archive_page, ReinitTrigger};

/// Vùng quan sát tính theo phần trăm chiều cao viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ViewportBand {
    /// Phần trăm cắt bớt từ mép trên.
    pub top_pct: u8,
    /// Phần trăm cắt bớt từ mép dưới.
    pub bottom_pct: u8,
    pub threshold: f64,
}

impl ViewportBand {
    /// Chuỗi `rootMargin` tương ứng cho IntersectionObserver.
    pub fn root_margin(&self) -> String {
        let edge = |pct: u8| {
            if pct == 0 {
                "0px".to_string()
            } else {
                format!("-{pct}%")
            }
        };
        format!("{} 0px {} 0px", edge(self.top_pct), edge(self.bottom_pct))
    }
}

/// Cấu hình hiệu ứng và hành vi cuộn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Độ trễ (ms) giữa hai mục liên tiếp trong một nhóm xuất hiện.
    pub stagger_delay_ms: u32,
    /// Số mục trong một "làn sóng" trước khi độ trễ quay về 0.
    pub stagger_group: usize,
    pub smooth_scroll_duration_ms: f64,
    /// Khoảng chừa cho header cố định khi cuộn tới một năm.
    pub header_offset_px: f64,
    /// Thời gian chờ sau khi mở rộng trước khi đánh dấu các mục `in-view`.
    pub settle_delay_ms: u32,
    pub spy_band: ViewportBand,
    pub reveal_band: ViewportBand,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            stagger_delay_ms: 40,
            stagger_group: 10,
            smooth_scroll_duration_ms: 800.0,
            header_offset_px: 100.0,
            settle_delay_ms: 100,
            spy_band: ViewportBand {
                top_pct: 10,
                bottom_pct: 10,
                threshold: 0.1,
            },
            reveal_band: ViewportBand {
                top_pct: 0,
                bottom_pct: 10,
                threshold: 0.1,
            },
        }
    }
}

/// Lỗi chung khi dựng timeline lưu trữ.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ArchiveError {
    #[error("Thiếu markup bắt buộc: {0}")]
    MissingMarkup(&'static str),
    #[error("Thao tác DOM bị từ chối: {0}")]
    Host(String),
    #[error("Danh sách đầu vào không hợp lệ: {0}")]
    InvalidListing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bands_render_root_margins() {
        let config = ArchiveConfig::default();
        assert_eq!(config.spy_band.root_margin(), "-10% 0px -10% 0px");
        assert_eq!(config.reveal_band.root_margin(), "0px 0px -10% 0px");
    }
}

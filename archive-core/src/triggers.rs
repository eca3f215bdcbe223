//! Chính sách khởi tạo lại pipeline.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReinitTrigger {
    DocumentReady,
    /// `pjax:complete` từ cơ chế chuyển trang phía client.
    NavigationComplete,
    VisibilityChange,
}

impl ReinitTrigger {
    pub fn event_name(self) -> &'static str {
        match self {
            ReinitTrigger::DocumentReady => "DOMContentLoaded",
            ReinitTrigger::NavigationComplete => "pjax:complete",
            ReinitTrigger::VisibilityChange => "visibilitychange",
        }
    }

    /// Thay đổi hiển thị chỉ kích hoạt khi trang hiện lại.
    pub fn should_run(self, document_hidden: bool) -> bool {
        match self {
            ReinitTrigger::VisibilityChange => !document_hidden,
            _ => true,
        }
    }
}

/// Trang lưu trữ: có danh sách `.article-sort` hoặc đường dẫn chứa `/archives/`.
pub fn is_archive_page(has_list: bool, path: &str) -> bool {
    has_list || path.contains("/archives/")
}

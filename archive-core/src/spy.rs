//! Đồng bộ trạng thái `active` giữa header năm và liên kết sidebar.

use serde::{Deserialize, Serialize};

/// Thay đổi trạng thái mà lớp chiếu DOM cần áp dụng.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpyChange {
    pub previous: Option<i32>,
    pub current: i32,
}

/// Giữ tối đa một năm đang active; lần giao cắt sau cùng thắng.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollSpyState {
    active: Option<i32>,
}

impl ScrollSpyState {
    pub fn new(active: Option<i32>) -> Self {
        Self { active }
    }

    pub fn active(&self) -> Option<i32> {
        self.active
    }

    /// Header của `year` vừa đi vào vùng quan sát.
    pub fn header_entered(&mut self, year: i32) -> SpyChange {
        let previous = self.active.replace(year);
        SpyChange {
            previous,
            current: year,
        }
    }
}

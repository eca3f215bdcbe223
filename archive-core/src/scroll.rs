//! Cuộn mượt với easing cubic ease-out, điều khiển theo từng animation frame.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Định danh một lần cuộn; lần cuộn mới làm handle cũ hết hiệu lực.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Đã cuộn tới `position`, cần thêm frame.
    Continue { position: f64 },
    /// Frame cuối, `position` đúng bằng đích.
    Finished { position: f64 },
    /// Handle đã bị thay bởi lần cuộn khác.
    Cancelled,
}

/// Quỹ đạo cuộn từ vị trí hiện tại tới đích trong `duration_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    start: f64,
    target: f64,
    duration_ms: f64,
    started_at: Option<f64>,
    elapsed: f64,
}

impl ScrollAnimation {
    pub fn new(start: f64, target: f64, duration_ms: f64) -> Self {
        Self {
            start,
            target,
            duration_ms,
            started_at: None,
            elapsed: 0.0,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Mốc thời gian của frame đầu tiên được lấy làm thời điểm bắt đầu.
    /// Thời gian lùi (jitter) bị bỏ qua để tiến trình không bao giờ giảm.
    pub fn sample(&mut self, now: f64) -> FrameOutcome {
        let started_at = *self.started_at.get_or_insert(now);
        self.elapsed = self.elapsed.max(now - started_at);

        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration_ms).min(1.0)
        };
        if progress >= 1.0 {
            return FrameOutcome::Finished {
                position: self.target,
            };
        }
        FrameOutcome::Continue {
            position: self.start + (self.target - self.start) * ease_out_cubic(progress),
        }
    }
}

pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Giữ tối đa một animation đang chạy.
///
/// Bộ đếm id có thể dùng chung giữa nhiều scroller để handle của scroller cũ
/// không bao giờ trùng handle của scroller mới.
#[derive(Debug, Default)]
pub struct SmoothScroller {
    ids: Arc<AtomicU64>,
    active: Option<(ScrollHandle, ScrollAnimation)>,
}

impl SmoothScroller {
    pub fn with_ids(ids: Arc<AtomicU64>) -> Self {
        Self { ids, active: None }
    }

    /// Huỷ animation đang chạy (nếu có) rồi bắt đầu animation mới.
    pub fn start(&mut self, animation: ScrollAnimation) -> ScrollHandle {
        let handle = ScrollHandle(self.ids.fetch_add(1, Ordering::Relaxed) + 1);
        self.active = Some((handle, animation));
        handle
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_running(&self, handle: ScrollHandle) -> bool {
        matches!(&self.active, Some((current, _)) if *current == handle)
    }

    pub fn frame(&mut self, handle: ScrollHandle, now: f64) -> FrameOutcome {
        let outcome = match &mut self.active {
            Some((current, animation)) if *current == handle => animation.sample(now),
            _ => return FrameOutcome::Cancelled,
        };
        if matches!(outcome, FrameOutcome::Finished { .. }) {
            self.active = None;
        }
        outcome
    }
}

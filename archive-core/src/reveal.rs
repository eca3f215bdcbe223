//! Hiệu ứng xuất hiện một lần khi bài viết đi vào viewport.

/// Quyết định gửi lại cho observer sau một lần giao cắt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveDecision {
    Keep,
    Stop,
}

/// Tập bài đã hiện, theo chỉ số trong danh sách bài của lượt chạy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealState {
    revealed: Vec<bool>,
}

impl RevealState {
    pub fn new(len: usize) -> Self {
        Self {
            revealed: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|shown| **shown).count()
    }

    /// Trả về `true` nếu đây là lần đầu bài `index` được đánh dấu.
    pub fn mark(&mut self, index: usize) -> bool {
        match self.revealed.get_mut(index) {
            Some(shown) if !*shown => {
                *shown = true;
                true
            }
            _ => false,
        }
    }
}

/// Độ trễ chuyển tiếp (ms) theo vị trí, tạo hiệu ứng dạng sóng.
pub fn stagger_delay_ms(index: usize, group: usize, delay_ms: u32) -> u64 {
    if group == 0 {
        return 0;
    }
    (index % group) as u64 * u64::from(delay_ms)
}

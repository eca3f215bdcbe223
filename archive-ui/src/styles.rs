#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_MARKER: &str = "data-archive-ui";
const STYLE_VERSION: &str = "archive-timeline-1";

/// CSS mặc định cho timeline lưu trữ, các biến màu có thể ghi đè từ theme.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --archive-accent: #2563eb;
  --archive-accent-soft: rgba(37, 99, 235, 0.12);
  --archive-muted: #64748b;
  --archive-card-bg: rgba(255, 255, 255, 0.72);
  --archive-card-border: rgba(148, 163, 184, 0.28);
  --archive-radius: 12px;
}

.archive-stats {
  display: grid;
  grid-template-columns: repeat(4, minmax(0, 1fr));
  gap: 16px;
  margin: 20px 0 28px;
}

.stat-card {
  padding: 16px 18px;
  border-radius: var(--archive-radius);
  background: var(--archive-card-bg);
  border: 1px solid var(--archive-card-border);
  animation: archive-fade-up 0.5s ease both;
}

.stat-label {
  font-size: 12px;
  letter-spacing: 0.06em;
  text-transform: uppercase;
  color: var(--archive-muted);
}

.stat-value {
  margin-top: 6px;
  font-size: 28px;
  font-weight: 700;
}

.stat-value.primary,
.stat-value.accent {
  color: var(--archive-accent);
}

.archive-content {
  display: grid;
  grid-template-columns: 200px minmax(0, 1fr);
  gap: 28px;
}

.archive-timeline {
  position: sticky;
  top: 80px;
  align-self: start;
}

.timeline-subtitle {
  margin: 4px 0 12px;
  color: var(--archive-muted);
  font-size: 13px;
}

.timeline-link {
  display: flex;
  justify-content: space-between;
  padding: 8px 12px;
  border-radius: 8px;
  color: inherit;
  transition: background 0.2s ease, color 0.2s ease;
}

.timeline-link:hover,
.timeline-link.active {
  background: var(--archive-accent-soft);
  color: var(--archive-accent);
}

.timeline-count {
  color: var(--archive-muted);
  font-variant-numeric: tabular-nums;
}

.archive-year-header {
  display: flex;
  align-items: center;
  gap: 12px;
  cursor: pointer;
  scroll-margin-top: 100px;
}

.archive-year-header.active .year-dot {
  background: var(--archive-accent);
  box-shadow: 0 0 0 6px var(--archive-accent-soft);
}

.year-dot {
  display: block;
  width: 10px;
  height: 10px;
  border-radius: 50%;
  background: var(--archive-muted);
  transition: background 0.2s ease, box-shadow 0.2s ease;
}

.year-count {
  color: var(--archive-muted);
  font-size: 13px;
}

.year-toggle {
  margin-left: auto;
  border: none;
  background: none;
  color: inherit;
  cursor: pointer;
  transition: transform 0.25s ease;
}

.year-toggle.rotated {
  transform: rotate(-90deg);
}

.year-content {
  overflow: hidden;
  transition: max-height 0.3s ease, opacity 0.3s ease;
}

.year-content.collapsed {
  max-height: 0;
  opacity: 0;
}

.article-sort-item[data-reveal] {
  transition-property: opacity, transform;
  transition-duration: 0.45s;
  transition-timing-function: ease-out;
}

.article-sort-item[data-reveal]:not(.in-view) {
  opacity: 0;
  transform: translateY(16px);
}

.article-sort-item-tags {
  display: flex;
  flex-wrap: wrap;
  gap: 6px;
}

.article-tag {
  padding: 2px 8px;
  border-radius: 999px;
  font-size: 12px;
  background: var(--archive-accent-soft);
  color: var(--archive-accent);
}

@keyframes archive-fade-up {
  from {
    opacity: 0;
    transform: translateY(8px);
  }
  to {
    opacity: 1;
    transform: none;
  }
}

@media (max-width: 768px) {
  .archive-stats {
    grid-template-columns: repeat(2, minmax(0, 1fr));
  }

  .archive-content {
    grid-template-columns: 1fr;
  }

  .archive-timeline {
    position: static;
  }
}

@media (prefers-reduced-motion: reduce) {
  .article-sort-item[data-reveal],
  .stat-card {
    animation: none;
    transition: none;
    opacity: 1;
    transform: none;
  }
}
"#;

/// Chèn stylesheet một lần cho mỗi document; lần gọi sau chỉ kiểm tra marker.
pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    let selector = format!("style[{STYLE_MARKER}]");
    if document.query_selector(&selector)?.is_some() {
        return Ok(());
    }
    let Some(head) = document.head() else {
        return Err(JsValue::from_str("archive-ui: trang không có <head> để chèn CSS"));
    };

    let style = document.create_element("style")?;
    style.set_attribute(STYLE_MARKER, STYLE_VERSION)?;
    style.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(style.unchecked_ref::<Node>())?;
    Ok(())
}

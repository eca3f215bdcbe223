//! Tên class, id và thuộc tính dùng chung giữa các thành phần.

pub const ARCHIVE_ROOT_ID: &str = "archive";
pub const LIST: &str = "article-sort";
pub const LIST_TITLE: &str = "article-sort-title";
pub const ITEM: &str = "article-sort-item";
pub const YEAR: &str = "year";

pub const ITEM_IMG: &str = "article-sort-item-img";
pub const ITEM_TITLE: &str = "article-sort-item-title";
pub const ITEM_TIME: &str = "article-sort-item-time";
pub const ITEM_INFO: &str = "article-sort-item-info";
pub const ITEM_TAGS: &str = "article-sort-item-tags";
pub const ARTICLE_TAG: &str = "article-tag";
pub const TAG_LINK: &str = "tag-link";

pub const CONTAINER: &str = "archive-container";
pub const CONTENT: &str = "archive-content";
pub const ARTICLES: &str = "archive-articles";

pub const STATS: &str = "archive-stats";
pub const STAT_CARD: &str = "stat-card";

pub const SIDEBAR: &str = "archive-timeline";
pub const NAV_ID: &str = "archive-timeline-nav";
pub const NAV_LINK: &str = "timeline-link";

pub const YEAR_HEADER: &str = "archive-year-header";
pub const YEAR_TOGGLE: &str = "year-toggle";
pub const YEAR_CONTENT: &str = "year-content";

pub const ACTIVE: &str = "active";
pub const IN_VIEW: &str = "in-view";
pub const COLLAPSED: &str = "collapsed";
pub const ROTATED: &str = "rotated";

pub const DATA_YEAR: &str = "data-year";
pub const DATA_INITIALIZED: &str = "data-initialized";
pub const DATA_SPY: &str = "data-spy";
pub const DATA_REVEAL: &str = "data-reveal";
pub const ARIA_EXPANDED: &str = "aria-expanded";

/// Id neo cho một năm, dùng cho cả liên kết sidebar lẫn header.
pub fn year_anchor(year: i32) -> String {
    format!("year-{year}")
}

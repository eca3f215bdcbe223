//! Danh sách lưu trữ dạng JSON và cách dựng lại markup server tương ứng.

use serde::{Deserialize, Serialize};

use crate::dom::{DocumentScope, DomResult};
use crate::markup::{ARCHIVE_ROOT_ID, ITEM, ITEM_IMG, ITEM_TIME, ITEM_TITLE, LIST, LIST_TITLE, TAG_LINK, YEAR};
use crate::memory::{MemoryDocument, NodeId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Listing {
    #[serde(default)]
    pub title: Option<String>,
    pub entries: Vec<ListingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingEntry {
    Year {
        text: String,
    },
    Item {
        title: String,
        #[serde(default)]
        time: Option<String>,
        #[serde(default)]
        thumbnail: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
    },
}

impl MemoryDocument {
    /// Dựng `#archive` giống trang server render, trả về node `.article-sort`.
    pub fn from_listing(listing: &Listing) -> DomResult<(Self, NodeId)> {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let root = doc.append_element(body, "div", &[]);
        doc.set_attribute(&root, "id", ARCHIVE_ROOT_ID)?;

        if let Some(title) = &listing.title {
            let title_el = doc.append_element(root, "div", &[LIST_TITLE]);
            doc.append_text(title_el, title);
        }

        let list = doc.append_element(root, "div", &[LIST]);
        for entry in &listing.entries {
            match entry {
                ListingEntry::Year { text } => {
                    let marker = doc.append_element(list, "div", &[ITEM, YEAR]);
                    doc.append_text(marker, text);
                }
                ListingEntry::Item {
                    title,
                    time,
                    thumbnail,
                    tags,
                } => {
                    let item = doc.append_element(list, "div", &[ITEM]);
                    if let Some(src) = thumbnail {
                        let link = doc.append_element(item, "a", &[ITEM_IMG]);
                        let img = doc.append_element(link, "img", &[]);
                        doc.set_attribute(&img, "src", src)?;
                        doc.set_attribute(&img, "alt", title)?;
                    }
                    if let Some(time) = time {
                        let holder = doc.append_element(item, "div", &[ITEM_TIME]);
                        let time_el = doc.append_element(holder, "time", &[]);
                        doc.set_attribute(&time_el, "datetime", time)?;
                        doc.append_text(time_el, time);
                    }
                    let title_el = doc.append_element(item, "a", &[ITEM_TITLE]);
                    doc.set_attribute(&title_el, "title", title)?;
                    doc.append_text(title_el, title);
                    for tag in tags {
                        let tag_el = doc.append_element(item, "a", &[TAG_LINK]);
                        doc.append_text(tag_el, tag);
                    }
                }
            }
        }
        Ok((doc, list))
    }
}

//! Pipeline khởi tạo timeline và trạng thái runtime sau khi khởi tạo.
//!
//! # Thứ tự
//! restructure → aggregate → stats → nav → headers → decorate → collapse →
//! scroll-spy → reveal. Mỗi bước tự bỏ qua khi markup đã được xử lý, nên chạy
//! lại nhiều lần trên cùng một DOM không nhân đôi khung hay listener.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use log::{debug, info, trace};

use crate::aggregate::{aggregate, collect_entries};
use crate::collapse::{self, header_year, CollapseState, CollapseTransition};
use crate::dom::{DocumentScope, DomResult, ObserverKind, ObserverSpec};
use crate::markup::{
    year_anchor, ACTIVE, ARCHIVE_ROOT_ID, DATA_REVEAL, DATA_SPY, DATA_YEAR, IN_VIEW, ITEM, LIST,
    NAV_LINK, YEAR, YEAR_HEADER,
};
use crate::model::{ArchiveView, TimelineLink, YearView};
use crate::reveal::{stagger_delay_ms, ObserveDecision, RevealState};
use crate::scroll::{FrameOutcome, ScrollAnimation, ScrollHandle, SmoothScroller};
use crate::spy::{ScrollSpyState, SpyChange};
use crate::stats::StatsSummary;
use crate::{decorate, headers, nav, restructure, stats, ArchiveConfig, ArchiveError};

#[derive(Debug, Default)]
pub struct ArchiveController {
    config: ArchiveConfig,
    revision: u64,
    scroll_ids: Arc<AtomicU64>,
}

impl ArchiveController {
    pub fn new(config: ArchiveConfig) -> Self {
        Self {
            config,
            revision: 0,
            scroll_ids: Arc::default(),
        }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Chạy toàn bộ pipeline trên `doc`.
    ///
    /// Thiếu `#archive` hoặc `.article-sort` trả về
    /// [`ArchiveError::MissingMarkup`] trước khi DOM bị chạm tới.
    pub fn run<D: DocumentScope>(
        &mut self,
        doc: &mut D,
        current_year: i32,
    ) -> Result<ArchiveRuntime<D::Node>, ArchiveError> {
        let root = doc
            .find_by_id(ARCHIVE_ROOT_ID)
            .ok_or(ArchiveError::MissingMarkup("#archive"))?;
        let list = doc
            .first_by_class(&root, LIST)
            .ok_or(ArchiveError::MissingMarkup(".article-sort"))?;

        self.revision += 1;
        debug!(
            "event=archive_pipeline status=start revision={}",
            self.revision
        );

        restructure::wrap(doc, &root, &list)?;

        let aggregation = aggregate(collect_entries(&*doc, &list));
        for marker in &aggregation.skipped {
            debug!("event=archive_pipeline stage=aggregate status=skipped marker={marker:?}");
        }

        let summary = StatsSummary::compute(&aggregation.groups, current_year);
        stats::render(doc, &root, &summary)?;

        let links: Vec<TimelineLink> = aggregation
            .groups
            .iter()
            .map(|group| TimelineLink::new(group.year, group.count()))
            .collect();
        nav::render(doc, &root, &links)?;

        headers::enhance(doc, &aggregation)?;

        let items: Vec<D::Node> = aggregation
            .groups
            .iter()
            .flat_map(|group| group.items.iter().cloned())
            .collect();
        for item in &items {
            decorate::decorate(doc, item)?;
        }
        let years = aggregation
            .groups
            .iter()
            .map(|group| YearView {
                year: group.year,
                anchor_id: group.anchor_id(),
                items: group
                    .items
                    .iter()
                    .map(|item| decorate::describe(&*doc, item))
                    .collect(),
            })
            .collect();

        collapse::wire(doc, &list)?;

        let header_nodes = doc.all_by_class(&list, YEAR_HEADER);
        let link_nodes = doc.all_by_class(&root, NAV_LINK);
        let spy = self.wire_scroll_spy(doc, &header_nodes, &link_nodes)?;
        let reveal = self.wire_reveal(doc, &items)?;

        let view = ArchiveView {
            revision: self.revision,
            current_year,
            stats: summary,
            years,
            links,
            skipped_markers: aggregation.skipped,
        };
        info!(
            "event=archive_pipeline status=ok revision={} years={} items={}",
            view.revision, summary.years, summary.total
        );

        Ok(ArchiveRuntime {
            config: self.config.clone(),
            view,
            headers: header_nodes,
            links: link_nodes,
            items,
            spy,
            reveal,
            scroller: SmoothScroller::with_ids(self.scroll_ids.clone()),
        })
    }

    fn wire_scroll_spy<D: DocumentScope>(
        &self,
        doc: &mut D,
        headers: &[D::Node],
        links: &[D::Node],
    ) -> DomResult<ScrollSpyState> {
        let active = headers
            .iter()
            .find(|header| doc.has_class(header, ACTIVE))
            .and_then(|header| header_year(&*doc, header));
        if headers.is_empty() || links.is_empty() {
            debug!("event=archive_pipeline stage=scroll_spy status=skipped reason=empty");
            return Ok(ScrollSpyState::new(active));
        }

        let spec = ObserverSpec {
            kind: ObserverKind::ScrollSpy,
            root_margin: self.config.spy_band.root_margin(),
            threshold: self.config.spy_band.threshold,
        };
        for header in headers {
            if doc.attribute(header, DATA_SPY).is_some() {
                continue;
            }
            doc.observe(header, &spec)?;
            doc.set_attribute(header, DATA_SPY, "true")?;
        }
        Ok(ScrollSpyState::new(active))
    }

    fn wire_reveal<D: DocumentScope>(
        &self,
        doc: &mut D,
        items: &[D::Node],
    ) -> DomResult<RevealState> {
        let mut state = RevealState::new(items.len());
        let spec = ObserverSpec {
            kind: ObserverKind::Reveal,
            root_margin: self.config.reveal_band.root_margin(),
            threshold: self.config.reveal_band.threshold,
        };
        for (index, item) in items.iter().enumerate() {
            if doc.has_class(item, IN_VIEW) {
                state.mark(index);
            }
            let delay = stagger_delay_ms(index, self.config.stagger_group, self.config.stagger_delay_ms);
            doc.set_style(item, "transition-delay", &format!("{delay}ms"))?;
            if doc.attribute(item, DATA_REVEAL).is_some() {
                continue;
            }
            doc.observe(item, &spec)?;
            doc.set_attribute(item, DATA_REVEAL, "true")?;
        }
        Ok(state)
    }
}

/// Trạng thái sống của timeline sau một lượt chạy pipeline.
///
/// Host chuyển sự kiện (click, giao cắt viewport, timer, animation frame)
/// vào các phương thức bên dưới.
#[derive(Debug)]
pub struct ArchiveRuntime<N> {
    config: ArchiveConfig,
    view: ArchiveView,
    headers: Vec<N>,
    links: Vec<N>,
    items: Vec<N>,
    spy: ScrollSpyState,
    reveal: RevealState,
    scroller: SmoothScroller,
}

impl<N: Clone + PartialEq> ArchiveRuntime<N> {
    pub fn view(&self) -> &ArchiveView {
        &self.view
    }

    pub fn into_view(self) -> ArchiveView {
        self.view
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn headers(&self) -> &[N] {
        &self.headers
    }

    pub fn links(&self) -> &[N] {
        &self.links
    }

    pub fn items(&self) -> &[N] {
        &self.items
    }

    pub fn active_year(&self) -> Option<i32> {
        self.spy.active()
    }

    pub fn reveal_state(&self) -> &RevealState {
        &self.reveal
    }

    /// Thời gian chờ trước khi gọi [`Self::settle_expanded`], `None` nếu vừa thu gọn.
    pub fn settle_delay_ms(&self, transition: &CollapseTransition<N>) -> Option<u32> {
        (transition.state == CollapseState::Expanded).then_some(self.config.settle_delay_ms)
    }

    pub fn toggle_header<D: DocumentScope<Node = N>>(
        &mut self,
        doc: &mut D,
        header: &N,
    ) -> DomResult<Option<CollapseTransition<N>>> {
        collapse::toggle(doc, header)
    }

    pub fn toggle_year<D: DocumentScope<Node = N>>(
        &mut self,
        doc: &mut D,
        year: i32,
    ) -> DomResult<Option<CollapseTransition<N>>> {
        let Some(header) = self
            .headers
            .iter()
            .find(|header| header_year(&*doc, header) == Some(year))
            .cloned()
        else {
            return Ok(None);
        };
        self.toggle_header(doc, &header)
    }

    /// Đánh dấu mọi bài trong khối vừa mở là `in-view`, bỏ qua observer.
    pub fn settle_expanded<D: DocumentScope<Node = N>>(
        &mut self,
        doc: &mut D,
        block: &N,
    ) -> DomResult<usize> {
        let mut marked = 0;
        for item in doc.all_by_class(block, ITEM) {
            if doc.has_class(&item, YEAR) {
                continue;
            }
            doc.add_class(&item, IN_VIEW)?;
            if let Some(index) = self.items.iter().position(|known| *known == item) {
                if self.reveal.mark(index) {
                    marked += 1;
                }
            }
        }
        trace!("event=archive_reveal source=settle marked={marked}");
        Ok(marked)
    }

    /// Header vừa đi vào vùng quan sát của scroll-spy.
    pub fn header_intersecting<D: DocumentScope<Node = N>>(
        &mut self,
        doc: &mut D,
        header: &N,
    ) -> DomResult<Option<SpyChange>> {
        if self.headers.is_empty() || self.links.is_empty() {
            return Ok(None);
        }
        let Some(year) = header_year(&*doc, header) else {
            return Ok(None);
        };
        let change = self.spy.header_entered(year);

        for node in self.headers.iter().chain(self.links.iter()) {
            doc.remove_class(node, ACTIVE)?;
        }
        doc.add_class(header, ACTIVE)?;
        let year_attr = year.to_string();
        let link = self
            .links
            .iter()
            .find(|link| doc.attribute(link, DATA_YEAR).as_deref() == Some(year_attr.as_str()))
            .cloned();
        if let Some(link) = link {
            doc.add_class(&link, ACTIVE)?;
        }
        trace!("event=archive_spy active={year}");
        Ok(Some(change))
    }

    /// Bài viết thay đổi trạng thái giao cắt; hiện một lần rồi ngừng quan sát.
    pub fn item_intersecting<D: DocumentScope<Node = N>>(
        &mut self,
        doc: &mut D,
        item: &N,
        is_intersecting: bool,
    ) -> DomResult<ObserveDecision> {
        if !is_intersecting {
            return Ok(ObserveDecision::Keep);
        }
        if !doc.has_class(item, IN_VIEW) {
            doc.add_class(item, IN_VIEW)?;
        }
        if let Some(index) = self.items.iter().position(|known| known == item) {
            self.reveal.mark(index);
        }
        Ok(ObserveDecision::Stop)
    }

    /// Bắt đầu cuộn mượt tới neo `year-<N>`, huỷ lần cuộn trước nếu còn chạy.
    pub fn navigate_to<D: DocumentScope<Node = N>>(
        &mut self,
        doc: &D,
        year: i32,
    ) -> Option<ScrollHandle> {
        let anchor = doc.find_by_id(&year_anchor(year))?;
        let target = doc.document_top(&anchor) - self.config.header_offset_px;
        let animation =
            ScrollAnimation::new(doc.scroll_y(), target, self.config.smooth_scroll_duration_ms);
        debug!("event=archive_scroll year={year} target={target}");
        Some(self.scroller.start(animation))
    }

    pub fn scroll_frame<D: DocumentScope<Node = N>>(
        &mut self,
        doc: &mut D,
        handle: ScrollHandle,
        now: f64,
    ) -> DomResult<FrameOutcome> {
        let outcome = self.scroller.frame(handle, now);
        match outcome {
            FrameOutcome::Continue { position } | FrameOutcome::Finished { position } => {
                doc.scroll_to(position)?;
            }
            FrameOutcome::Cancelled => {}
        }
        Ok(outcome)
    }
}

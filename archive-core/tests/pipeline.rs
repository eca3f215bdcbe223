use std::fs;

use archive_core::markup::{
    ACTIVE, ARIA_EXPANDED, COLLAPSED, DATA_REVEAL, IN_VIEW, ITEM, ITEM_INFO, NAV_LINK, ROTATED,
    YEAR_CONTENT, YEAR_HEADER, YEAR_TOGGLE,
};
use archive_core::{
    ArchiveConfig, ArchiveController, ArchiveError, ArchiveRuntime, CollapseState, DocumentScope,
    FrameOutcome, Listener, Listing, MemoryDocument, NodeId, ObserveDecision, ObserverKind,
    StatsSummary,
};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn load(name: &str) -> (MemoryDocument, NodeId) {
    let raw = fs::read_to_string(fixture_path(name)).expect("Không đọc được listing mẫu");
    let listing: Listing = serde_json::from_str(&raw).expect("Listing mẫu không hợp lệ");
    MemoryDocument::from_listing(&listing).expect("Không dựng được tài liệu")
}

fn run(doc: &mut MemoryDocument) -> ArchiveRuntime<NodeId> {
    ArchiveController::new(ArchiveConfig::default())
        .run(doc, 2024)
        .expect("Pipeline thất bại")
}

fn header(doc: &MemoryDocument, year: i32) -> NodeId {
    doc.find_by_id(&format!("year-{year}"))
        .expect("Không tìm thấy header năm")
}

fn active_count(doc: &MemoryDocument, nodes: &[NodeId]) -> usize {
    nodes.iter().filter(|node| doc.has_class(node, ACTIVE)).count()
}

#[test]
fn two_year_listing_builds_stats_and_sidebar() {
    let (mut doc, _) = load("two_years.json");
    let runtime = run(&mut doc);
    let view = runtime.view();

    assert_eq!(
        view.stats,
        StatsSummary {
            total: 4,
            years: 2,
            this_year: 3,
            avg_per_year: 2,
        }
    );
    let labels: Vec<String> = view.links.iter().map(|link| link.label()).collect();
    assert_eq!(labels, vec!["2024 (3)", "2023 (1)"]);

    let body = doc.body();
    let links = doc.all_by_class(&body, NAV_LINK);
    assert_eq!(links.len(), 2);
    assert_eq!(doc.attribute(&links[0], "href").as_deref(), Some("#year-2024"));
    assert_eq!(doc.attribute(&links[1], "data-year").as_deref(), Some("2023"));
    assert_eq!(doc.text(&links[0]), "20243");

    let cards = doc.all_by_class(&body, "stat-card");
    let values: Vec<String> = cards
        .iter()
        .filter_map(|card| doc.first_by_class(card, "stat-value"))
        .map(|value| doc.text(&value))
        .collect();
    assert_eq!(values, vec!["4", "2", "3", "2"]);
    assert!(doc.has_class(&cards[0], "primary"));
    assert!(doc.has_class(&cards[2], "accent"));
}

#[test]
fn skeleton_orders_title_stats_and_content() {
    let (mut doc, list) = load("two_years.json");
    run(&mut doc);

    let body = doc.body();
    let container = doc
        .first_by_class(&body, "archive-container")
        .expect("Thiếu container");
    let classes: Vec<String> = doc
        .children(&container)
        .iter()
        .map(|child| doc.classes(*child).join(" "))
        .collect();
    assert_eq!(
        classes,
        vec!["article-sort-title", "archive-stats", "archive-content"]
    );

    let articles = doc.parent(&list).expect("Danh sách chưa được bọc");
    assert!(doc.has_class(&articles, "archive-articles"));
    let content = doc.parent(&articles).expect("Thiếu content");
    let first = doc.children(&content)[0];
    assert!(doc.has_class(&first, "archive-timeline"));
}

#[test]
fn headers_are_enhanced_with_toggle_and_count() {
    let (mut doc, _) = load("two_years.json");
    run(&mut doc);

    let header = header(&doc, 2024);
    assert!(doc.has_class(&header, YEAR_HEADER));
    let count = doc.first_by_class(&header, "year-count").expect("Thiếu year-count");
    assert_eq!(doc.text(&count), "3 posts");
    let toggle = doc.first_by_class(&header, YEAR_TOGGLE).expect("Thiếu nút toggle");
    assert_eq!(doc.attribute(&toggle, ARIA_EXPANDED).as_deref(), Some("true"));
    assert_eq!(doc.attribute(&toggle, "data-year").as_deref(), Some("2024"));
    assert!(doc
        .listeners()
        .contains(&(header, Listener::YearHeader { year: 2024 })));
}

#[test]
fn items_are_decorated_and_described() {
    let (mut doc, _) = load("two_years.json");
    let runtime = run(&mut doc);

    let first = runtime.items()[0];
    let info = doc.first_by_class(&first, ITEM_INFO).expect("Thiếu khối info");
    let tags = doc
        .first_by_class(&info, "article-sort-item-tags")
        .expect("Thiếu khối tag");
    assert_eq!(doc.all_by_class(&tags, "article-tag").len(), 2);
    assert_eq!(doc.style(first, "transition-delay"), Some("0ms"));
    assert_eq!(doc.style(runtime.items()[1], "transition-delay"), Some("40ms"));

    let year = runtime.view().year(2024).expect("Thiếu năm 2024");
    let item = &year.items[0];
    assert_eq!(item.title, "Writing a timeline in Rust");
    assert_eq!(item.thumbnail.as_deref(), Some("/img/timeline.png"));
    assert_eq!(item.tags, vec!["rust", "wasm"]);
    assert_eq!(
        item.published,
        chrono::NaiveDate::from_ymd_opt(2024, 9, 12)
    );
    assert_eq!(
        year.items[1].published,
        chrono::NaiveDate::from_ymd_opt(2024, 5, 3)
    );
}

#[test]
fn malformed_marker_is_left_untouched() {
    let (mut doc, list) = load("malformed_marker.json");
    let raw_children = doc.children(&list);
    let runtime = run(&mut doc);
    let view = runtime.view();

    assert_eq!(view.skipped_markers, vec!["Archive"]);
    assert_eq!(view.stats.total, 3);
    let years: Vec<i32> = view.years.iter().map(|year| year.year).collect();
    assert_eq!(years, vec![2022, 2021]);

    let marker = raw_children[3];
    assert_eq!(doc.text(&marker), "Archive");
    assert_eq!(doc.classes(marker), ["article-sort-item", "year"]);
    assert_eq!(doc.attribute(&marker, "id"), None);
    for orphan in &raw_children[4..6] {
        assert!(doc.first_by_class(orphan, ITEM_INFO).is_none());
        assert_eq!(doc.style(*orphan, "transition-delay"), None);
        assert_eq!(doc.attribute(orphan, "data-reveal"), None);
    }
}

#[test]
fn collapse_block_stops_at_next_marker() {
    let (mut doc, list) = load("malformed_marker.json");
    let raw_children = doc.children(&list);
    let mut runtime = run(&mut doc);

    let transition = runtime
        .toggle_year(&mut doc, 2022)
        .expect("Toggle lỗi")
        .expect("Năm 2022 phải có toggle");
    assert_eq!(doc.children(&transition.block), raw_children[1..3].to_vec());
    assert_eq!(doc.parent(&raw_children[4]), Some(list));
}

#[test]
fn rerunning_pipeline_changes_nothing() {
    let (mut doc, _) = load("two_years.json");
    let mut controller = ArchiveController::new(ArchiveConfig::default());
    let first = controller.run(&mut doc, 2024).expect("Lượt đầu thất bại");
    let html = doc.to_html();
    let listeners = doc.listeners().len();
    let observed = doc.observed().len();

    let second = controller.run(&mut doc, 2024).expect("Lượt hai thất bại");

    assert_eq!(doc.to_html(), html);
    assert_eq!(doc.listeners().len(), listeners);
    assert_eq!(doc.observed().len(), observed);
    assert_eq!(second.view().stats, first.view().stats);
    assert_eq!(second.view().links, first.view().links);
    assert_eq!(second.view().revision, first.view().revision + 1);
}

#[test]
fn rerun_after_toggle_keeps_collapsed_block() {
    let (mut doc, _) = load("two_years.json");
    let mut controller = ArchiveController::new(ArchiveConfig::default());
    let mut runtime = controller.run(&mut doc, 2024).expect("Pipeline thất bại");
    runtime.toggle_year(&mut doc, 2024).expect("Toggle lỗi");
    let html = doc.to_html();

    let rerun = controller.run(&mut doc, 2024).expect("Chạy lại thất bại");

    assert_eq!(doc.to_html(), html);
    assert_eq!(rerun.view().stats.total, 4);
    assert_eq!(rerun.view().year(2024).map(|year| year.count()), Some(3));
}

#[test]
fn toggling_twice_restores_state() {
    let (mut doc, _) = load("two_years.json");
    let mut runtime = run(&mut doc);
    let header = header(&doc, 2024);
    let toggle = doc.first_by_class(&header, YEAR_TOGGLE).expect("Thiếu nút toggle");

    let collapsed = runtime
        .toggle_header(&mut doc, &header)
        .expect("Toggle lỗi")
        .expect("Thiếu transition");
    assert_eq!(collapsed.state, CollapseState::Collapsed);
    assert_eq!(runtime.settle_delay_ms(&collapsed), None);
    assert_eq!(doc.attribute(&toggle, ARIA_EXPANDED).as_deref(), Some("false"));
    assert!(doc.has_class(&collapsed.block, COLLAPSED));
    assert!(doc.has_class(&toggle, ROTATED));
    assert!(doc.has_class(&collapsed.block, YEAR_CONTENT));
    assert_eq!(doc.all_by_class(&collapsed.block, ITEM).len(), 3);

    let expanded = runtime
        .toggle_header(&mut doc, &header)
        .expect("Toggle lỗi")
        .expect("Thiếu transition");
    assert_eq!(expanded.state, CollapseState::Expanded);
    assert_eq!(expanded.block, collapsed.block);
    assert_eq!(runtime.settle_delay_ms(&expanded), Some(100));
    assert_eq!(doc.attribute(&toggle, ARIA_EXPANDED).as_deref(), Some("true"));
    assert!(!doc.has_class(&expanded.block, COLLAPSED));
    assert!(!doc.has_class(&toggle, ROTATED));

    let marked = runtime
        .settle_expanded(&mut doc, &expanded.block)
        .expect("Settle lỗi");
    assert_eq!(marked, 3);
    assert!(doc
        .all_by_class(&expanded.block, ITEM)
        .iter()
        .all(|item| doc.has_class(item, IN_VIEW)));
}

#[test]
fn scroll_spy_keeps_single_matching_active() {
    let (mut doc, _) = load("two_years.json");
    let mut runtime = run(&mut doc);
    let headers = runtime.headers().to_vec();
    let links = runtime.links().to_vec();

    for year in [2024, 2023, 2024, 2023] {
        let entered = header(&doc, year);
        let change = runtime
            .header_intersecting(&mut doc, &entered)
            .expect("Spy lỗi")
            .expect("Spy phải phản hồi");
        assert_eq!(change.current, year);

        assert_eq!(active_count(&doc, &headers), 1);
        assert_eq!(active_count(&doc, &links), 1);
        let active_link = links
            .iter()
            .find(|link| doc.has_class(link, ACTIVE))
            .expect("Thiếu link active");
        assert_eq!(
            doc.attribute(active_link, "data-year"),
            Some(year.to_string())
        );
    }
    assert_eq!(runtime.active_year(), Some(2023));

    let observed_spy = doc
        .observed()
        .iter()
        .filter(|(_, spec)| spec.kind == ObserverKind::ScrollSpy)
        .count();
    assert_eq!(observed_spy, 2);
}

#[test]
fn reveal_is_one_shot() {
    let (mut doc, _) = load("two_years.json");
    let mut runtime = run(&mut doc);
    let item = runtime.items()[2];

    assert_eq!(
        runtime.item_intersecting(&mut doc, &item, false).expect("Reveal lỗi"),
        ObserveDecision::Keep
    );
    assert!(!doc.has_class(&item, IN_VIEW));
    assert_eq!(
        runtime.item_intersecting(&mut doc, &item, true).expect("Reveal lỗi"),
        ObserveDecision::Stop
    );
    assert!(doc.has_class(&item, IN_VIEW));
    assert!(runtime.reveal_state().is_revealed(2));
    assert_eq!(runtime.reveal_state().revealed_count(), 1);
}

#[test]
fn navigation_lands_below_fixed_header() {
    let (mut doc, _) = load("two_years.json");
    let mut runtime = run(&mut doc);
    let target = header(&doc, 2023);
    doc.set_document_top(target, 900.0);
    doc.scroll_to(50.0).expect("Không cuộn được");

    let stale = runtime.navigate_to(&doc, 2024).expect("Thiếu neo 2024");
    let handle = runtime.navigate_to(&doc, 2023).expect("Thiếu neo 2023");
    assert_eq!(
        runtime.scroll_frame(&mut doc, stale, 0.0).expect("Frame lỗi"),
        FrameOutcome::Cancelled
    );

    let mut now = 0.0;
    let mut last = doc.scroll_y();
    loop {
        let outcome = runtime.scroll_frame(&mut doc, handle, now).expect("Frame lỗi");
        assert!(doc.scroll_y() >= last);
        last = doc.scroll_y();
        if let FrameOutcome::Finished { .. } = outcome {
            break;
        }
        now += 33.0;
    }
    assert_eq!(doc.scroll_y(), 800.0);
    assert_eq!(runtime.navigate_to(&doc, 1999), None);
}

#[test]
fn missing_markup_is_reported_without_mutation() {
    let mut doc = MemoryDocument::new();
    let html = doc.to_html();
    let err = ArchiveController::default()
        .run(&mut doc, 2024)
        .expect_err("Phải báo thiếu markup");
    assert_eq!(err, ArchiveError::MissingMarkup("#archive"));
    assert_eq!(doc.to_html(), html);

    let listing = Listing::default();
    let (mut doc, list) = MemoryDocument::from_listing(&listing).expect("Không dựng được tài liệu");
    let runtime = ArchiveController::default()
        .run(&mut doc, 2024)
        .expect("Danh sách rỗng vẫn hợp lệ");
    assert_eq!(runtime.view().stats, StatsSummary::default());
    assert!(runtime.view().links.is_empty());
    assert!(doc.parent(&list).is_some());
}

/// Bài không thuộc nhóm nào giữ nguyên HTML gốc: không marker reveal, không
/// độ trễ, không khối info. Stylesheet chỉ ẩn bài có `data-reveal`.
fn assert_plain_item(doc: &MemoryDocument, item: NodeId, list: NodeId) {
    assert_eq!(doc.parent(&item), Some(list));
    assert_eq!(doc.attribute(&item, DATA_REVEAL), None);
    assert_eq!(doc.style(item, "transition-delay"), None);
    assert!(!doc.has_class(&item, IN_VIEW));
    assert!(doc.first_by_class(&item, ITEM_INFO).is_none());
    assert_eq!(doc.listener_count(item), 0);
}

#[test]
fn grouped_items_all_carry_reveal_marker() {
    let (mut doc, _) = load("two_years.json");
    let runtime = run(&mut doc);

    assert_eq!(runtime.items().len(), 4);
    for item in runtime.items() {
        assert_eq!(doc.attribute(item, DATA_REVEAL).as_deref(), Some("true"));
    }
}

#[test]
fn duplicate_year_markers_keep_a_single_header() {
    let (mut doc, list) = load("duplicate_year.json");
    let raw = doc.children(&list);
    let mut controller = ArchiveController::new(ArchiveConfig::default());
    let mut runtime = controller.run(&mut doc, 2024).expect("Pipeline thất bại");

    let labels: Vec<String> = runtime.view().links.iter().map(|link| link.label()).collect();
    assert_eq!(labels, vec!["2024 (2)", "2023 (1)"]);
    assert_eq!(runtime.view().stats.total, 3);
    let titles: Vec<&str> = runtime
        .view()
        .year(2024)
        .map(|year| year.items.iter().map(|item| item.title.as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, vec!["Late B", "Late C"]);

    let enhanced = header(&doc, 2024);
    assert_eq!(enhanced, raw[2]);
    let count = doc
        .first_by_class(&enhanced, "year-count")
        .expect("Thiếu số bài");
    assert_eq!(doc.text(&count), "2 posts");

    let superseded = raw[0];
    assert_eq!(doc.text(&superseded), "2024");
    assert_eq!(doc.classes(superseded), ["article-sort-item", "year"]);
    assert_eq!(doc.attribute(&superseded, "id"), None);
    assert_eq!(doc.listener_count(superseded), 0);
    assert_plain_item(&doc, raw[1], list);

    let html = doc.to_html();
    controller.run(&mut doc, 2024).expect("Chạy lại thất bại");
    assert_eq!(doc.to_html(), html);

    let transition = runtime
        .toggle_year(&mut doc, 2024)
        .expect("Toggle lỗi")
        .expect("Năm 2024 phải có toggle");
    assert_eq!(doc.children(&transition.block), raw[3..5].to_vec());
    assert_eq!(doc.parent(&raw[1]), Some(list));
}

#[test]
fn items_before_first_marker_stay_plain() {
    let (mut doc, list) = load("leading_items.json");
    let raw = doc.children(&list);
    let runtime = run(&mut doc);

    assert_eq!(runtime.view().stats.total, 1);
    assert_eq!(runtime.items(), &raw[3..4]);
    for loose in &raw[..2] {
        assert_plain_item(&doc, *loose, list);
    }
    let observed_reveal = doc
        .observed()
        .iter()
        .filter(|(_, spec)| spec.kind == ObserverKind::Reveal)
        .count();
    assert_eq!(observed_reveal, 1);
}

#[test]
fn missing_list_is_reported_without_mutation() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let root = doc.append_element(body, "div", &[]);
    doc.set_attribute(&root, "id", "archive").expect("Không gán được id");
    let title = doc.append_element(root, "h1", &["article-sort-title"]);
    doc.append_text(title, "Archives");
    let html = doc.to_html();

    let err = ArchiveController::default()
        .run(&mut doc, 2024)
        .expect_err("Phải báo thiếu danh sách");

    assert_eq!(err, ArchiveError::MissingMarkup(".article-sort"));
    assert_eq!(doc.to_html(), html);
    assert!(doc.listeners().is_empty());
    assert!(doc.observed().is_empty());
}

#[test]
fn scroll_handles_do_not_leak_across_reruns() {
    let (mut doc, _) = load("two_years.json");
    let mut controller = ArchiveController::new(ArchiveConfig::default());
    let mut first = controller.run(&mut doc, 2024).expect("Lượt đầu thất bại");
    let old = first.navigate_to(&doc, 2024).expect("Thiếu neo 2024");

    let mut second = controller.run(&mut doc, 2024).expect("Lượt hai thất bại");
    let fresh = second.navigate_to(&doc, 2023).expect("Thiếu neo 2023");

    assert_ne!(old, fresh);
    assert_eq!(
        second.scroll_frame(&mut doc, old, 0.0).expect("Frame lỗi"),
        FrameOutcome::Cancelled
    );
}

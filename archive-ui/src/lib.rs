//! Gắn timeline lưu trữ vào trang thật (web-sys) và nối các sự kiện trình duyệt.

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::browser::BrowserDocument;
    use crate::styles;
    use archive_core::{
        is_archive_page, ArchiveConfig, ArchiveController, ArchiveError, ArchiveRuntime,
        FrameOutcome, ObserveDecision, ReinitTrigger, ScrollHandle,
    };
    use chrono::{Datelike, Local};
    use gloo_timers::callback::Timeout;
    use js_sys::Array;
    use serde_wasm_bindgen::{from_value, to_value};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{console, Element, Event, IntersectionObserver, IntersectionObserverEntry};

    type FrameCallback = Closure<dyn FnMut(f64)>;

    thread_local! {
        static CONTROLLER: RefCell<ArchiveController> = RefCell::new(ArchiveController::default());
        static RUNTIME: RefCell<Option<ArchiveRuntime<Element>>> = const { RefCell::new(None) };
        static TRIGGERS_INSTALLED: Cell<bool> = const { Cell::new(false) };
    }

    fn report(err: &ArchiveError) {
        console::error_1(&JsValue::from_str(&format!("archive-ui: {err}")));
    }

    /// Chạy `f` trên runtime hiện hành; lỗi được ghi ra console.
    fn with_runtime<T>(
        f: impl FnOnce(&mut ArchiveRuntime<Element>, &mut BrowserDocument) -> Result<T, ArchiveError>,
    ) -> Option<T> {
        let mut doc = BrowserDocument::current()?;
        RUNTIME.with(|slot| {
            let mut slot = slot.borrow_mut();
            let runtime = slot.as_mut()?;
            match f(runtime, &mut doc) {
                Ok(value) => Some(value),
                Err(err) => {
                    report(&err);
                    None
                }
            }
        })
    }

    fn clear_runtime() {
        RUNTIME.with(|slot| slot.borrow_mut().take());
    }

    fn run_pipeline(trigger: ReinitTrigger) -> Option<JsValue> {
        let mut doc = BrowserDocument::current()?;
        if !trigger.should_run(doc.is_hidden()) {
            return None;
        }
        if !is_archive_page(doc.has_list(), &doc.path()) {
            clear_runtime();
            return None;
        }

        let year = Local::now().year();
        let result = CONTROLLER.with(|controller| controller.borrow_mut().run(&mut doc, year));
        let runtime = match result {
            Ok(runtime) => runtime,
            Err(ArchiveError::MissingMarkup(what)) => {
                clear_runtime();
                console::debug_1(&JsValue::from_str(&format!(
                    "archive-ui: bỏ qua {trigger:?}, thiếu {what}"
                )));
                return None;
            }
            Err(err) => {
                clear_runtime();
                report(&err);
                return None;
            }
        };

        if let Err(err) = styles::ensure_styles(doc.document()) {
            console::error_1(&err);
        }
        let view = to_value(runtime.view()).ok();
        RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
        view
    }

    fn install_triggers(doc: &BrowserDocument) -> Result<(), JsValue> {
        if TRIGGERS_INSTALLED.with(|installed| installed.replace(true)) {
            return Ok(());
        }
        let document = doc.document();
        for trigger in [ReinitTrigger::NavigationComplete, ReinitTrigger::VisibilityChange] {
            let callback = Closure::wrap(Box::new(move |_event: Event| {
                run_pipeline(trigger);
            }) as Box<dyn FnMut(Event)>);
            document.add_event_listener_with_callback(
                trigger.event_name(),
                callback.as_ref().unchecked_ref(),
            )?;
            callback.forget();
        }
        Ok(())
    }

    pub(crate) fn on_nav_click(event: &Event, year: i32) {
        event.prevent_default();
        if let Some(Some(handle)) = with_runtime(|runtime, doc| Ok(runtime.navigate_to(&*doc, year))) {
            drive_scroll(handle);
        }
    }

    pub(crate) fn on_header_click(header: &Element) {
        let settle = with_runtime(|runtime, doc| {
            let transition = runtime.toggle_header(doc, header)?;
            Ok(transition.and_then(|transition| {
                runtime
                    .settle_delay_ms(&transition)
                    .map(|delay| (transition.block, delay))
            }))
        });
        if let Some(Some((block, delay))) = settle {
            Timeout::new(delay, move || {
                with_runtime(|runtime, doc| runtime.settle_expanded(doc, &block));
            })
            .forget();
        }
    }

    fn intersection_entries(entries: &Array) -> Vec<IntersectionObserverEntry> {
        entries
            .iter()
            .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
            .collect()
    }

    pub(crate) fn on_spy_entries(entries: Array) {
        for entry in intersection_entries(&entries) {
            if !entry.is_intersecting() {
                continue;
            }
            let header = entry.target();
            with_runtime(|runtime, doc| runtime.header_intersecting(doc, &header));
        }
    }

    pub(crate) fn on_reveal_entries(entries: Array, observer: &IntersectionObserver) {
        for entry in intersection_entries(&entries) {
            let item = entry.target();
            let decision = with_runtime(|runtime, doc| {
                runtime.item_intersecting(doc, &item, entry.is_intersecting())
            });
            if decision == Some(ObserveDecision::Stop) {
                observer.unobserve(&item);
            }
        }
    }

    fn request_frame(callback: &FrameCallback) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(err) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            console::error_1(&err);
        }
    }

    /// Vòng animation frame cho một lần cuộn; dừng khi tới đích hoặc bị huỷ.
    fn drive_scroll(handle: ScrollHandle) {
        let frame: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let next = frame.clone();
        *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            let outcome = with_runtime(|runtime, doc| runtime.scroll_frame(doc, handle, now));
            if let Some(FrameOutcome::Continue { .. }) = outcome {
                if let Some(callback) = next.borrow().as_ref() {
                    request_frame(callback);
                }
            } else {
                let _ = next.borrow_mut().take();
            }
        }) as Box<dyn FnMut(f64)>));
        if let Some(callback) = frame.borrow().as_ref() {
            request_frame(callback);
        };
    }

    /// Cài timeline lưu trữ cho trang hiện tại và các lần chuyển trang sau đó.
    #[wasm_bindgen]
    pub fn install_archive_enhancer(config: Option<JsValue>) -> Result<(), JsValue> {
        let config = match config {
            Some(js_cfg) => from_value::<ArchiveConfig>(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?,
            None => ArchiveConfig::default(),
        };
        CONTROLLER.with(|controller| *controller.borrow_mut() = ArchiveController::new(config));

        let doc = BrowserDocument::current()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;
        install_triggers(&doc)?;

        if doc.is_loading() {
            let trigger = ReinitTrigger::DocumentReady;
            let callback = Closure::once(move |_event: Event| {
                run_pipeline(trigger);
            });
            doc.document().add_event_listener_with_callback(
                trigger.event_name(),
                callback.as_ref().unchecked_ref(),
            )?;
            callback.forget();
        } else {
            run_pipeline(ReinitTrigger::DocumentReady);
        }
        Ok(())
    }

    /// Chạy lại pipeline ngay lập tức, trả về ViewModel (hoặc `undefined`).
    #[wasm_bindgen]
    pub fn refresh_archive() -> JsValue {
        run_pipeline(ReinitTrigger::NavigationComplete).unwrap_or(JsValue::UNDEFINED)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{install_archive_enhancer, refresh_archive};

#[cfg(not(target_arch = "wasm32"))]
pub fn install_archive_enhancer(_: Option<wasm_bindgen::JsValue>) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "archive-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}

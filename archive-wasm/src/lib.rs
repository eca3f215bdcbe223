//! Bridge WASM <-> JavaScript trung lập framework: JSON listing vào, ArchiveView ra.

use archive_core::{
    ArchiveConfig, ArchiveController, ArchiveError, ArchiveView, Listing, MemoryDocument,
    ViewportBand,
};
use chrono::{Datelike, Local};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
struct JsArchiveConfig {
    #[serde(default)]
    stagger_delay_ms: Option<u32>,
    #[serde(default)]
    stagger_group: Option<usize>,
    #[serde(default)]
    smooth_scroll_duration_ms: Option<f64>,
    #[serde(default)]
    header_offset_px: Option<f64>,
    #[serde(default)]
    settle_delay_ms: Option<u32>,
    #[serde(default)]
    spy_band: Option<ViewportBand>,
    #[serde(default)]
    reveal_band: Option<ViewportBand>,
}

impl From<JsArchiveConfig> for ArchiveConfig {
    fn from(cfg: JsArchiveConfig) -> Self {
        let mut base = ArchiveConfig::default();
        if let Some(delay) = cfg.stagger_delay_ms {
            base.stagger_delay_ms = delay;
        }
        if let Some(group) = cfg.stagger_group {
            base.stagger_group = group;
        }
        if let Some(duration) = cfg.smooth_scroll_duration_ms {
            base.smooth_scroll_duration_ms = duration;
        }
        if let Some(offset) = cfg.header_offset_px {
            base.header_offset_px = offset;
        }
        if let Some(delay) = cfg.settle_delay_ms {
            base.settle_delay_ms = delay;
        }
        if let Some(band) = cfg.spy_band {
            base.spy_band = band;
        }
        if let Some(band) = cfg.reveal_band {
            base.reveal_band = band;
        }
        base
    }
}

/// Dựng tài liệu từ listing, chạy pipeline và trả về ViewModel.
pub fn summarize_listing_value(
    value: &serde_json::Value,
    config: &ArchiveConfig,
    current_year: i32,
) -> Result<ArchiveView, ArchiveError> {
    let listing: Listing = serde_json::from_value(value.clone())
        .map_err(|err| ArchiveError::InvalidListing(err.to_string()))?;
    let (mut doc, _) = MemoryDocument::from_listing(&listing)?;
    let runtime = ArchiveController::new(config.clone()).run(&mut doc, current_year)?;
    Ok(runtime.into_view())
}

#[wasm_bindgen]
pub fn summarize_listing(
    input_listing: JsValue,
    config: Option<JsValue>,
    current_year: Option<i32>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let listing_value = from_value::<serde_json::Value>(input_listing)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON listing: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsArchiveConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            ArchiveConfig::from(cfg)
        }
        None => ArchiveConfig::default(),
    };
    let year = current_year.unwrap_or_else(|| Local::now().year());

    let view = summarize_listing_value(&listing_value, &cfg, year)
        .map_err(|err| JsValue::from_str(&format_archive_error(err)))?;

    to_value(&view).map_err(|err| JsValue::from_str(&format!("Không serialize view: {err}")))
}

fn format_archive_error(err: ArchiveError) -> String {
    format!("Archive error: {err}")
}

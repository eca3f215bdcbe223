use std::path::PathBuf;

use anyhow::Context;
use archive_core::{ArchiveConfig, ArchiveController, Listing, MemoryDocument};
use chrono::{Datelike, Local};
use clap::{Parser, ValueEnum};
use log::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "archive-cli",
    about = "Dựng timeline lưu trữ từ listing JSON và in thống kê, sidebar."
)]
struct Args {
    /// Đường dẫn tới file JSON listing.
    #[arg(short, long)]
    input: PathBuf,

    /// File JSON ghi đè `ArchiveConfig` (các trường thiếu giữ mặc định).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Năm hiện tại dùng cho thẻ "This Year" (mặc định: theo đồng hồ máy).
    #[arg(long)]
    current_year: Option<i32>,

    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// In thêm HTML sau khi nâng cấp.
    #[arg(long)]
    html: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;
    let listing: Listing = serde_json::from_str(&data)
        .with_context(|| format!("Listing không hợp lệ trong {:?}", args.input))?;

    let config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được config {path:?}"))?;
            serde_json::from_str::<ArchiveConfig>(&raw)
                .with_context(|| format!("Config không hợp lệ trong {path:?}"))?
        }
        None => ArchiveConfig::default(),
    };

    let (mut doc, _) = MemoryDocument::from_listing(&listing)?;
    let current_year = args.current_year.unwrap_or_else(|| Local::now().year());
    let runtime = ArchiveController::new(config).run(&mut doc, current_year)?;
    let view = runtime.view();
    info!(
        "event=archive_cli status=ok years={} items={}",
        view.stats.years, view.stats.total
    );

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(view)?),
        Format::Text => {
            println!(
                "Total posts: {}\nYears: {}\nThis year ({}): {}\nAvg/year: {}",
                view.stats.total,
                view.stats.years,
                view.current_year,
                view.stats.this_year,
                view.stats.avg_per_year
            );
            println!("Timeline:");
            for link in &view.links {
                println!("  {}  {}", link.label(), link.href);
            }
            if !view.skipped_markers.is_empty() {
                println!("Skipped markers: {}", view.skipped_markers.join(", "));
            }
        }
    }

    if args.html {
        println!("{}", doc.to_html());
    }
    Ok(())
}

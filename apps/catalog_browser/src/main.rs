use std::sync::Arc;

use anyhow::{bail, Context, Result};
use catalog_client::{
    FilterRefreshEvent, HttpFragmentTransport, ModalTrigger, SelectionController,
};
use clap::Parser;
use shared::{
    domain::{CweId, MisuseCaseId, UseCaseId},
    error::RequestFailed,
};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use console::ConsoleSurface;

/// Browse the misuse-case catalog from the terminal.
#[derive(Parser, Debug)]
#[command(name = "catalog-browser")]
struct Args {
    /// URL of the misuse-case page; endpoints resolve relative to it.
    #[arg(long)]
    page_url: Option<String>,
    /// CWE id to filter by; repeat for several. Triggers a list refresh after page load.
    #[arg(long = "cwe")]
    cwes: Vec<String>,
    /// Misuse case to select once the list is loaded.
    #[arg(long)]
    select: Option<String>,
    /// Use case to open the report-issue form for.
    #[arg(long, requires = "report_url")]
    report_usecase: Option<String>,
    /// Form URL the report trigger points at.
    #[arg(long, requires = "report_usecase")]
    report_url: Option<String>,
    /// Talk to first-generation catalog pages.
    #[arg(long)]
    legacy: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(page_url) = &args.page_url {
        settings.page_url = config::normalize_page_url(page_url);
    }
    if args.legacy {
        settings.use_legacy_pages();
    }

    let transport = HttpFragmentTransport::new(&settings.page_url, settings.payload_encoding)
        .with_context(|| format!("invalid page url '{}'", settings.page_url))?;
    let surface = ConsoleSurface::new(settings.markup_variant);
    let controller = SelectionController::new(
        Arc::new(transport),
        Arc::new(surface),
        settings.controller_options(),
    );

    // Failures are already alerted; the page stays usable, so keep going and count them.
    let mut failures = 0usize;
    let mut record = |outcome: Result<(), RequestFailed>| {
        if outcome.is_err() {
            failures += 1;
        }
    };

    record(controller.initialize().await);

    if !args.cwes.is_empty() {
        let selection = args.cwes.iter().map(|id| CweId::new(id.as_str())).collect();
        let mut event = FilterRefreshEvent::new(Some(selection));
        record(controller.on_filter_refresh(&mut event).await);
    }

    if let Some(id) = args.select {
        record(controller.on_item_selected(MisuseCaseId::new(id)).await);
    }

    if let (Some(usecase_id), Some(url)) = (args.report_usecase, args.report_url) {
        let trigger = ModalTrigger::new(UseCaseId::new(usecase_id), url);
        record(controller.on_modal_open(&trigger).await);
    }

    if failures > 0 {
        bail!("{failures} catalog request(s) failed");
    }
    Ok(())
}

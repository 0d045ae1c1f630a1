#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use ad_disabler::{is_elevated, resolve_catalog, SystemRegistry, Toggler};
use anyhow::Context;
use iced::Theme;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ad_disabler=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let catalog = resolve_catalog().context("failed to load the settings catalog")?;
    let elevated = is_elevated();
    tracing::info!(settings = catalog.len(), elevated, "starting");

    #[cfg(not(windows))]
    tracing::warn!("no Windows registry on this host, changes are kept in memory");

    let toggler = Arc::new(Toggler::new(
        catalog,
        SystemRegistry::current_user(),
        elevated,
    ));

    iced::application(
        move || app::init(Arc::clone(&toggler)),
        app::update,
        app::view,
    )
    .title("Ad Disabler")
    .theme(|_: &app::State| Theme::Dark)
    .window_size(iced::Size::new(720.0, 800.0))
    .run()
    .map_err(|e| anyhow::anyhow!("failed to run the window: {e}"))
}

// src/main.rs
use std::env;

use eframe::egui as eg;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use protube::app::ProTubeApp;
use protube::config::{load_config, AppConfig};

const RENDERER_ENV: &str = "PROTUBE_RENDERER";

fn parse_renderer(value: &str) -> Option<eframe::Renderer> {
    match value.trim().to_ascii_lowercase().as_str() {
        "glow" | "gl" => Some(eframe::Renderer::Glow),
        "wgpu" => Some(eframe::Renderer::Wgpu),
        _ => None,
    }
}

/// `PROTUBE_RENDERER` wins; otherwise WGPU on Windows (DX12) and Glow elsewhere.
fn pick_renderer() -> eframe::Renderer {
    if let Ok(raw) = env::var(RENDERER_ENV) {
        match parse_renderer(&raw) {
            Some(r) => return r,
            None => warn!("Ignoring {RENDERER_ENV}={raw:?}; expected glow or wgpu"),
        }
    }
    if cfg!(target_os = "windows") {
        eframe::Renderer::Wgpu
    } else {
        eframe::Renderer::Glow
    }
}

fn native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        renderer: pick_renderer(),
        multisampling: 0,
        viewport: eg::ViewportBuilder::default()
            .with_title("ProTube")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    }
}

fn log_startup(config: &AppConfig) {
    info!("Catalog endpoint: {}/videos", config.api_base_url());
    info!("Thumbnails from: {}", config.media_base_url());
    info!(
        "Media store: {} ({} thumbnail workers, {}s catalog timeout)",
        config.store_dir, config.thumbnail_workers, config.request_timeout_secs
    );
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let config = load_config();
    log_startup(&config);

    let result = eframe::run_native(
        "ProTube",
        native_options(),
        Box::new(move |_cc| Ok(Box::new(ProTubeApp::new(config)))),
    );
    if let Err(e) = &result {
        error!("eframe failed to start: {e:?}");
        error!("Hint: on WSL use X/Wayland; otherwise try {RENDERER_ENV}=wgpu or {RENDERER_ENV}=glow.");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_names_are_case_insensitive() {
        assert_eq!(parse_renderer(" GLOW "), Some(eframe::Renderer::Glow));
        assert_eq!(parse_renderer("wgpu"), Some(eframe::Renderer::Wgpu));
        assert_eq!(parse_renderer("vulkan"), None);
    }
}

// src/app/mod.rs: catalog fetch + thumbnail pool + grid / player views

// ---- Standard lib imports ----
use std::sync::Arc;
use std::time::Duration;

// ---- Crates ----
use eframe::egui as eg;
use tracing::{debug, info};

// ---- Local modules ----
pub mod cache;
pub mod catalog;
pub mod detail;
pub mod fallback;
pub mod filters;
pub mod gfx;
pub mod guard;
pub mod hybrid;
pub mod prefetch;
pub mod thumbnail;
pub mod types;
pub mod ui;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

use crate::app::cache::{HttpThumbnailSource, ThumbnailCache};
use crate::app::catalog::{CatalogLoader, CatalogTask};
use crate::app::filters::{collect_categories, filtered_indices, ALL_CATEGORIES};
use crate::app::guard::CrashGuard;
use crate::app::prefetch::ThumbnailPool;
use crate::app::thumbnail::ThumbnailResolver;
use crate::app::types::{LoadStatus, Video};
use crate::app::ui::login::LoginForm;
use crate::app::ui::thumb::ThumbnailViews;
use crate::config::{load_config, AppConfig};

// ---- Tunables ----
const THUMBNAIL_TIMEOUT: Duration = Duration::from_secs(15);
pub(crate) const RELATED_LIMIT: usize = 10;

pub struct ProTubeApp {
    config: AppConfig,
    resolver: ThumbnailResolver,
    catalog: CatalogTask,

    // filters
    search_query: String,
    selected_category: String,
    categories: Vec<String>,
    filtered: Vec<usize>,
    filters_dirty: bool,

    // player
    selected: Option<usize>,
    show_full_description: bool,

    login: LoginForm,
    thumbs: ThumbnailViews,
    crash_guard: CrashGuard,
}

impl Default for ProTubeApp {
    fn default() -> Self {
        Self::new(load_config())
    }
}

impl ProTubeApp {
    pub fn new(config: AppConfig) -> Self {
        let source = Arc::new(HttpThumbnailSource::new(THUMBNAIL_TIMEOUT));
        let pool = Arc::new(ThumbnailPool::start(source, config.thumbnail_workers));
        let resolver = ThumbnailResolver::new(config.media_base_url(), ThumbnailCache::new(), pool);
        let catalog = CatalogTask::start(CatalogLoader::from_config(&config));

        Self {
            config,
            resolver,
            catalog,
            search_query: String::new(),
            selected_category: ALL_CATEGORIES.to_string(),
            categories: vec![ALL_CATEGORIES.to_string()],
            filtered: Vec::new(),
            filters_dirty: true,
            selected: None,
            show_full_description: false,
            login: LoginForm::default(),
            thumbs: ThumbnailViews::default(),
            crash_guard: CrashGuard::default(),
        }
    }

    pub(crate) fn videos(&self) -> &[Video] {
        &self.catalog.state().videos
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.filters_dirty = true;
    }

    pub(crate) fn select(&mut self, idx: Option<usize>) {
        self.selected = idx;
        self.show_full_description = false;
    }

    /// Drops every mounted view and refetches the catalog. With `clear_cache`
    /// the confirmed-URL cache is emptied as well.
    pub(crate) fn reload(&mut self, clear_cache: bool) {
        if clear_cache {
            info!("Clearing {} cached thumbnail urls", self.resolver.cache().len());
            self.resolver.cache().clear();
        }
        self.thumbs.clear();
        self.select(None);
        self.crash_guard.reset();
        self.catalog = CatalogTask::start(CatalogLoader::from_config(&self.config));
        self.mark_dirty();
    }

    fn poll_catalog(&mut self) {
        let was_loading = self.catalog.is_loading();
        self.catalog.poll();
        if was_loading && !self.catalog.is_loading() {
            debug!("catalog task finished: {}", self.catalog.state().status.as_str());
            self.categories = collect_categories(self.videos());
            if !self.categories.contains(&self.selected_category) {
                self.selected_category = ALL_CATEGORIES.to_string();
            }
            self.mark_dirty();
        }
    }

    fn refresh_filters(&mut self) {
        if !self.filters_dirty {
            return;
        }
        self.filters_dirty = false;
        self.filtered = filtered_indices(self.videos(), &self.search_query, &self.selected_category);
    }

    fn ui_render_body(&mut self, ui: &mut eg::Ui) {
        match self.catalog.state().status {
            LoadStatus::Idle | LoadStatus::Loading => self.ui_render_loading(ui),
            LoadStatus::Error => self.ui_render_error(ui),
            LoadStatus::Success => match self.selected {
                Some(idx) => self.ui_render_player(ui, idx),
                None => self.ui_render_grid(ui),
            },
        }
    }
}

// ========== App impl ==========
impl eframe::App for ProTubeApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        self.poll_catalog();
        if self.catalog.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        self.refresh_filters();

        self.ui_render_header(ctx);

        // The guard is moved out so the body can borrow `self` mutably.
        let mut crash_guard = std::mem::take(&mut self.crash_guard);
        crash_guard.run("main view", || {
            if let Some(idx) = self.selected {
                self.ui_render_related(ctx, idx);
            }
            eg::CentralPanel::default().show(ctx, |ui| self.ui_render_body(ui));
        });
        let crash = crash_guard.report().cloned();
        self.crash_guard = crash_guard;

        if let Some(report) = crash {
            self.ui_render_recovery(ctx, &report);
        }

        self.ui_render_login(ctx);
        self.thumbs.sweep();
    }
}

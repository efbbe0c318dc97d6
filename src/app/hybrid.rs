// src/app/hybrid.rs
//! Real thumbnail when it loads, procedural art when anything goes wrong.
use std::sync::mpsc::{Receiver, TryRecvError};

use image::RgbaImage;
use tracing::warn;

use crate::app::fallback::FallbackArt;
use crate::app::prefetch::FetchResult;
use crate::app::thumbnail::{ResolveHandle, ThumbnailResolver, ThumbnailStatus};
use crate::app::types::Video;
use crate::app::utils::format_duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HybridPhase {
    Validating,
    LoadingReal,
    ShowingReal,
    ShowingFallback,
}

/// Text drawn on top of either kind of thumbnail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThumbnailOverlay {
    pub duration: String,
    pub category: Option<String>,
}

pub struct HybridThumbnail {
    video_id: Option<i64>,
    phase: HybridPhase,
    art: FallbackArt,
    duration: f64,
    category: Option<String>,
    resolver: ThumbnailResolver,
    handle: Option<ResolveHandle>,
    display: Option<Receiver<FetchResult>>,
    url: Option<String>,
    pixels: Option<RgbaImage>,
    loaded: bool,
}

impl HybridThumbnail {
    pub fn mount(video: &Video, resolver: &ThumbnailResolver) -> Self {
        let mut thumb = Self {
            video_id: video.id,
            phase: HybridPhase::Validating,
            art: FallbackArt::for_video(video),
            duration: video.safe_duration(),
            category: video.first_category().map(str::to_string),
            resolver: resolver.clone(),
            handle: None,
            display: None,
            url: None,
            pixels: None,
            loaded: false,
        };

        match video.id {
            Some(id) if video.is_renderable() => {
                thumb.handle = Some(resolver.resolve(id, video.display_title()));
                thumb.phase = HybridPhase::LoadingReal;
            }
            _ => {
                warn!("Invalid video record {:?}; drawing fallback art", video.id);
                thumb.phase = HybridPhase::ShowingFallback;
            }
        }
        thumb
    }

    pub fn phase(&self) -> HybridPhase {
        self.phase
    }

    pub fn art(&self) -> &FallbackArt {
        &self.art
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn overlay(&self, show_category: bool) -> ThumbnailOverlay {
        ThumbnailOverlay {
            duration: format_duration(self.duration),
            category: if show_category { self.category.clone() } else { None },
        }
    }

    /// Advances the state machine without blocking. Call once per frame.
    pub fn poll(&mut self) -> HybridPhase {
        match self.phase {
            HybridPhase::LoadingReal => self.poll_resolution(),
            HybridPhase::ShowingReal => self.poll_display(),
            HybridPhase::Validating | HybridPhase::ShowingFallback => {}
        }
        self.phase
    }

    fn poll_resolution(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            self.fall_back("no resolution in flight");
            return;
        };
        match handle.poll().clone() {
            ThumbnailStatus::Loading => {}
            ThumbnailStatus::Error { message } => {
                self.handle = None;
                self.fall_back(&message);
            }
            ThumbnailStatus::Resolved { url } if url.is_empty() => {
                self.handle = None;
                self.fall_back("resolved to an empty url");
            }
            ThumbnailStatus::Resolved { url } => {
                match handle.take_pixels() {
                    Some(img) => self.pixels = Some(img),
                    // cache hit: the probe happened earlier, so load for display now
                    None => self.display = Some(self.resolver.load(&url)),
                }
                self.handle = None;
                self.url = Some(url);
                self.phase = HybridPhase::ShowingReal;
            }
        }
    }

    fn poll_display(&mut self) {
        let Some(rx) = &self.display else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(img)) => {
                self.display = None;
                self.pixels = Some(img);
            }
            Ok(Err(e)) => {
                self.display = None;
                self.fall_back(&e.to_string());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.display = None;
                self.fall_back("display load was dropped");
            }
        }
    }

    /// Decoded pixels ready for upload. A zero-sized image counts as a failure.
    pub fn take_pixels(&mut self) -> Option<RgbaImage> {
        let img = self.pixels.take()?;
        if img.width() == 0 || img.height() == 0 {
            self.image_failed();
            return None;
        }
        Some(img)
    }

    pub fn image_loaded(&mut self) {
        if self.phase == HybridPhase::ShowingReal {
            self.loaded = true;
        }
    }

    pub fn image_failed(&mut self) {
        if self.phase == HybridPhase::ShowingReal {
            self.fall_back("image failed to display");
        }
    }

    fn fall_back(&mut self, why: &str) {
        if self.phase != HybridPhase::ShowingFallback {
            warn!("Thumbnail for video {:?} falls back: {why}", self.video_id);
        }
        self.phase = HybridPhase::ShowingFallback;
        self.pixels = None;
        self.display = None;
        self.loaded = false;
    }
}

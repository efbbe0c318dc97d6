// src/app/ui/thumb.rs
use std::collections::HashMap;
use std::time::Duration;

use eframe::egui::{self as eg, TextureHandle};

use crate::app::fallback::{ART_HEIGHT, ART_WIDTH};
use crate::app::gfx::upload_image;
use crate::app::guard::guard;
use crate::app::hybrid::{HybridPhase, HybridThumbnail};
use crate::app::thumbnail::ThumbnailResolver;
use crate::app::types::{ThumbnailSize, Video};

fn uv_full() -> eg::Rect {
    eg::Rect::from_min_max(eg::pos2(0.0, 0.0), eg::pos2(1.0, 1.0))
}

#[derive(Clone, Copy)]
enum Corner {
    TopLeft,
    BottomRight,
}

/// One mounted thumbnail plus the textures it owns.
pub struct ThumbnailView {
    hybrid: HybridThumbnail,
    name: String,
    real: Option<TextureHandle>,
    art: Option<TextureHandle>,
    crashed: bool,
    seen: bool,
}

impl ThumbnailView {
    pub fn new(video: &Video, resolver: &ThumbnailResolver, name: String) -> Self {
        Self {
            hybrid: HybridThumbnail::mount(video, resolver),
            name,
            real: None,
            art: None,
            crashed: false,
            seen: true,
        }
    }

    pub fn phase(&self) -> HybridPhase {
        if self.crashed {
            HybridPhase::ShowingFallback
        } else {
            self.hybrid.phase()
        }
    }

    pub fn show(&mut self, ui: &mut eg::Ui, size: ThumbnailSize, show_category: bool) -> eg::Response {
        let [w, h] = size.size();
        let scale = (ui.available_width().max(1.0) / w).min(1.0);
        let (rect, resp) = ui.allocate_exact_size(eg::vec2(w, h) * scale, eg::Sense::click());
        if !ui.is_rect_visible(rect) {
            return resp;
        }

        let painter = ui.painter_at(rect);
        if !self.crashed {
            let painted = guard("thumbnail", || self.paint(&painter, rect));
            if painted.is_err() {
                self.crashed = true;
            }
        }
        if self.crashed {
            self.paint_fallback(&painter, rect);
        }

        let overlay = self.hybrid.overlay(show_category);
        if let Some(cat) = overlay.category.as_deref() {
            draw_badge(&painter, rect, cat, Corner::TopLeft);
        }
        draw_badge(&painter, rect, &overlay.duration, Corner::BottomRight);

        resp.on_hover_cursor(eg::CursorIcon::PointingHand)
    }

    fn paint(&mut self, painter: &eg::Painter, rect: eg::Rect) {
        self.hybrid.poll();
        if let Some(img) = self.hybrid.take_pixels() {
            match upload_image(painter.ctx(), &self.name, &img) {
                Some(tex) => {
                    self.real = Some(tex);
                    self.hybrid.image_loaded();
                }
                None => self.hybrid.image_failed(),
            }
        }

        let phase = self.hybrid.phase();
        if phase == HybridPhase::ShowingFallback {
            self.paint_fallback(painter, rect);
            return;
        }
        if let (HybridPhase::ShowingReal, Some(tex)) = (phase, &self.real) {
            painter.image(tex.id(), rect, uv_full(), eg::Color32::WHITE);
            return;
        }

        painter.rect_filled(rect, 6.0, eg::Color32::from_gray(40));
        painter.text(
            rect.center(),
            eg::Align2::CENTER_CENTER,
            "…",
            eg::FontId::proportional(18.0),
            eg::Color32::from_gray(160),
        );
        painter.ctx().request_repaint_after(Duration::from_millis(100));
    }

    fn paint_fallback(&mut self, painter: &eg::Painter, rect: eg::Rect) {
        if self.art.is_none() {
            let img = self.hybrid.art().rasterize(ART_WIDTH, ART_HEIGHT);
            self.art = upload_image(painter.ctx(), &format!("{}#art", self.name), &img);
        }
        if let Some(tex) = &self.art {
            painter.image(tex.id(), rect, uv_full(), eg::Color32::WHITE);
        } else {
            painter.rect_filled(rect, 6.0, eg::Color32::from_gray(40));
        }

        let icon = self.hybrid.art().icon;
        let [r, g, b, a] = icon.color();
        painter.text(
            rect.center(),
            eg::Align2::CENTER_CENTER,
            icon.glyph(),
            eg::FontId::proportional((rect.height() * 0.3).max(10.0)),
            eg::Color32::from_rgba_unmultiplied(r, g, b, a),
        );
    }
}

fn draw_badge(p: &eg::Painter, rect: eg::Rect, label: &str, corner: Corner) {
    if label.is_empty() {
        return;
    }
    let pad = 6.0;
    let font = eg::FontId::proportional(12.0);
    let galley = p.layout_no_wrap(label.to_string(), font, eg::Color32::WHITE);
    let size = galley.size() + eg::vec2(8.0, 4.0);
    let min = match corner {
        Corner::TopLeft => eg::pos2(rect.left() + pad, rect.top() + pad),
        Corner::BottomRight => eg::pos2(rect.right() - pad - size.x, rect.bottom() - pad - size.y),
    };
    let r = eg::Rect::from_min_size(min, size);

    p.rect_filled(r, eg::Rounding::same(4.0), eg::Color32::from_black_alpha(200));
    p.galley(r.min + eg::vec2(4.0, 2.0), galley, eg::Color32::WHITE);
}

/// Views keyed by catalog index and size. A view that is not shown during a
/// frame is dropped at the end of it, which detaches its pending loads and
/// frees its textures.
#[derive(Default)]
pub struct ThumbnailViews {
    views: HashMap<(usize, ThumbnailSize), ThumbnailView>,
}

impl ThumbnailViews {
    pub fn view(
        &mut self,
        videos: &[Video],
        resolver: &ThumbnailResolver,
        idx: usize,
        size: ThumbnailSize,
    ) -> Option<&mut ThumbnailView> {
        let video = videos.get(idx)?;
        let view = self.views.entry((idx, size)).or_insert_with(|| {
            ThumbnailView::new(video, resolver, format!("thumb-{idx}-{size:?}"))
        });
        view.seen = true;
        Some(view)
    }

    pub fn show(
        &mut self,
        ui: &mut eg::Ui,
        videos: &[Video],
        resolver: &ThumbnailResolver,
        idx: usize,
        size: ThumbnailSize,
        show_category: bool,
    ) -> Option<eg::Response> {
        self.view(videos, resolver, idx, size)
            .map(|v| v.show(ui, size, show_category))
    }

    pub fn sweep(&mut self) {
        self.views.retain(|_, v| std::mem::take(&mut v.seen));
    }

    pub fn clear(&mut self) {
        self.views.clear();
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::thumbnail::tests::{resolver_with, CountingSource};
    use std::sync::Arc;

    fn videos() -> Vec<Video> {
        (1..=3)
            .map(|id| Video {
                id: Some(id),
                title: Some(format!("Video {id}")),
                user: Some("u".into()),
                duration: Some(10.0),
                ..Video::default()
            })
            .collect()
    }

    #[test]
    fn unseen_views_are_swept() {
        let resolver = resolver_with(Arc::new(CountingSource::default()));
        let videos = videos();
        let mut views = ThumbnailViews::default();

        views.view(&videos, &resolver, 0, ThumbnailSize::Medium);
        views.view(&videos, &resolver, 1, ThumbnailSize::Medium);
        views.view(&videos, &resolver, 1, ThumbnailSize::Small);
        assert!(views.view(&videos, &resolver, 7, ThumbnailSize::Small).is_none());
        views.sweep();
        assert_eq!(views.len(), 3);

        views.view(&videos, &resolver, 1, ThumbnailSize::Small);
        views.sweep();
        assert_eq!(views.len(), 1);
        views.sweep();
        assert!(views.is_empty());
    }

    #[test]
    fn invalid_records_mount_straight_into_fallback() {
        let resolver = resolver_with(Arc::new(CountingSource::default()));
        let videos = vec![Video::default()];
        let mut views = ThumbnailViews::default();
        let view = views.view(&videos, &resolver, 0, ThumbnailSize::Large).unwrap();
        assert_eq!(view.phase(), HybridPhase::ShowingFallback);
    }
}

// src/app/ui/grid.rs
use eframe::egui as eg;

use crate::app::types::ThumbnailSize;
use crate::app::utils::{avatar_initial, placeholder_upload_age, placeholder_views, truncate_chars};

pub const H_SPACING: f32 = 12.0;
pub const V_SPACING: f32 = 18.0;

const TITLE_CHARS: usize = 70;

/// Round uploader badge with the first letter of the name.
pub(crate) fn draw_avatar(ui: &mut eg::Ui, name: &str, radius: f32) {
    let (rect, _) = ui.allocate_exact_size(eg::vec2(radius * 2.0, radius * 2.0), eg::Sense::hover());
    let p = ui.painter();
    p.circle_filled(rect.center(), radius, eg::Color32::from_rgb(96, 96, 160));
    p.text(
        rect.center(),
        eg::Align2::CENTER_CENTER,
        avatar_initial(name),
        eg::FontId::proportional(radius),
        eg::Color32::WHITE,
    );
}

impl crate::app::ProTubeApp {
    pub(crate) fn ui_render_grid(&mut self, ui: &mut eg::Ui) {
        if self.filtered.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                if self.catalog.state().videos.is_empty() {
                    ui.heading("No videos available");
                    ui.label("The server returned an empty catalog.");
                } else {
                    ui.heading("No videos found");
                    ui.label("Try another search term or category.");
                }
            });
            return;
        }

        let size = ThumbnailSize::Medium;
        let card_w = size.width();
        let card_h = card_w * 9.0 / 16.0 + 84.0;
        let idxs = self.filtered.clone();
        let mut clicked = None;

        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let avail = ui.available_width();
                let cols = ((avail + H_SPACING) / (card_w + H_SPACING)).floor().max(1.0) as usize;

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);
                    let videos = &self.catalog.state().videos;

                    for (col, &idx) in idxs.iter().enumerate() {
                        if col > 0 && col % cols == 0 {
                            ui.end_row();
                        }
                        let Some(video) = videos.get(idx) else {
                            continue;
                        };

                        ui.allocate_ui_with_layout(
                            eg::vec2(card_w, card_h),
                            eg::Layout::top_down(eg::Align::Min),
                            |ui| {
                                ui.set_min_size(eg::vec2(card_w, card_h));
                                ui.set_max_width(card_w);

                                let thumb = self.thumbs.show(ui, videos, &self.resolver, idx, size, true);
                                if thumb.is_some_and(|r| r.clicked()) {
                                    clicked = Some(idx);
                                }

                                ui.add_space(6.0);
                                let title = eg::RichText::new(truncate_chars(video.display_title(), TITLE_CHARS))
                                    .strong()
                                    .size(15.0);
                                if ui
                                    .add(eg::Label::new(title).wrap().sense(eg::Sense::click()))
                                    .clicked()
                                {
                                    clicked = Some(idx);
                                }

                                ui.horizontal(|ui| {
                                    draw_avatar(ui, video.display_user(), 10.0);
                                    ui.label(eg::RichText::new(video.display_user()).weak());
                                });
                                if let Some(id) = video.id {
                                    ui.label(
                                        eg::RichText::new(format!(
                                            "{} • {}",
                                            placeholder_views(id),
                                            placeholder_upload_age(id)
                                        ))
                                        .weak()
                                        .small(),
                                    );
                                }
                            },
                        );
                    }
                    ui.end_row();
                });
            });

        if clicked.is_some() {
            self.select(clicked);
        }
    }
}

// src/app/detail.rs
use eframe::egui as eg;

use crate::app::filters::related_videos;
use crate::app::types::{ThumbnailSize, Video};
use crate::app::ui::grid::draw_avatar;
use crate::app::utils::{
    placeholder_likes, placeholder_subscribers, placeholder_upload_age, placeholder_views,
    truncate_chars,
};

const DESCRIPTION_CHARS: usize = 200;
const MAX_TAGS: usize = 5;
const MAX_COMMENTS: usize = 5;

/// Text to show and whether a Show more/less toggle is needed.
fn description_excerpt(video: &Video, expanded: bool) -> (String, bool) {
    let Some(desc) = video.description() else {
        return ("No description available.".to_string(), false);
    };
    let long = desc.chars().count() > DESCRIPTION_CHARS;
    if long && !expanded {
        (truncate_chars(desc, DESCRIPTION_CHARS), true)
    } else {
        (desc.to_string(), long)
    }
}

fn hashtags(video: &Video) -> Vec<String> {
    video
        .tags()
        .iter()
        .filter(|t| !t.is_empty())
        .take(MAX_TAGS)
        .map(|t| format!("#{t}"))
        .collect()
}

fn comment_count_label(n: usize) -> String {
    match n {
        1 => "1 comment".to_string(),
        n => format!("{n} comments"),
    }
}

impl crate::app::ProTubeApp {
    // ---------- PLAYER ----------
    pub(crate) fn ui_render_player(&mut self, ui: &mut eg::Ui, idx: usize) {
        let Some(video) = self.catalog.state().videos.get(idx).cloned() else {
            ui.label("Selection is out of range.");
            if ui.button("← Back").clicked() {
                self.select(None);
            }
            return;
        };
        let mut back = false;

        eg::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            if ui.button("← Back").clicked() {
                back = true;
            }
            ui.add_space(6.0);

            self.thumbs.show(
                ui,
                &self.catalog.state().videos,
                &self.resolver,
                idx,
                ThumbnailSize::Large,
                true,
            );

            // Media files live next to the backend; links are not validated.
            if let Some(id) = video.id {
                ui.horizontal(|ui| {
                    ui.hyperlink_to("▶ Play video", self.config.video_path(id));
                    ui.separator();
                    ui.hyperlink_to("Poster", self.config.poster_path(id));
                });
            }

            ui.add_space(8.0);
            ui.heading(video.display_title());

            if let Some(id) = video.id {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        eg::RichText::new(format!(
                            "{} • {}",
                            placeholder_views(id),
                            placeholder_upload_age(id)
                        ))
                        .weak(),
                    )
                    .on_hover_text("Placeholder figures, not real statistics");
                    ui.separator();
                    let _ = ui.button(format!("👍 {}", placeholder_likes(id)));
                    let _ = ui.button("👎");
                    let _ = ui.button("Share");
                });
            }

            ui.add_space(8.0);
            ui.separator();

            // Channel
            ui.horizontal(|ui| {
                draw_avatar(ui, video.display_user(), 18.0);
                ui.vertical(|ui| {
                    ui.label(eg::RichText::new(video.display_user()).strong());
                    if let Some(id) = video.id {
                        ui.label(eg::RichText::new(placeholder_subscribers(id)).weak().small());
                    }
                });
                ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                    let _ = ui.button("Subscribe");
                });
            });

            // Description
            ui.add_space(6.0);
            eg::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                let (text, toggle) = description_excerpt(&video, self.show_full_description);
                ui.add(eg::Label::new(text).wrap());
                if toggle {
                    let label = if self.show_full_description { "Show less" } else { "Show more" };
                    if ui.link(label).clicked() {
                        self.show_full_description = !self.show_full_description;
                    }
                }
                let tags = hashtags(&video);
                if !tags.is_empty() {
                    ui.add_space(4.0);
                    ui.horizontal_wrapped(|ui| {
                        for tag in tags {
                            ui.label(eg::RichText::new(tag).color(eg::Color32::from_rgb(62, 166, 255)));
                        }
                    });
                }
            });

            // Comments
            ui.add_space(10.0);
            let comments = video.comments();
            ui.label(eg::RichText::new(comment_count_label(comments.len())).strong());
            for c in comments.iter().take(MAX_COMMENTS) {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let author = if c.author.is_empty() { "anonymous" } else { c.author.as_str() };
                    draw_avatar(ui, author, 12.0);
                    ui.vertical(|ui| {
                        ui.label(eg::RichText::new(author).strong().small());
                        ui.add(eg::Label::new(&c.text).wrap());
                    });
                });
            }
            if comments.len() > MAX_COMMENTS {
                ui.label(
                    eg::RichText::new(format!("… and {} more comments", comments.len() - MAX_COMMENTS))
                        .weak(),
                );
            }
        });

        if back {
            self.select(None);
        }
    }

    // ---------- RELATED ----------
    pub(crate) fn ui_render_related(&mut self, ctx: &eg::Context, current: usize) {
        let related = related_videos(&self.catalog.state().videos, current, crate::app::RELATED_LIMIT);
        let mut clicked = None;

        eg::SidePanel::right("related_panel")
            .resizable(true)
            .default_width(380.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.heading("Related videos");
                ui.separator();
                if related.is_empty() {
                    ui.label("Nothing else to watch yet.");
                    return;
                }

                let videos = &self.catalog.state().videos;
                eg::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                    for &idx in &related {
                        let Some(video) = videos.get(idx) else { continue };
                        ui.horizontal(|ui| {
                            let thumb =
                                self.thumbs.show(ui, videos, &self.resolver, idx, ThumbnailSize::Small, false);
                            if thumb.is_some_and(|r| r.clicked()) {
                                clicked = Some(idx);
                            }
                            ui.vertical(|ui| {
                                let title = eg::RichText::new(truncate_chars(video.display_title(), 60)).strong();
                                if ui.add(eg::Label::new(title).wrap().sense(eg::Sense::click())).clicked() {
                                    clicked = Some(idx);
                                }
                                ui.label(eg::RichText::new(video.display_user()).weak().small());
                                if let Some(id) = video.id {
                                    ui.label(eg::RichText::new(placeholder_views(id)).weak().small());
                                }
                            });
                        });
                        ui.add_space(6.0);
                    }
                });
            });

        if clicked.is_some() {
            self.select(clicked);
        }
    }
}

// src/app/ui/topbar.rs
use eframe::egui as eg;

use crate::app::filters::ALL_CATEGORIES;
use crate::app::types::LoadStatus;

fn category_label(cat: &str) -> &str {
    if cat == ALL_CATEGORIES {
        "All categories"
    } else {
        cat
    }
}

impl crate::app::ProTubeApp {
    // ---------- HEADER ----------
    pub(crate) fn ui_render_header(&mut self, ctx: &eg::Context) {
        eg::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                // Logo doubles as "home"
                let logo = eg::RichText::new("▶ ProTube")
                    .strong()
                    .size(20.0)
                    .color(eg::Color32::from_rgb(230, 33, 23));
                if ui
                    .add(eg::Button::new(logo).frame(false))
                    .on_hover_text("Back to all videos")
                    .clicked()
                {
                    self.select(None);
                }

                ui.separator();

                // Search
                let resp = ui.add(
                    eg::TextEdit::singleline(&mut self.search_query)
                        .hint_text("Search")
                        .desired_width(260.0),
                );
                if resp.changed() {
                    self.mark_dirty();
                }
                if !self.search_query.is_empty() && ui.small_button("✖").clicked() {
                    self.search_query.clear();
                    self.mark_dirty();
                }

                ui.separator();

                // Category
                let mut changed = false;
                eg::ComboBox::from_id_source("category_combo")
                    .selected_text(category_label(&self.selected_category).to_string())
                    .show_ui(ui, |ui| {
                        for cat in &self.categories {
                            changed |= ui
                                .selectable_value(
                                    &mut self.selected_category,
                                    cat.clone(),
                                    category_label(cat),
                                )
                                .clicked();
                        }
                    });
                if changed {
                    self.mark_dirty();
                }

                ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                    if ui.button("Sign in").clicked() {
                        self.login.open();
                    }
                    let state = self.catalog.state();
                    if state.status == LoadStatus::Success {
                        if let Some(at) = state.fetched_at {
                            ui.label(
                                eg::RichText::new(format!("Updated {}", at.format("%H:%M")))
                                    .weak(),
                            )
                            .on_hover_text(&state.message);
                        }
                    }
                });
            });
            ui.add_space(4.0);
        });
    }
}

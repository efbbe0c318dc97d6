// src/app/ui/mod.rs
pub mod grid;
pub mod login;
pub mod thumb;
pub mod topbar;

use eframe::egui as eg;

use crate::app::guard::CrashReport;

impl crate::app::ProTubeApp {
    pub(crate) fn ui_render_loading(&self, ui: &mut eg::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.add(eg::Spinner::new().size(28.0));
            ui.add_space(8.0);
            ui.label(&self.catalog.state().message);
        });
    }

    pub(crate) fn ui_render_error(&mut self, ui: &mut eg::Ui) {
        let message = self.catalog.state().message.clone();
        let mut retry = false;
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading("Could not load videos");
            ui.add_space(6.0);
            let color = ui.visuals().error_fg_color;
            ui.colored_label(color, message);
            ui.add_space(12.0);
            retry = ui.button("Retry").clicked();
        });
        if retry {
            self.reload(false);
        }
    }

    pub(crate) fn ui_render_recovery(&mut self, ctx: &eg::Context, report: &CrashReport) {
        let mut action = None;
        eg::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading("Something went wrong");
                ui.label("The page hit an unexpected error and stopped drawing.");
                ui.add_space(6.0);
                ui.monospace(format!("{}: {}", report.label, report.message));
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("Reload").clicked() {
                        action = Some(false);
                    }
                    if ui
                        .button("Clear cache and reload")
                        .on_hover_text("Also forget every confirmed thumbnail url")
                        .clicked()
                    {
                        action = Some(true);
                    }
                });
            });
        });
        if let Some(clear_cache) = action {
            self.reload(clear_cache);
        }
    }
}

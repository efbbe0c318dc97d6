// src/app/ui/login.rs
use eframe::egui as eg;
use tracing::info;

/// Sign-in dialog state. There is no account backend; a submit is only logged.
#[derive(Debug, Default)]
pub struct LoginForm {
    is_open: bool,
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.password.clear();
    }

    /// Logs the attempt, closes the dialog and returns the trimmed username.
    pub fn submit(&mut self) -> String {
        let user = self.username.trim().to_string();
        info!("Login attempt for user {user:?}");
        self.close();
        user
    }
}

impl crate::app::ProTubeApp {
    pub(crate) fn ui_render_login(&mut self, ctx: &eg::Context) {
        if !self.login.is_open() {
            return;
        }
        if ctx.input(|i| i.key_pressed(eg::Key::Escape)) {
            self.login.close();
            return;
        }

        let mut open = true;
        let mut submitted = false;
        eg::Window::new("Sign in")
            .collapsible(false)
            .resizable(false)
            .anchor(eg::Align2::CENTER_CENTER, eg::vec2(0.0, 0.0))
            .open(&mut open)
            .show(ctx, |ui| {
                eg::Grid::new("login_grid").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
                    ui.label("Username");
                    ui.add(eg::TextEdit::singleline(&mut self.login.username).desired_width(200.0));
                    ui.end_row();

                    ui.label("Password");
                    let resp = ui.add(
                        eg::TextEdit::singleline(&mut self.login.password)
                            .password(true)
                            .desired_width(200.0),
                    );
                    if resp.lost_focus() && ui.input(|i| i.key_pressed(eg::Key::Enter)) {
                        submitted = true;
                    }
                    ui.end_row();
                });
                ui.add_space(8.0);
                if ui.button("Sign in").clicked() {
                    submitted = true;
                }
            });

        if submitted {
            self.login.submit();
        } else if !open {
            self.login.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_closes_and_forgets_the_password() {
        let mut form = LoginForm::default();
        form.open();
        form.username = "  alice ".into();
        form.password = "hunter2".into();

        assert_eq!(form.submit(), "alice");
        assert!(!form.is_open());
        assert!(form.password.is_empty());
    }

    #[test]
    fn close_keeps_the_username() {
        let mut form = LoginForm::default();
        form.open();
        form.username = "bob".into();
        form.close();
        assert!(!form.is_open());
        assert_eq!(form.username, "bob");
    }
}

// src/app/gfx.rs
use eframe::egui::{self as eg, ColorImage, TextureHandle};
use image::RgbaImage;

/// Upload decoded pixels to a GPU texture. `None` for an empty image.
/// (UI thread only)
pub fn upload_image(ctx: &eg::Context, name: &str, img: &RgbaImage) -> Option<TextureHandle> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let color = ColorImage::from_rgba_unmultiplied([w as usize, h as usize], img.as_raw());
    Some(ctx.load_texture(name.to_string(), color, eg::TextureOptions::LINEAR))
}

// src/app/fallback.rs
//! Procedural stand-in artwork for videos without a usable thumbnail.
//!
//! Everything here is a pure function of (id, title, user, first category), so
//! a given video looks the same on every frame and in every session.

use std::f64::consts::PI;

use image::{Rgba, RgbaImage};

use crate::app::types::Video;

pub const ART_WIDTH: u32 = 320;
pub const ART_HEIGHT: u32 = 180;

const PATTERN_ALPHA: f64 = 0.4;

/// Sum of UTF-16 code units.
pub fn text_hash(s: &str) -> i64 {
    s.encode_utf16().map(i64::from).sum()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hsl {
    pub hue: u32,
    pub saturation: u32,
    pub lightness: u32,
}

impl Hsl {
    pub fn to_rgb(self) -> [u8; 3] {
        let s = f64::from(self.saturation) / 100.0;
        let l = f64::from(self.lightness) / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = f64::from(self.hue % 360) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [to8(r), to8(g), to8(b)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternKind {
    Circles,
    Triangles,
    Rectangles,
    Curves,
    Spiral,
}

impl PatternKind {
    pub fn from_hash(hash: i64) -> Self {
        match hash.rem_euclid(5) {
            0 => Self::Circles,
            1 => Self::Triangles,
            2 => Self::Rectangles,
            3 => Self::Curves,
            _ => Self::Spiral,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryIcon {
    Music,
    Gaming,
    Sports,
    Education,
    Comedy,
    News,
    Tech,
    Play,
}

impl CategoryIcon {
    pub fn from_category(category: Option<&str>) -> Self {
        let Some(cat) = category else {
            return Self::Play;
        };
        match cat.to_lowercase().as_str() {
            "music" => Self::Music,
            "gaming" => Self::Gaming,
            "sports" => Self::Sports,
            "education" => Self::Education,
            "comedy" => Self::Comedy,
            "news" => Self::News,
            "tech" | "technology" => Self::Tech,
            _ => Self::Play,
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Music => "♪",
            Self::Gaming => "🎮",
            Self::Sports => "⚽",
            Self::Education => "📚",
            Self::Comedy => "😂",
            Self::News => "📰",
            Self::Tech => "⚙",
            Self::Play => "▶",
        }
    }

    /// RGBA, unmultiplied.
    pub const fn color(self) -> [u8; 4] {
        match self {
            Self::Music => [255, 100, 150, 230],
            Self::Tech => [100, 200, 255, 230],
            _ => [255, 255, 255, 230],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackArt {
    pub color1: Hsl,
    pub color2: Hsl,
    /// Gradient direction in degrees, 0..180.
    pub angle: u32,
    pub pattern: PatternKind,
    pub icon: CategoryIcon,
    title_hash: i64,
    user_hash: i64,
}

impl FallbackArt {
    pub fn generate(id: Option<i64>, title: &str, user: &str, category: Option<&str>) -> Self {
        let id = id.unwrap_or(0);
        let title = if title.is_empty() { "default" } else { title };
        let user = if user.is_empty() { "user" } else { user };

        let title_hash = text_hash(title);
        let user_hash = text_hash(user);
        let h1 = title_hash.wrapping_add(id).unsigned_abs();
        let h2 = user_hash.wrapping_add(id).unsigned_abs();

        let saturation = 70 + (h1 % 30) as u32;
        let color1 = Hsl {
            hue: (h1 % 360) as u32,
            saturation,
            lightness: 40 + (h1 % 20) as u32,
        };
        let color2 = Hsl {
            hue: ((h2 % 360 + 120) % 360) as u32,
            saturation,
            lightness: 20 + (h2 % 20) as u32,
        };
        let angle = (h1.wrapping_add(h2) % 180) as u32;

        Self {
            color1,
            color2,
            angle,
            pattern: PatternKind::from_hash(title_hash),
            icon: CategoryIcon::from_category(category),
            title_hash,
            user_hash,
        }
    }

    pub fn for_video(video: &Video) -> Self {
        Self::generate(
            video.id,
            video.title.as_deref().unwrap_or_default(),
            video.user.as_deref().unwrap_or_default(),
            video.first_category(),
        )
    }

    /// Gradient, pattern and vignette. The icon is drawn as text by the UI.
    pub fn rasterize(&self, width: u32, height: u32) -> RgbaImage {
        let mut img = RgbaImage::new(width.max(1), height.max(1));
        self.fill_gradient(&mut img);
        self.draw_pattern(&mut img);
        apply_vignette(&mut img);
        img
    }

    fn fill_gradient(&self, img: &mut RgbaImage) {
        let (w, h) = (f64::from(img.width()), f64::from(img.height()));
        let a = f64::from(self.angle).to_radians();
        let (dx, dy) = (w * a.cos(), h * a.sin());
        let len2 = dx * dx + dy * dy;
        let c1 = self.color1.to_rgb();
        let c2 = self.color2.to_rgb();

        for (x, y, px) in img.enumerate_pixels_mut() {
            let (fx, fy) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
            let t = if len2 > f64::EPSILON {
                ((fx * dx + fy * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let rgb = if t < 0.5 {
                lerp_rgb(c1, c2, t * 2.0)
            } else {
                lerp_rgb(c2, c1, (t - 0.5) * 2.0)
            };
            *px = Rgba([rgb[0], rgb[1], rgb[2], 255]);
        }
    }

    fn draw_pattern(&self, img: &mut RgbaImage) {
        let (w, h) = (f64::from(img.width()), f64::from(img.height()));
        let th = self.title_hash as f64;
        let uh = self.user_hash as f64;

        match self.pattern {
            PatternKind::Circles => {
                for i in 0..6 {
                    let i = f64::from(i);
                    let cx = fmod(th * (i + 1.0) * 37.0, w * 1.2) - w * 0.1;
                    let cy = fmod(th * (i + 2.0) * 23.0, h * 1.2) - h * 0.1;
                    let r = 15.0 + fmod(th + i * 17.0, 45.0);
                    for_each_in_box(img, cx - r, cy - r, cx + r, cy + r, |px, x, y| {
                        let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                        if d <= r {
                            let a = 0.3 + (0.05 - 0.3) * (d / r);
                            blend(px, [255, 255, 255], a * PATTERN_ALPHA);
                        }
                    });
                }
            }
            PatternKind::Triangles => {
                for i in 0..4 {
                    let i = f64::from(i);
                    let cx = fmod(th * (i + 1.0) * 41.0, w * 0.8) + w * 0.1;
                    let cy = fmod(uh * (i + 2.0) * 31.0, h * 0.8) + h * 0.1;
                    let size = 25.0 + fmod(th + i * 19.0, 35.0);
                    let rot = fmod(th + i * 43.0, 360.0).to_radians();
                    let pts = [(0.0, -size), (-size * 0.866, size * 0.5), (size * 0.866, size * 0.5)]
                        .map(|(x, y)| rotate_translate(x, y, rot, cx, cy));
                    for_each_in_box(img, cx - size, cy - size, cx + size, cy + size, |px, x, y| {
                        if in_triangle((x, y), pts) {
                            blend(px, [255, 255, 255], 0.15 * PATTERN_ALPHA);
                        }
                    });
                }
            }
            PatternKind::Rectangles => {
                for i in 0..5u32 {
                    let fi = f64::from(i);
                    let x0 = fmod(th * (fi + 1.0) * 29.0, w - 60.0);
                    let y0 = fmod(uh * (fi + 3.0) * 37.0, h - 40.0);
                    let rw = 20.0 + fmod(th + fi * 13.0, 50.0);
                    let rh = 15.0 + fmod(uh + fi * 17.0, 35.0);
                    let rot = (fmod(th + fi * 23.0, 60.0) - 30.0).to_radians();
                    let alpha = 0.08 + f64::from(i % 3) * 0.04;
                    let (cx, cy) = (x0 + rw / 2.0, y0 + rh / 2.0);
                    let reach = rw.max(rh);
                    let (sin, cos) = (-rot).sin_cos();
                    for_each_in_box(img, cx - reach, cy - reach, cx + reach, cy + reach, |px, x, y| {
                        let (lx, ly) = (x - cx, y - cy);
                        let (rx, ry) = (lx * cos - ly * sin, lx * sin + ly * cos);
                        if rx.abs() <= rw / 2.0 && ry.abs() <= rh / 2.0 {
                            blend(px, [255, 255, 255], alpha * PATTERN_ALPHA);
                        }
                    });
                }
            }
            PatternKind::Curves => {
                for i in 0..6u32 {
                    let fi = f64::from(i);
                    let (x1, y1) = (fmod(th * fi * 31.0, w), fmod(uh * fi * 23.0, h));
                    let (x2, y2) = (fmod(th * (fi + 3.0) * 37.0, w), fmod(uh * (fi + 3.0) * 29.0, h));
                    let cpx = (x1 + x2) / 2.0 + fmod(th * fi * 19.0, 100.0) - 50.0;
                    let cpy = (y1 + y2) / 2.0 + fmod(uh * fi * 17.0, 100.0) - 50.0;
                    let points: Vec<(f64, f64)> = (0..=64)
                        .map(|s| {
                            let t = f64::from(s) / 64.0;
                            let u = 1.0 - t;
                            (
                                u * u * x1 + 2.0 * u * t * cpx + t * t * x2,
                                u * u * y1 + 2.0 * u * t * cpy + t * t * y2,
                            )
                        })
                        .collect();
                    let alpha = 0.1 + f64::from(i % 4) * 0.05;
                    let mask = Mask::stroke(img.width(), img.height(), &points, 1.0);
                    mask.blend_into(img, [255, 255, 255], alpha * PATTERN_ALPHA);
                }
            }
            PatternKind::Spiral => {
                let (cx, cy) = (w / 2.0, h / 2.0);
                let max_r = w.min(h) / 3.0;
                let turns = PI * 6.0;
                let mut points = Vec::new();
                let mut angle = 0.0;
                while angle < turns {
                    let r = angle / turns * max_r;
                    let phase = angle + th * 0.01;
                    points.push((cx + phase.cos() * r, cy + phase.sin() * r));
                    angle += 0.1;
                }
                let mask = Mask::stroke(img.width(), img.height(), &points, 1.5);
                mask.blend_into(img, [255, 255, 255], 0.2 * PATTERN_ALPHA);
            }
        }
    }
}

fn apply_vignette(img: &mut RgbaImage) {
    let (w, h) = (f64::from(img.width()), f64::from(img.height()));
    let (cx, cy) = (w / 2.0, h / 2.0);
    let radius = w.max(h) / 2.0;
    for (x, y, px) in img.enumerate_pixels_mut() {
        let d = ((f64::from(x) + 0.5 - cx).powi(2) + (f64::from(y) + 0.5 - cy).powi(2)).sqrt();
        let t = d / radius;
        let a = if t <= 0.7 {
            0.1 * t / 0.7
        } else if t <= 1.0 {
            0.1 + 0.3 * (t - 0.7) / 0.3
        } else {
            0.4
        };
        blend(px, [0, 0, 0], a);
    }
}

/// Coverage of one stroked path, so overlapping stamps blend once.
struct Mask {
    width: u32,
    height: u32,
    covered: Vec<bool>,
}

impl Mask {
    fn stroke(width: u32, height: u32, points: &[(f64, f64)], radius: f64) -> Self {
        let mut mask = Self {
            width,
            height,
            covered: vec![false; (width * height) as usize],
        };
        for pair in points.windows(2) {
            let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
            let len = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
            let steps = (len * 2.0).ceil().max(1.0) as u32;
            for s in 0..=steps {
                let t = f64::from(s) / f64::from(steps);
                mask.disc(x1 + (x2 - x1) * t, y1 + (y2 - y1) * t, radius);
            }
        }
        mask
    }

    fn disc(&mut self, cx: f64, cy: f64, r: f64) {
        let x0 = (cx - r).floor().max(0.0) as i64;
        let y0 = (cy - r).floor().max(0.0) as i64;
        let x1 = ((cx + r).ceil() as i64).min(i64::from(self.width) - 1);
        let y1 = ((cy + r).ceil() as i64).min(i64::from(self.height) - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (fx, fy) = (x as f64 + 0.5, y as f64 + 0.5);
                if (fx - cx).powi(2) + (fy - cy).powi(2) <= r * r {
                    self.covered[(y as u32 * self.width + x as u32) as usize] = true;
                }
            }
        }
    }

    fn blend_into(&self, img: &mut RgbaImage, rgb: [u8; 3], alpha: f64) {
        for (x, y, px) in img.enumerate_pixels_mut() {
            if self.covered[(y * self.width + x) as usize] {
                blend(px, rgb, alpha);
            }
        }
    }
}

/// Visits pixel centres inside the (clipped) box.
fn for_each_in_box<F>(img: &mut RgbaImage, x0: f64, y0: f64, x1: f64, y1: f64, mut f: F)
where
    F: FnMut(&mut Rgba<u8>, f64, f64),
{
    let (w, h) = (img.width(), img.height());
    let xs = x0.floor().max(0.0) as u32;
    let ys = y0.floor().max(0.0) as u32;
    let xe = (x1.ceil().max(0.0) as u32).min(w);
    let ye = (y1.ceil().max(0.0) as u32).min(h);
    for y in ys..ye {
        for x in xs..xe {
            f(img.get_pixel_mut(x, y), f64::from(x) + 0.5, f64::from(y) + 0.5);
        }
    }
}

fn blend(px: &mut Rgba<u8>, rgb: [u8; 3], alpha: f64) {
    let a = alpha.clamp(0.0, 1.0);
    for (c, s) in px.0.iter_mut().take(3).zip(rgb) {
        *c = (f64::from(*c) * (1.0 - a) + f64::from(s) * a).round() as u8;
    }
}

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Floating remainder; zero for a non-positive modulus.
fn fmod(a: f64, m: f64) -> f64 {
    if m > 0.0 {
        a % m
    } else {
        0.0
    }
}

fn rotate_translate(x: f64, y: f64, rot: f64, tx: f64, ty: f64) -> (f64, f64) {
    let (sin, cos) = rot.sin_cos();
    (x * cos - y * sin + tx, x * sin + y * cos + ty)
}

fn in_triangle(p: (f64, f64), t: [(f64, f64); 3]) -> bool {
    let sign = |a: (f64, f64), b: (f64, f64), c: (f64, f64)| {
        (a.0 - c.0) * (b.1 - c.1) - (b.0 - c.0) * (a.1 - c.1)
    };
    let d1 = sign(p, t[0], t[1]);
    let d2 = sign(p, t[1], t[2]);
    let d3 = sign(p, t[2], t[0]);
    let neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(neg && pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = FallbackArt::generate(Some(9), "Lo-fi beats", "dj", Some("Music"));
        let b = FallbackArt::generate(Some(9), "Lo-fi beats", "dj", Some("Music"));
        assert_eq!(a, b);
        assert_eq!(a.rasterize(64, 36), b.rasterize(64, 36));
    }

    #[test]
    fn hashes_follow_char_code_sums() {
        assert_eq!(text_hash("A"), 65);
        assert_eq!(text_hash("default"), 741);
        // "A" (65) + id 1 = 66; "u" (117) + 1 = 118
        let art = FallbackArt::generate(Some(1), "A", "u", None);
        assert_eq!(art.color1, Hsl { hue: 66, saturation: 76, lightness: 46 });
        assert_eq!(art.color2, Hsl { hue: 238, saturation: 76, lightness: 38 });
        assert_eq!(art.angle, 4);
        assert_eq!(art.pattern, PatternKind::Circles);
        assert_eq!(art.icon, CategoryIcon::Play);
    }

    #[test]
    fn colour_ranges_hold_for_many_inputs() {
        for id in -50..50 {
            for title in ["", "x", "Some longer title", "ñandú 🎵"] {
                let art = FallbackArt::generate(Some(id * 7919), title, "someone", None);
                for c in [art.color1, art.color2] {
                    assert!(c.hue < 360);
                    assert!((70..100).contains(&c.saturation));
                    assert!((20..60).contains(&c.lightness));
                }
                assert!(art.angle < 180);
            }
        }
    }

    #[test]
    fn pattern_family_is_title_hash_mod_five() {
        let kinds = ["A", "B", "C", "D", "E"]
            .map(|t| FallbackArt::generate(Some(0), t, "u", None).pattern);
        assert_eq!(
            kinds,
            [
                PatternKind::Circles,
                PatternKind::Triangles,
                PatternKind::Rectangles,
                PatternKind::Curves,
                PatternKind::Spiral,
            ]
        );
    }

    #[test]
    fn icon_follows_first_category_case_insensitively() {
        assert_eq!(CategoryIcon::from_category(Some("MUSIC")), CategoryIcon::Music);
        assert_eq!(CategoryIcon::from_category(Some("Technology")), CategoryIcon::Tech);
        assert_eq!(CategoryIcon::from_category(Some("cooking")), CategoryIcon::Play);
        assert_eq!(CategoryIcon::Music.color(), [255, 100, 150, 230]);
        assert_eq!(CategoryIcon::Play.glyph(), "▶");
    }

    #[test]
    fn missing_inputs_use_safe_defaults() {
        let blank = FallbackArt::generate(None, "", "", None);
        let explicit = FallbackArt::generate(Some(0), "default", "user", None);
        assert_eq!(blank, explicit);
    }

    #[test]
    fn every_pattern_rasterizes_at_odd_sizes() {
        for title in ["A", "B", "C", "D", "E"] {
            let art = FallbackArt::generate(Some(3), title, "u", None);
            for (w, h) in [(ART_WIDTH, ART_HEIGHT), (1, 1), (30, 10), (0, 0)] {
                let img = art.rasterize(w, h);
                assert_eq!(img.dimensions(), (w.max(1), h.max(1)));
                assert!(img.pixels().all(|p| p.0[3] == 255));
            }
        }
    }

    #[test]
    fn hsl_conversion_matches_known_values() {
        assert_eq!(Hsl { hue: 0, saturation: 100, lightness: 50 }.to_rgb(), [255, 0, 0]);
        assert_eq!(Hsl { hue: 120, saturation: 100, lightness: 25 }.to_rgb(), [0, 128, 0]);
        assert_eq!(Hsl { hue: 240, saturation: 0, lightness: 0 }.to_rgb(), [0, 0, 0]);
    }
}

// src/app/utils.rs

/// `m:ss` with zero-padded seconds. Non-finite or negative input renders as `0:00`.
pub fn format_duration(seconds: f64) -> String {
    let safe = if seconds.is_finite() && seconds >= 0.0 {
        seconds
    } else {
        0.0
    };
    let mins = (safe / 60.0).floor() as u64;
    let secs = (safe % 60.0).floor() as u64;
    format!("{mins}:{secs:02}")
}

pub fn avatar_initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".into())
}

/// First `max_chars` characters followed by `...` when the text is longer.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ---- placeholder figures ----
//
// The catalog carries no view counts, ages or likes. These are stable per id so
// the UI does not flicker between frames; they are not real data.

fn id_noise(id: i64, salt: u64) -> u64 {
    // splitmix64 finalizer
    let mut z = (id as u64) ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn placeholder_views(id: i64) -> String {
    let views = id_noise(id, 1) % 1_000_000 + id.unsigned_abs().saturating_mul(1000);
    if views > 1_000_000 {
        format!("{:.1}M views", views as f64 / 1_000_000.0)
    } else if views > 1000 {
        format!("{:.1}K views", views as f64 / 1000.0)
    } else {
        format!("{views} views")
    }
}

pub fn placeholder_upload_age(id: i64) -> String {
    let days = id_noise(id, 2) % 365 + 1;
    if days > 30 {
        let months = days / 30;
        format!("{months} {} ago", if months == 1 { "month" } else { "months" })
    } else {
        format!("{days} {} ago", if days == 1 { "day" } else { "days" })
    }
}

pub fn placeholder_likes(id: i64) -> String {
    let likes = id_noise(id, 3) % 50_000 + id.unsigned_abs().saturating_mul(100);
    if likes > 1000 {
        format!("{:.1}K", likes as f64 / 1000.0)
    } else {
        likes.to_string()
    }
}

pub fn placeholder_subscribers(id: i64) -> String {
    format!("{}K subscribers", id_noise(id, 4) % 1000)
}

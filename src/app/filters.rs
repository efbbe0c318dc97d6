use itertools::Itertools;

use super::types::Video;

pub const ALL_CATEGORIES: &str = "all";

pub fn normalize_query(s: &str) -> String {
    s.trim().to_lowercase()
}

/// `"all"` followed by every category in the catalog, sorted and de-duplicated.
pub fn collect_categories(videos: &[Video]) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(
            videos
                .iter()
                .flat_map(|v| v.categories().iter())
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .sorted()
                .dedup(),
        )
        .collect()
}

pub fn filtered_indices(videos: &[Video], search: &str, category: &str) -> Vec<usize> {
    let query = normalize_query(search);
    videos
        .iter()
        .enumerate()
        .filter(|(_, v)| {
            query.is_empty()
                || v.display_title().to_lowercase().contains(&query)
                || v.display_user().to_lowercase().contains(&query)
        })
        .filter(|(_, v)| category == ALL_CATEGORIES || v.categories().iter().any(|c| c == category))
        .map(|(i, _)| i)
        .collect()
}

/// Other videos, those sharing the first category of `current` first.
pub fn related_videos(videos: &[Video], current: usize, limit: usize) -> Vec<usize> {
    let Some(cur) = videos.get(current) else {
        return Vec::new();
    };
    let first = cur.first_category();
    let (same, rest): (Vec<usize>, Vec<usize>) = (0..videos.len())
        .filter(|&i| i != current)
        .partition(|&i| first.is_some() && videos[i].categories().iter().any(|c| Some(c.as_str()) == first));
    same.into_iter().chain(rest).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::types::VideoMeta;

    fn v(title: &str, user: &str, cats: &[&str]) -> Video {
        Video {
            id: Some(1),
            title: Some(title.into()),
            user: Some(user.into()),
            duration: Some(1.0),
            meta: Some(VideoMeta {
                categories: cats.iter().map(|c| c.to_string()).collect(),
                ..VideoMeta::default()
            }),
            ..Video::default()
        }
    }

    fn sample() -> Vec<Video> {
        vec![
            v("Rust in 100 seconds", "fireship", &["Tech", "Education"]),
            v("Lo-fi beats", "chill", &["Music"]),
            v("Speedrun any%", "Gamer", &["Gaming", "Tech"]),
            v("Evening news", "channel4", &[]),
        ]
    }

    #[test]
    fn categories_start_with_all_and_are_unique() {
        assert_eq!(
            collect_categories(&sample()),
            vec!["all", "Education", "Gaming", "Music", "Tech"]
        );
        assert_eq!(collect_categories(&[]), vec!["all"]);
    }

    #[test]
    fn search_matches_title_or_user_case_insensitively() {
        let videos = sample();
        assert_eq!(filtered_indices(&videos, "", ALL_CATEGORIES), vec![0, 1, 2, 3]);
        assert_eq!(filtered_indices(&videos, "  RUST ", ALL_CATEGORIES), vec![0]);
        assert_eq!(filtered_indices(&videos, "gamer", ALL_CATEGORIES), vec![2]);
        assert_eq!(filtered_indices(&videos, "", "Tech"), vec![0, 2]);
        assert_eq!(filtered_indices(&videos, "speed", "Music"), Vec::<usize>::new());
    }

    #[test]
    fn related_prefers_the_same_category() {
        let videos = sample();
        assert_eq!(related_videos(&videos, 2, 10), vec![0, 1, 3]);
        assert_eq!(related_videos(&videos, 1, 2), vec![0, 2]);
        assert_eq!(related_videos(&videos, 3, 10), vec![0, 1, 2]);
        assert!(related_videos(&videos, 9, 10).is_empty());
    }
}

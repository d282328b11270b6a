//! YouTube trailer link handling.

use once_cell::sync::Lazy;
use regex::Regex;

static VIDEO_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://(www\.)?(youtube\.com|youtu\.be)/").expect("valid regex"));

static VIDEO_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/(?:watch\?v=|embed/|v/)|youtu\.be/)([A-Za-z0-9_-]{6,20})")
        .expect("valid regex")
});

pub fn is_video_host_link(link: &str) -> bool {
    VIDEO_HOST.is_match(link.trim())
}

pub fn video_id(link: &str) -> Option<&str> {
    VIDEO_ID
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `https://www.youtube.com/watch?v=<id>` for any recognised link form.
pub fn canonical_watch_url(link: &str) -> Option<String> {
    video_id(link.trim()).map(|id| format!("https://www.youtube.com/watch?v={}", id))
}

pub fn embed_url(link: &str) -> Option<String> {
    video_id(link.trim()).map(|id| format!("https://www.youtube.com/embed/{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_video_hosts() {
        assert!(is_video_host_link("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_video_host_link("http://youtu.be/dQw4w9WgXcQ"));
        assert!(!is_video_host_link("https://vimeo.com/123456"));
        assert!(!is_video_host_link("youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn extracts_ids_from_every_link_form() {
        for link in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
        ] {
            assert_eq!(video_id(link), Some("dQw4w9WgXcQ"), "{}", link);
        }
        assert_eq!(video_id("https://www.youtube.com/watch?v=abc"), None);
    }

    #[test]
    fn normalises_to_watch_and_embed_urls() {
        assert_eq!(
            canonical_watch_url(" https://youtu.be/dQw4w9WgXcQ ").as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(embed_url("https://example.com/trailer.mp4"), None);
    }
}

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::record::{ImageRef, VideoRef};

static MD_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"!\[([^\]]*)\]\(([^)\s]+)(?:\s+"([^"]*)")?\)"#).unwrap());
static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:www\.)?(?:youtube\.com/(?:watch\?v=|embed/)[\w-]+|youtu\.be/[\w-]+|vimeo\.com/\d+)").unwrap()
});

pub const MAX_IMAGES: usize = 20;

/// Reader-supplied images, then markdown images in the text; unique by URL.
pub fn images(known: &[ImageRef], text: &str) -> Vec<ImageRef> {
    let from_text = MD_IMAGE_RE.captures_iter(text).map(|caps| ImageRef {
        url: caps[2].to_string(),
        alt: Some(caps[1].trim().to_string()).filter(|a| !a.is_empty()),
        title: caps.get(3).map(|m| m.as_str().to_string()),
    });

    known
        .iter()
        .cloned()
        .chain(from_text)
        .filter(|img| !img.url.trim().is_empty())
        .unique_by(|img| img.url.clone())
        .take(MAX_IMAGES)
        .collect()
}

/// Reader-supplied videos, then YouTube/Vimeo URLs in the text; unique by URL.
pub fn videos(known: &[VideoRef], text: &str) -> Vec<VideoRef> {
    let from_text = VIDEO_URL_RE.find_iter(text).map(|m| VideoRef {
        url: m.as_str().to_string(),
        title: None,
        thumbnail: None,
    });

    known
        .iter()
        .cloned()
        .chain(from_text)
        .filter(|v| !v.url.trim().is_empty())
        .unique_by(|v| v.url.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_merged_and_unique() {
        let known = vec![ImageRef { url: "https://img.test/a.jpg".into(), alt: None, title: None }];
        let text = "![Front](https://img.test/a.jpg)\n![Room](https://img.test/b.jpg \"Bedroom\")\n![]( )";
        let out = images(&known, text);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].alt, None);
        assert_eq!(out[1].alt.as_deref(), Some("Room"));
        assert_eq!(out[1].title.as_deref(), Some("Bedroom"));
    }

    #[test]
    fn images_capped() {
        let text = (0..30).map(|i| format!("![x](https://img.test/{}.jpg)", i)).join("\n");
        assert_eq!(images(&[], &text).len(), MAX_IMAGES);
    }

    #[test]
    fn video_urls_in_text() {
        let known = vec![VideoRef { url: "https://youtu.be/abc123".into(), title: Some("Tour".into()), thumbnail: None }];
        let text = "Watch https://youtu.be/abc123 or https://vimeo.com/76979871 or https://www.youtube.com/watch?v=xyz_9";
        let out = videos(&known, text);
        let urls: Vec<&str> = out.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(urls, vec!["https://youtu.be/abc123", "https://vimeo.com/76979871", "https://www.youtube.com/watch?v=xyz_9"]);
        assert_eq!(out[0].title.as_deref(), Some("Tour"));
    }
}

//! Media library.

use serde::{Deserialize, Serialize};
use storyreel_core::{Result, StoryError};
use storyreel_playback::MediaResolver;
use storyreel_timeline::{ClipKind, ClipMedia, MediaRef};
use tracing::{debug, info};

/// One asset known to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub media: MediaRef,
    pub url: String,
    pub kind: ClipKind,
    pub intrinsic_duration: Option<f64>,
}

impl MediaItem {
    /// The clip media a placement of this item carries.
    pub fn clip_media(&self) -> ClipMedia {
        match self.kind {
            ClipKind::Image => ClipMedia::image(self.media.clone()),
            ClipKind::Video => ClipMedia::video(self.media.clone(), self.intrinsic_duration),
            ClipKind::Audio => ClipMedia::audio(self.media.clone(), self.intrinsic_duration),
        }
    }
}

/// Owns the assets; clips only hold [`MediaRef`]s into it.
#[derive(Debug, Clone, Default)]
pub struct MediaLibrary {
    items: Vec<MediaItem>,
    next_id: u64,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library of stills, one per URL, in order.
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut library = Self::new();
        for url in urls {
            library.add(url, ClipKind::Image, None);
        }
        library
    }

    /// Register an asset and return its handle (`media-N`).
    pub fn add(
        &mut self,
        url: impl Into<String>,
        kind: ClipKind,
        intrinsic_duration: Option<f64>,
    ) -> MediaRef {
        self.next_id += 1;
        let media = MediaRef::new(format!("media-{}", self.next_id));
        let item = MediaItem {
            media: media.clone(),
            url: url.into(),
            kind,
            intrinsic_duration,
        };
        debug!(media = %media, url = %item.url, kind = kind.label(), "Media added");
        self.items.push(item);
        media
    }

    /// Forget an asset. Dependent clips are removed by the caller.
    pub fn remove(&mut self, media: &MediaRef) -> Result<MediaItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.media == *media)
            .ok_or_else(|| StoryError::NotFound(format!("media {media}")))?;
        let item = self.items.remove(index);
        info!(media = %media, "Media removed from library");
        Ok(item)
    }

    pub fn list(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, media: &MediaRef) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.media == *media)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl MediaResolver for MediaLibrary {
    fn resolve(&self, media: &MediaRef) -> Option<String> {
        self.get(media).map(|item| item.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_urls_keeps_order() {
        let library = MediaLibrary::from_urls(["https://a", "https://b"]);
        let refs: Vec<&str> = library.list().iter().map(|i| i.media.as_str()).collect();
        assert_eq!(refs, ["media-1", "media-2"]);
        assert_eq!(
            library.resolve(&MediaRef::new("media-2")).as_deref(),
            Some("https://b")
        );
    }

    #[test]
    fn test_remove() {
        let mut library = MediaLibrary::from_urls(["https://a"]);
        let media = MediaRef::new("media-1");
        assert_eq!(library.remove(&media).unwrap().url, "https://a");
        assert!(library.is_empty());
        assert!(matches!(library.remove(&media), Err(StoryError::NotFound(_))));
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut library = MediaLibrary::new();
        let first = library.add("a", ClipKind::Image, None);
        library.remove(&first).unwrap();
        let second = library.add("b", ClipKind::Image, None);
        assert_ne!(first, second);
    }

    #[test]
    fn test_clip_media_carries_duration() {
        let mut library = MediaLibrary::new();
        let media = library.add("song.mp3", ClipKind::Audio, Some(42.0));
        let clip_media = library.get(&media).unwrap().clip_media();
        assert_eq!(clip_media.kind(), ClipKind::Audio);
        assert_eq!(clip_media.intrinsic_duration(), Some(42.0));
    }
}

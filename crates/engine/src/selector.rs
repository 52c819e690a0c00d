use serde::{Deserialize, Serialize};

pub const MIN_CLIPS_PER_DESTINATION: usize = 1;
pub const MAX_CLIPS_PER_DESTINATION: usize = 3;
pub const HD_MIN_WIDTH: u32 = 1280;

/// One playable clip chosen for a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDescriptor {
    #[serde(rename = "destination")]
    pub destination_name: String,
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(rename = "duration", default)]
    pub native_duration: f64,
    #[serde(rename = "thumbnail", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// A video entry as returned by the stock-footage search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockVideo {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video_files: Vec<VideoFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFile {
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub link: String,
}

impl VideoFile {
    fn is_hd(&self) -> bool {
        self.quality.as_deref() == Some("hd") && self.width.unwrap_or(0) >= HD_MIN_WIDTH
    }
}

pub fn clamp_clip_count(requested: usize) -> usize {
    requested.clamp(MIN_CLIPS_PER_DESTINATION, MAX_CLIPS_PER_DESTINATION)
}

/// Number of candidates to ask the search for, leaving room for unusable entries.
pub fn candidate_count(requested: usize) -> usize {
    clamp_clip_count(requested) * 2
}

pub fn search_query(destination: &str) -> String {
    format!("{} travel aerial city", destination.trim())
}

/// Turns a search result into at most `max_count` descriptors for `destination`.
///
/// Each video contributes its HD file if it has one, otherwise its first file.
/// Videos whose chosen file lacks a link or frame dimensions are skipped and
/// the next candidate takes their place.
pub fn select_clips(destination: &str, videos: &[StockVideo], max_count: usize) -> Vec<ClipDescriptor> {
    let max_count = clamp_clip_count(max_count);

    videos
        .iter()
        .filter_map(|video| {
            let file = video
                .video_files
                .iter()
                .find(|f| f.is_hd())
                .or_else(|| video.video_files.first())?;
            if file.link.is_empty() {
                return None;
            }
            let (width, height) = (file.width?, file.height?);
            Some(ClipDescriptor {
                destination_name: destination.to_string(),
                source_url: file.link.clone(),
                width,
                height,
                native_duration: video.duration,
                thumbnail_url: video.image.clone(),
            })
        })
        .take(max_count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(quality: &str, width: u32, link: &str) -> VideoFile {
        VideoFile {
            quality: Some(quality.to_string()),
            width: Some(width),
            height: Some(width * 9 / 16),
            link: link.to_string(),
        }
    }

    fn video(id: u64, files: Vec<VideoFile>) -> StockVideo {
        StockVideo {
            id,
            duration: 12.0,
            image: Some(format!("https://img.example/{id}.jpg")),
            video_files: files,
        }
    }

    #[test]
    fn prefers_wide_hd_file() {
        let videos = vec![video(
            1,
            vec![
                file("sd", 640, "sd.mp4"),
                file("hd", 1280, "hd.mp4"),
                file("uhd", 3840, "uhd.mp4"),
            ],
        )];
        let clips = select_clips("Lisbon", &videos, 1);
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].source_url, "hd.mp4");
        assert_eq!(clips[0].width, 1280);
        assert_eq!(clips[0].destination_name, "Lisbon");
        assert_eq!(clips[0].thumbnail_url.as_deref(), Some("https://img.example/1.jpg"));
    }

    #[test]
    fn narrow_hd_falls_back_to_first_file() {
        let videos = vec![video(1, vec![file("sd", 960, "first.mp4"), file("hd", 1024, "narrow.mp4")])];
        let clips = select_clips("Oslo", &videos, 2);
        assert_eq!(clips[0].source_url, "first.mp4");
    }

    #[test]
    fn takes_at_most_clamped_count() {
        let videos: Vec<_> = (0..6).map(|i| video(i, vec![file("hd", 1920, "x.mp4")])).collect();
        assert_eq!(select_clips("Rome", &videos, 10).len(), 3);
        assert_eq!(select_clips("Rome", &videos, 0).len(), 1);
    }

    #[test]
    fn unusable_videos_are_dropped() {
        let mut no_dims = file("hd", 1920, "x.mp4");
        no_dims.width = None;
        let videos = vec![
            video(1, vec![]),
            video(2, vec![file("hd", 1920, "")]),
            video(3, vec![no_dims]),
        ];
        assert!(select_clips("Cork", &videos, 3).is_empty());
        assert!(select_clips("Cork", &[], 3).is_empty());
    }

    #[test]
    fn unusable_leading_candidate_is_replaced() {
        let mut no_dims = file("hd", 1920, "first.mp4");
        no_dims.height = None;
        let videos = vec![
            video(1, vec![no_dims]),
            video(2, vec![file("hd", 1920, "second.mp4")]),
            video(3, vec![file("hd", 1920, "third.mp4")]),
            video(4, vec![file("hd", 1920, "fourth.mp4")]),
        ];
        let urls: Vec<_> = select_clips("Paris", &videos, 2)
            .into_iter()
            .map(|c| c.source_url)
            .collect();
        assert_eq!(urls, vec!["second.mp4", "third.mp4"]);
    }

    #[test]
    fn query_and_candidate_count() {
        assert_eq!(search_query(" Paris "), "Paris travel aerial city");
        assert_eq!(candidate_count(2), 4);
        assert_eq!(candidate_count(9), 6);
    }

    #[test]
    fn precomputed_descriptor_uses_wire_names() {
        let clip: ClipDescriptor = serde_json::from_value(serde_json::json!({
            "destination": "Paris",
            "url": "https://cdn.example/paris.mp4"
        }))
        .unwrap();
        assert_eq!(clip.destination_name, "Paris");
        assert_eq!(clip.width, 0);
        assert_eq!(clip.thumbnail_url, None);
    }
}

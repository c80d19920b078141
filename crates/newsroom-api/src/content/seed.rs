//! Seed content
//!
//! The content served before anything has been written to the store. Used
//! both to provision an empty store at startup and as the fallback when the
//! store cannot be read.

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{ContentDocument, NewsItem, VideoItem};

/// Load the seed document from `path`, or use the built-in one.
pub async fn load_seed(path: Option<&Path>) -> Result<ContentDocument> {
    let Some(path) = path else {
        return Ok(default_content());
    };

    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let document = serde_json::from_slice(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;

    tracing::info!("Seed content loaded from {}", path.display());
    Ok(document)
}

/// Built-in seed: four news stories, three videos, no trending items.
pub fn default_content() -> ContentDocument {
    let news = [
        news(
            "news_1",
            "Global Climate Summit Reaches Historic Agreement",
            "Environment",
            "2 hours ago",
            "World leaders unite on unprecedented climate action plan, setting ambitious targets for carbon neutrality by 2035...",
            "articles/climate-summit.html",
        ),
        news(
            "news_2",
            "Tech Giants Announce AI Ethics Initiative",
            "Technology",
            "5 hours ago",
            "Major technology companies collaborate on new standards for responsible AI development and deployment...",
            "articles/ai-ethics-initiative.html",
        ),
        news(
            "news_3",
            "Space Tourism Industry Sees Major Breakthrough",
            "Space",
            "8 hours ago",
            "New propulsion technology makes space travel more accessible and affordable for civilian passengers...",
            "articles/space-tourism-breakthrough.html",
        ),
        news(
            "news_4",
            "Revolutionary Medical Treatment Shows Promise",
            "Health",
            "12 hours ago",
            "Clinical trials reveal breakthrough therapy could transform treatment for rare genetic disorders...",
            "articles/medical-treatment-promise.html",
        ),
    ];

    let videos = [
        video("video_1", "JjH8AfUIB8E", "News Podcast Episode"),
        video("video_2", "45OISlCdnDk", "News Podcast Episode 2"),
        video("video_3", "fuRRCZRcE0qMAUPn", "News Podcast Episode 3"),
    ];

    ContentDocument {
        news: news.iter().filter_map(|item| serde_json::to_value(item).ok()).collect(),
        videos: videos.iter().filter_map(|item| serde_json::to_value(item).ok()).collect(),
        trending: Vec::new(),
        extra: Default::default(),
    }
}

fn news(id: &str, title: &str, category: &str, time: &str, excerpt: &str, href: &str) -> NewsItem {
    NewsItem {
        id: id.to_string(),
        title: title.into(),
        category: category.into(),
        time: time.into(),
        excerpt: excerpt.into(),
        href: href.into(),
    }
}

fn video(id: &str, youtube_id: &str, title: &str) -> VideoItem {
    VideoItem {
        id: id.to_string(),
        youtube_id: youtube_id.into(),
        title: title.into(),
        channel: "Your Channel".into(),
        description: "Embedded YouTube episode.".into(),
    }
}

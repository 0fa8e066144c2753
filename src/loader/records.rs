//! Typed CSV records, one struct per input file.
//!
//! Column types are declared here instead of inferred from the data, so a
//! field that fails to parse surfaces as a row-level warning at read time
//! rather than as a mistyped value in the store.

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct YoutuberRecord {
    pub id: i64,
    pub channel_name: String,
    pub youtuber_name: String,
    pub description: Option<String>,
    pub channel_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    pub id: i64,
    pub youtuber_id: i64,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub website_url: Option<String>,
    pub contact_info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoRecord {
    pub id: i64,
    pub youtuber_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistRecord {
    pub id: i64,
    #[serde(rename = "titol")]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoCategoryRecord {
    pub video_id: i64,
    pub category_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoPlaylistRecord {
    pub video_id: i64,
    #[serde(rename = "llista_reproduccio_id")]
    pub playlist_id: i64,
}

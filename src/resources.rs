use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{UserId, UserSummary};

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PostId(pub String);
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct JobId(pub String);
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct EventId(pub String);
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LocationId(pub String);

#[derive(Eq, PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Media,
    Article,
    Discussion,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub author: UserId,
    pub content: String,
    pub media: Option<String>,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub title: Option<String>,
    pub link: Option<String>,
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post as listed in the feed, with its author resolved.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    pub author_profile: Option<UserSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub media: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub size: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: JobId,
    pub user: UserId,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateJob {
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum EventCategory {
    #[serde(rename = "Alumni Meetups")]
    AlumniMeetups,
    #[serde(rename = "Motivational Talks")]
    MotivationalTalks,
    #[serde(rename = "Success Stories")]
    SuccessStories,
    #[serde(rename = "Panel Discussions")]
    PanelDiscussions,
    #[serde(rename = "Q&A Sessions")]
    QaSessions,
    #[serde(rename = "Tech Sessions")]
    TechSessions,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: EventId,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category: EventCategory,
    pub posted_by: UserId,
    pub registered_users: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category: EventCategory,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventRegistration {
    pub message: String,
    pub event: Event,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IsRegistered {
    pub is_registered: bool,
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum SurveyType {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "_id")]
    pub id: LocationId,
    pub latitude: f64,
    pub longitude: f64,
    pub lat_long_combined: String,
    pub address: String,
    pub file_number: String,
    pub survey_date: NaiveDate,
    pub category: String,
    pub survey_type: SurveyType,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub file_number: String,
    pub survey_date: NaiveDate,
    pub category: String,
    pub survey_type: SurveyType,
}

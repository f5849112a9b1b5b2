use crate::error::StreamApiError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Live streams of one fetch, keyed by canonical stream URL.
pub type StreamMap = BTreeMap<String, StreamRecord>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    pub username: String,
    pub twitch: String,
    pub id: String,
    pub logo: String,
    pub url: String,
    pub status: String,
    pub game: String,
}

impl StreamRecord {
    pub const REQUIRED_FIELDS: [&'static str; 7] =
        ["username", "twitch", "id", "logo", "url", "status", "game"];

    /// Builds a record from one element of the API's JSON array.
    ///
    /// Every field in [`Self::REQUIRED_FIELDS`] must be present and hold a
    /// string. `id` additionally accepts an integer, which is kept in its
    /// decimal form. Unknown keys are ignored.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, StreamApiError> {
        let object = value
            .as_object()
            .ok_or_else(|| StreamApiError::MalformedRecord {
                index,
                field: "<record>".to_string(),
                problem: "is not a JSON object".to_string(),
            })?;

        let field = |name: &str| -> Result<String, StreamApiError> {
            match object.get(name) {
                None => Err(StreamApiError::MalformedRecord {
                    index,
                    field: name.to_string(),
                    problem: "is missing".to_string(),
                }),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(Value::Number(n)) if name == "id" && (n.is_u64() || n.is_i64()) => {
                    Ok(n.to_string())
                }
                Some(other) => Err(StreamApiError::MalformedRecord {
                    index,
                    field: name.to_string(),
                    problem: format!("has unexpected value {}", other),
                }),
            }
        };

        Ok(Self {
            username: field("username")?,
            twitch: field("twitch")?,
            id: field("id")?,
            logo: field("logo")?,
            url: field("url")?,
            status: field("status")?,
            game: field("game")?,
        })
    }
}

/// Author line of an [`Announcement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementAuthor {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-neutral rich payload of a channel message.
///
/// This is what the bot renders for a stream and what it reads back out of
/// messages already in the channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Announcement {
    pub title: Option<String>,
    pub url: Option<String>,
    pub colour: Option<u32>,
    pub author: Option<AnnouncementAuthor>,
    pub thumbnail: Option<String>,
    pub fields: Vec<AnnouncementField>,
}

/// A message as listed from the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: u64,
    pub authored_by_self: bool,
    pub embeds: Vec<Announcement>,
}

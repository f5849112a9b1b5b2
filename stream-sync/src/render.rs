//! Conversion between stream records and announcement payloads.

use streams_core::{Announcement, AnnouncementAuthor, AnnouncementField, StreamRecord};
use tracing::info;

pub const EMBED_COLOUR: u32 = 0x6441A5;
pub const AUTHOR_SUFFIX: &str = "is spelunking!";
pub const GAME_FIELD: &str = "Game";
pub const TITLE_FIELD: &str = "Stream Title";

pub fn author_name(username: &str) -> String {
    format!("{} {}", username, AUTHOR_SUFFIX)
}

/// True when an embed author name marks one of our announcements.
pub fn is_announcement_author(name: &str) -> bool {
    name.strip_suffix(AUTHOR_SUFFIX)
        .is_some_and(|rest| rest.ends_with(' '))
}

pub fn render(record: &StreamRecord) -> Announcement {
    Announcement {
        title: Some(record.url.clone()),
        url: Some(record.url.clone()),
        colour: Some(EMBED_COLOUR),
        author: Some(AnnouncementAuthor {
            name: author_name(&record.username),
            url: Some(record.url.clone()),
        }),
        thumbnail: Some(record.logo.clone()),
        fields: vec![
            AnnouncementField {
                name: GAME_FIELD.to_string(),
                value: record.game.clone(),
                inline: false,
            },
            AnnouncementField {
                name: TITLE_FIELD.to_string(),
                value: record.status.clone(),
                inline: false,
            },
        ],
    }
}

/// The two fields compared between cycles. `None` means the field is absent,
/// which is not the same as an empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedFields<'a> {
    pub game: Option<&'a str>,
    pub status: Option<&'a str>,
}

pub fn extract_fields(announcement: &Announcement) -> DisplayedFields<'_> {
    // last one wins if a name repeats
    let lookup = |name: &str| {
        announcement
            .fields
            .iter()
            .rev()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    };

    DisplayedFields {
        game: lookup(GAME_FIELD),
        status: lookup(TITLE_FIELD),
    }
}

/// Compares the trimmed record values against what the message shows.
pub fn contents_changed(record: &StreamRecord, announcement: &Announcement) -> bool {
    let shown = extract_fields(announcement);

    if Some(record.game.trim()) != shown.game {
        info!(
            "Game changed. Before: {:?}, After: {:?}",
            shown.game, record.game
        );
        return true;
    }

    if Some(record.status.trim()) != shown.status {
        info!(
            "Status changed. Before: {:?}, After: {:?}",
            shown.status, record.status
        );
        return true;
    }

    false
}

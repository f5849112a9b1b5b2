//! Mapping between serenity embeds and platform-neutral announcements.

use serenity::all::{CreateEmbed, CreateEmbedAuthor, Embed, Message, UserId};
use streams_core::{Announcement, AnnouncementAuthor, AnnouncementField, StoredMessage};

pub fn to_create_embed(announcement: &Announcement) -> CreateEmbed {
    let mut embed = CreateEmbed::new();

    if let Some(title) = &announcement.title {
        embed = embed.title(title);
    }
    if let Some(url) = &announcement.url {
        embed = embed.url(url);
    }
    if let Some(colour) = announcement.colour {
        embed = embed.colour(colour);
    }
    if let Some(author) = &announcement.author {
        let mut create_author = CreateEmbedAuthor::new(&author.name);
        if let Some(url) = &author.url {
            create_author = create_author.url(url);
        }
        embed = embed.author(create_author);
    }
    if let Some(thumbnail) = &announcement.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }
    for field in &announcement.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }

    embed
}

pub fn from_embed(embed: &Embed) -> Announcement {
    Announcement {
        title: embed.title.clone(),
        url: embed.url.clone(),
        colour: embed.colour.map(|colour| colour.0),
        author: embed.author.as_ref().map(|author| AnnouncementAuthor {
            name: author.name.clone(),
            url: author.url.clone(),
        }),
        thumbnail: embed.thumbnail.as_ref().map(|thumbnail| thumbnail.url.clone()),
        fields: embed
            .fields
            .iter()
            .map(|field| AnnouncementField {
                name: field.name.clone(),
                value: field.value.clone(),
                inline: field.inline,
            })
            .collect(),
    }
}

pub fn stored_message(message: &Message, bot_user_id: UserId) -> StoredMessage {
    StoredMessage {
        id: message.id.get(),
        authored_by_self: message.author.id == bot_user_id,
        embeds: message.embeds.iter().map(from_embed).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn announcement() -> Announcement {
        Announcement {
            title: Some("https://twitch.tv/alice".to_string()),
            url: Some("https://twitch.tv/alice".to_string()),
            colour: Some(0x6441A5),
            author: Some(AnnouncementAuthor {
                name: "Alice is spelunking!".to_string(),
                url: Some("https://twitch.tv/alice".to_string()),
            }),
            thumbnail: Some("https://static.example/alice.png".to_string()),
            fields: vec![
                AnnouncementField {
                    name: "Game".to_string(),
                    value: "Spelunky 2".to_string(),
                    inline: false,
                },
                AnnouncementField {
                    name: "Stream Title".to_string(),
                    value: "Daily".to_string(),
                    inline: false,
                },
            ],
        }
    }

    #[test]
    fn test_create_embed_payload() {
        let payload = serde_json::to_value(to_create_embed(&announcement())).unwrap();

        assert_eq!(payload["title"], "https://twitch.tv/alice");
        assert_eq!(payload["url"], "https://twitch.tv/alice");
        assert_eq!(payload["color"], 0x6441A5);
        assert_eq!(payload["author"]["name"], "Alice is spelunking!");
        assert_eq!(payload["author"]["url"], "https://twitch.tv/alice");
        assert_eq!(payload["thumbnail"]["url"], "https://static.example/alice.png");
        assert_eq!(payload["fields"][0]["name"], "Game");
        assert_eq!(payload["fields"][0]["value"], "Spelunky 2");
        assert_eq!(payload["fields"][0]["inline"], false);
        assert_eq!(payload["fields"][1]["name"], "Stream Title");
    }

    #[test]
    fn test_from_received_embed() {
        let embed: Embed = serde_json::from_value(json!({
            "type": "rich",
            "title": "https://twitch.tv/alice",
            "url": "https://twitch.tv/alice",
            "color": 0x6441A5,
            "author": { "name": "Alice is spelunking!", "url": "https://twitch.tv/alice" },
            "thumbnail": {
                "url": "https://static.example/alice.png",
                "proxy_url": "https://media.example/alice.png",
                "width": 300,
                "height": 300
            },
            "fields": [
                { "name": "Game", "value": "Spelunky 2", "inline": false },
                { "name": "Stream Title", "value": "Daily", "inline": false }
            ]
        }))
        .unwrap();

        assert_eq!(from_embed(&embed), announcement());
    }

    #[test]
    fn test_from_sparse_embed() {
        let embed: Embed = serde_json::from_value(json!({ "type": "rich" })).unwrap();
        let converted = from_embed(&embed);
        assert_eq!(converted, Announcement::default());
    }
}

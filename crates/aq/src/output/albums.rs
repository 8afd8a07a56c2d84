//! Album output formatting.

use album_filter_rs::{Album, AlbumPermission, QueryPage};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_date, format_tags, truncate_str};

/// JSON output structure for list command.
#[derive(Serialize)]
pub struct ListOutput<'a> {
    pub albums: Vec<AlbumOutput<'a>>,
    pub total: usize,
    pub skipped: usize,
}

/// JSON output structure for a single album.
#[derive(Serialize)]
pub struct AlbumOutput<'a> {
    pub id: i32,
    pub name: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub owner: &'a str,
    pub created_at: String,
    pub tags: Vec<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub user_permissions: &'a [AlbumPermission],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub group_permissions: &'a [AlbumPermission],
}

impl<'a> From<&'a Album> for AlbumOutput<'a> {
    fn from(album: &'a Album) -> Self {
        Self {
            id: album.id,
            name: &album.name,
            description: &album.description,
            location: &album.location,
            owner: &album.owner,
            created_at: album.created_at.to_rfc3339(),
            tags: album.tags.iter().map(|t| t.name.as_str()).collect(),
            user_permissions: &album.user_permissions,
            group_permissions: &album.group_permissions,
        }
    }
}

/// Formats a query page as JSON.
pub fn format_albums_json(page: &QueryPage<'_>) -> Result<String, serde_json::Error> {
    let output = ListOutput {
        albums: page.albums.iter().map(|a| AlbumOutput::from(*a)).collect(),
        total: page.total,
        skipped: page.skipped,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats albums as a table.
pub fn format_albums_table(albums: &[&Album], use_colors: bool) -> String {
    if albums.is_empty() {
        return "No albums found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!(
        "{:<6} {:<11} {:<12} {:<15} {:<20} {}",
        "ID", "Date", "Owner", "Location", "Tags", "Name"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for album in albums {
        let owner = truncate_str(&album.owner, 12);
        let location = truncate_str(&album.location, 15);
        let tags = format_tags(&album.tags, 20);
        let name = if use_colors {
            album.name.bold().to_string()
        } else {
            album.name.clone()
        };

        let line = format!(
            "{:<6} {:<11} {:<12} {:<15} {:<20} {}",
            album.id,
            format_date(album.created_at),
            owner,
            location,
            tags,
            name
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

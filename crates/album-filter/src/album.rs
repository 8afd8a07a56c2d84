//! Album records and the field lookups filters are evaluated against.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only view of a record a filter can be evaluated against.
///
/// [`Album`] implements it; the surrounding service can implement it for
/// its own album type to avoid a conversion.
pub trait AlbumRecord {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn location(&self) -> &str;
    fn owner(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    /// Tag names, in order.
    fn tag_names(&self) -> Vec<&str>;
    /// Owner ids of the user permission grants.
    fn user_permission_owners(&self) -> Vec<&str>;
    /// Owner ids of the group permission grants.
    fn group_permission_owners(&self) -> Vec<&str>;
}

/// A field a filter expression can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    Location,
    Owner,
    Date,
    Tag,
    UserPermissions,
    GroupPermissions,
}

impl Field {
    /// Every field, in display order.
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Description,
        Field::Location,
        Field::Owner,
        Field::Date,
        Field::Tag,
        Field::UserPermissions,
        Field::GroupPermissions,
    ];

    /// Resolves a field name as written in a filter. Names are
    /// case-sensitive.
    pub fn from_name(name: &str) -> Option<Field> {
        match name {
            "name" => Some(Field::Name),
            "description" => Some(Field::Description),
            "location" => Some(Field::Location),
            "owner" => Some(Field::Owner),
            "date" => Some(Field::Date),
            "tag" => Some(Field::Tag),
            "permissions.user" => Some(Field::UserPermissions),
            "permissions.group" => Some(Field::GroupPermissions),
            _ => None,
        }
    }

    /// The canonical name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Location => "location",
            Field::Owner => "owner",
            Field::Date => "date",
            Field::Tag => "tag",
            Field::UserPermissions => "permissions.user",
            Field::GroupPermissions => "permissions.group",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something a user or group may do with an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "album.read")]
    Read,
    #[serde(rename = "album.write")]
    Write,
    #[serde(rename = "album.edit")]
    Edit,
    #[serde(rename = "album.delete")]
    Delete,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Read => "album.read",
            Permission::Write => "album.write",
            Permission::Edit => "album.edit",
            Permission::Delete => "album.delete",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "album.read" => Ok(Permission::Read),
            "album.write" => Ok(Permission::Write),
            "album.edit" => Ok(Permission::Edit),
            "album.delete" => Ok(Permission::Delete),
            other => Err(format!("invalid permission: {other}")),
        }
    }
}

/// A tag attached to an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Permissions granted on an album to one user or group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumPermission {
    /// User id or group name the grant belongs to.
    pub owner_id: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl AlbumPermission {
    pub fn new(owner_id: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            owner_id: owner_id.into(),
            permissions,
        }
    }
}

/// A photo album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Id of the user who owns the album.
    pub owner: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub user_permissions: Vec<AlbumPermission>,
    #[serde(default)]
    pub group_permissions: Vec<AlbumPermission>,
}

impl Album {
    /// Creates an album with no description, location, tags or grants.
    pub fn new(
        id: i32,
        name: impl Into<String>,
        owner: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            location: String::new(),
            owner: owner.into(),
            created_at,
            tags: Vec::new(),
            user_permissions: Vec::new(),
            group_permissions: Vec::new(),
        }
    }

    /// Returns true if the user was granted `permission` on this album.
    pub fn has_user_permission(&self, user_id: &str, permission: Permission) -> bool {
        has_permission(&self.user_permissions, user_id, permission)
    }

    /// Returns true if the group was granted `permission` on this album.
    pub fn has_group_permission(&self, group: &str, permission: Permission) -> bool {
        has_permission(&self.group_permissions, group, permission)
    }
}

fn has_permission(grants: &[AlbumPermission], owner_id: &str, permission: Permission) -> bool {
    grants
        .iter()
        .filter(|g| g.owner_id == owner_id)
        .any(|g| g.permissions.contains(&permission))
}

impl AlbumRecord for Album {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    fn user_permission_owners(&self) -> Vec<&str> {
        self.user_permissions
            .iter()
            .map(|p| p.owner_id.as_str())
            .collect()
    }

    fn group_permission_owners(&self) -> Vec<&str> {
        self.group_permissions
            .iter()
            .map(|p| p.owner_id.as_str())
            .collect()
    }
}

impl<R: AlbumRecord + ?Sized> AlbumRecord for &R {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn location(&self) -> &str {
        (**self).location()
    }

    fn owner(&self) -> &str {
        (**self).owner()
    }

    fn created_at(&self) -> DateTime<Utc> {
        (**self).created_at()
    }

    fn tag_names(&self) -> Vec<&str> {
        (**self).tag_names()
    }

    fn user_permission_owners(&self) -> Vec<&str> {
        (**self).user_permission_owners()
    }

    fn group_permission_owners(&self) -> Vec<&str> {
        (**self).group_permission_owners()
    }
}

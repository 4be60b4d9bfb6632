use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Accion,
    Aventura,
    Estrategia,
    Rpg,
    Deportes,
    Carreras,
    Puzzle,
    Simulacion,
    Terror,
    Multijugador,
    Otro,
}

impl Genre {
    pub const ALL: [Genre; 11] = [
        Self::Accion,
        Self::Aventura,
        Self::Estrategia,
        Self::Rpg,
        Self::Deportes,
        Self::Carreras,
        Self::Puzzle,
        Self::Simulacion,
        Self::Terror,
        Self::Multijugador,
        Self::Otro,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Accion => "accion",
            Self::Aventura => "aventura",
            Self::Estrategia => "estrategia",
            Self::Rpg => "rpg",
            Self::Deportes => "deportes",
            Self::Carreras => "carreras",
            Self::Puzzle => "puzzle",
            Self::Simulacion => "simulacion",
            Self::Terror => "terror",
            Self::Multijugador => "multijugador",
            Self::Otro => "otro",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Accion => "Acción",
            Self::Aventura => "Aventura",
            Self::Estrategia => "Estrategia",
            Self::Rpg => "RPG",
            Self::Deportes => "Deportes",
            Self::Carreras => "Carreras",
            Self::Puzzle => "Puzzle",
            Self::Simulacion => "Simulación",
            Self::Terror => "Terror",
            Self::Multijugador => "Multijugador",
            Self::Otro => "Otro",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.slug() == wanted)
            .ok_or_else(|| format!("unknown genre '{s}'"))
    }
}

/// An uploaded file owned by a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Path relative to the media root, `/`-separated.
    pub name: String,
    /// Local path the bytes are read from.
    pub path: PathBuf,
}

impl StoredFile {
    pub fn has_extension(&self, extension: &str) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension))
    }
}

/// Average rating with one decimal, kept as tenths (`35` is `3.5`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u16);

impl Rating {
    pub fn from_tenths(tenths: u16) -> Self {
        Self(tenths)
    }

    pub fn tenths(self) -> u16 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / 10.0
    }

    /// Fold one more vote into an average over `votes` votes, rounding half
    /// up to one decimal.
    pub fn add_vote(self, votes: u32, value: u8) -> Self {
        let votes_after = u64::from(votes) + 1;
        let total_tenths = u64::from(self.0) * u64::from(votes) + u64::from(value) * 10;
        let rounded = (2 * total_tenths + votes_after) / (2 * votes_after);
        Self(rounded as u16)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// A published (or publishable) game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: RecordId,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub genre: Genre,
    pub cover_image: Option<String>,
    pub archive_file: Option<StoredFile>,
    pub external_url: Option<String>,
    pub downloads: u64,
    pub views: u64,
    pub rating: Rating,
    pub rating_votes: u32,
    pub is_web_playable: bool,
    pub playable_path: String,
    pub processing_error: String,
    pub is_approved: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub uploaded_by: UserId,
}

impl ContentRecord {
    pub fn from_new(id: RecordId, new: NewRecord, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            short_description: new.short_description,
            description: new.description,
            genre: new.genre,
            cover_image: new.cover_image,
            archive_file: new.archive_file,
            external_url: new.external_url,
            downloads: 0,
            views: 0,
            rating: Rating::default(),
            rating_votes: 0,
            is_web_playable: false,
            playable_path: String::new(),
            processing_error: String::new(),
            is_approved: new.is_approved,
            is_featured: new.is_featured,
            created_at: now,
            updated_at: now,
            uploaded_by: new.uploaded_by,
        }
    }

    pub fn apply_publish(&mut self, fields: &PublishFields) {
        self.playable_path = fields.playable_path.clone();
        self.is_web_playable = fields.is_web_playable;
        self.processing_error = fields.processing_error.clone();
        self.updated_at = fields.updated_at;
    }
}

/// Fields of a record about to be inserted; the store assigns id and
/// timestamps.
#[derive(Clone, Debug)]
pub struct NewRecord {
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub genre: Genre,
    pub cover_image: Option<String>,
    pub archive_file: Option<StoredFile>,
    pub external_url: Option<String>,
    pub is_approved: bool,
    pub is_featured: bool,
    pub uploaded_by: UserId,
}

/// The publish columns, written together in one update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishFields {
    pub playable_path: String,
    pub is_web_playable: bool,
    pub processing_error: String,
    pub updated_at: DateTime<Utc>,
}

impl PublishFields {
    pub fn published(playable_path: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            playable_path: playable_path.into(),
            is_web_playable: true,
            processing_error: String::new(),
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRating {
    pub record: RecordId,
    pub user: UserId,
    pub value: u8,
    pub created_at: DateTime<Utc>,
}

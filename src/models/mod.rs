use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ANIME_GENRES: [&str; 12] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Fantasy",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Sports",
    "Supernatural",
];

pub const ANIME_TYPES: [&str; 5] = ["All", "TV", "Movie", "OVA", "Special"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub name: String,
    pub genre: String,
    pub primary_genre: String,
    pub kind: Option<String>,
    pub rating: f64,
    pub members: u64,
}

impl TitleRecord {
    pub fn new(name: impl Into<String>, genre: impl Into<String>, kind: Option<&str>, rating: f64, members: u64) -> Self {
        let genre = genre.into();
        Self {
            name: name.into(),
            primary_genre: primary_genre_of(&genre),
            genre,
            kind: kind.map(str::to_string),
            rating,
            members,
        }
    }

    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre.split(',').map(str::trim).filter(|g| !g.is_empty())
    }
}

pub fn primary_genre_of(genre: &str) -> String {
    genre.split(',').next().unwrap_or_default().trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Exact(String),
}

impl TypeFilter {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            TypeFilter::All
        } else {
            TypeFilter::Exact(trimmed.to_lowercase())
        }
    }

    pub fn matches(&self, kind: Option<&str>) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Exact(wanted) => kind.map(|k| k.to_lowercase() == *wanted).unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationCriteria {
    pub genre: String,
    pub min_rating: f64,
    pub kind: TypeFilter,
}

impl RecommendationCriteria {
    pub fn new(genre: impl Into<String>, min_rating: f64, kind: &str) -> Self {
        Self {
            genre: genre.into(),
            min_rating,
            kind: TypeFilter::parse(kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub genre: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub rating: f64,
}

impl From<&TitleRecord> for Recommendation {
    fn from(record: &TitleRecord) -> Self {
        Self {
            name: record.name.clone(),
            genre: record.genre.clone(),
            kind: record.kind.clone(),
            rating: record.rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarTitle {
    pub name: String,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_genre_is_first_trimmed_token() {
        assert_eq!(primary_genre_of("Comedy, Drama, Romance"), "Comedy");
        assert_eq!(primary_genre_of("  Sci-Fi "), "Sci-Fi");
        assert_eq!(primary_genre_of(""), "");
    }

    #[test]
    fn test_type_filter() {
        assert_eq!(TypeFilter::parse("ALL"), TypeFilter::All);
        assert!(TypeFilter::parse("all").matches(None));

        let tv = TypeFilter::parse("tv");
        assert!(tv.matches(Some("TV")));
        assert!(!tv.matches(Some("Movie")));
        assert!(!tv.matches(None));
    }

    #[test]
    fn test_genres_iterator() {
        let record = TitleRecord::new("Show", "Action, Comedy,", Some("TV"), 8.0, 10);
        assert_eq!(record.genres().collect::<Vec<_>>(), vec!["Action", "Comedy"]);
        assert_eq!(record.primary_genre, "Action");
    }
}

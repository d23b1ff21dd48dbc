use crate::error::{RecError, RecResult};
use crate::models::TitleRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct RawTitle {
    name: String,
    #[serde(default)]
    genre: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    members: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct AnimeCatalog {
    records: Vec<TitleRecord>,
}

impl AnimeCatalog {
    pub fn new(records: Vec<TitleRecord>) -> Self {
        Self { records }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> RecResult<Self> {
        let path = path.as_ref();
        info!("Loading anime dataset from {:?}", path);

        let reader = csv::Reader::from_path(path)
            .map_err(|e| RecError::DataUnavailable(format!("cannot open {:?}: {}", path, e)))?;
        Self::from_csv(reader)
    }

    pub fn from_reader<R: Read>(reader: R) -> RecResult<Self> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> RecResult<Self> {
        let headers = reader.headers().map_err(malformed)?.clone();
        for required in ["name", "genre", "rating"] {
            if !headers.iter().any(|h| h == required) {
                return Err(RecError::DataUnavailable(format!("dataset is missing the {} column", required)));
            }
        }

        let mut records = Vec::new();
        let mut dropped = 0usize;
        let mut missing_members = 0usize;

        for row in reader.deserialize() {
            let raw: RawTitle = row.map_err(malformed)?;
            match clean(raw, &mut missing_members) {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }

        if missing_members > 0 {
            warn!("{} titles had no usable member count, treated as 0", missing_members);
        }
        info!("Loaded {} titles ({} dropped for missing rating or genre)", records.len(), dropped);

        Ok(Self { records })
    }

    pub fn records(&self) -> &[TitleRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&TitleRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }
}

fn malformed(err: csv::Error) -> RecError {
    RecError::DataUnavailable(format!("malformed dataset: {}", err))
}

fn clean(raw: RawTitle, missing_members: &mut usize) -> Option<TitleRecord> {
    let rating = raw.rating.filter(|r| r.is_finite())?;
    let genre = raw.genre.filter(|g| !g.trim().is_empty())?;

    let members = raw.members.unwrap_or_else(|| {
        *missing_members += 1;
        0
    });
    let kind = raw.kind.filter(|k| !k.trim().is_empty());
    let name = html_escape::decode_html_entities(&raw.name).into_owned();

    Some(TitleRecord::new(name, genre, kind.as_deref(), rating, members))
}

use crate::error::{RecError, RecResult};
use crate::models::TitleRecord;
use nalgebra::DVector;
use ndarray::Array2;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    scores: Array2<f32>,
}

impl SimilarityMatrix {
    pub fn new(scores: Array2<f32>) -> RecResult<Self> {
        if scores.nrows() != scores.ncols() {
            return Err(RecError::DataUnavailable(format!(
                "similarity matrix is {}x{}, expected square",
                scores.nrows(),
                scores.ncols()
            )));
        }
        Ok(Self { scores })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> RecResult<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let rows: Vec<Vec<f32>> = serde_json::from_reader(reader)?;
        Self::from_rows(rows)
    }

    pub fn from_rows(rows: Vec<Vec<f32>>) -> RecResult<Self> {
        let n = rows.len();
        if let Some(bad) = rows.iter().position(|r| r.len() != n) {
            return Err(RecError::DataUnavailable(format!(
                "similarity row {} has {} entries, expected {}",
                bad,
                rows[bad].len(),
                n
            )));
        }
        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        let scores = Array2::from_shape_vec((n, n), flat)
            .map_err(|e| RecError::DataUnavailable(e.to_string()))?;
        Self::new(scores)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> RecResult<()> {
        let rows: Vec<Vec<f32>> = self.scores.outer_iter().map(|r| r.to_vec()).collect();
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer(writer, &rows)?;
        Ok(())
    }

    pub fn build(records: &[TitleRecord]) -> Self {
        let mut vocabulary: BTreeSet<String> = BTreeSet::new();
        for record in records {
            vocabulary.extend(record.genres().map(|g| format!("genre:{}", g)));
            if let Some(kind) = &record.kind {
                vocabulary.insert(format!("type:{}", kind));
            }
        }
        let vocabulary: Vec<String> = vocabulary.into_iter().collect();

        let vectors: Vec<DVector<f32>> = records
            .iter()
            .map(|record| {
                DVector::from_iterator(
                    vocabulary.len(),
                    vocabulary.iter().map(|term| {
                        let hit = match term.split_once(':') {
                            Some(("genre", g)) => record.genres().any(|rg| rg == g),
                            Some(("type", t)) => record.kind.as_deref() == Some(t),
                            _ => false,
                        };
                        if hit { 1.0 } else { 0.0 }
                    }),
                )
            })
            .collect();

        let n = vectors.len();
        let flat: Vec<f32> = vectors
            .par_iter()
            .flat_map_iter(|a| vectors.iter().map(move |b| cosine_similarity(a, b)))
            .collect();

        Self {
            scores: Array2::from_shape_vec((n, n), flat).unwrap_or_else(|_| Array2::zeros((n, n))),
        }
    }

    pub fn len(&self) -> usize {
        self.scores.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` highest-scoring other rows for `index`, best first.
    ///
    /// Ties keep row order. The queried row is always excluded, even when
    /// another row ties it at the top score.
    pub fn most_similar(&self, index: usize, k: usize) -> Vec<(usize, f32)> {
        if index >= self.len() {
            return Vec::new();
        }

        let mut ranked: Vec<(usize, f32)> = self.scores.row(index).iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        ranked
            .into_iter()
            .filter(|(i, _)| *i != index)
            .take(k)
            .collect()
    }
}

fn cosine_similarity(a: &DVector<f32>, b: &DVector<f32>) -> f32 {
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        a.dot(b) / (norm_a * norm_b)
    }
}

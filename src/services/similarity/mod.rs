use crate::algorithms::SimilarityMatrix;
use crate::error::{Outcome, RecError, RecResult};
use crate::models::SimilarTitle;
use crate::services::dataset::AnimeCatalog;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SimilarityService {
    catalog: Arc<AnimeCatalog>,
    matrix: Option<SimilarityMatrix>,
    top_k: usize,
}

impl SimilarityService {
    pub fn new(catalog: Arc<AnimeCatalog>, matrix: SimilarityMatrix, top_k: usize) -> RecResult<Self> {
        if matrix.len() != catalog.len() {
            return Err(RecError::DataUnavailable(format!(
                "similarity matrix has {} rows but the dataset has {} titles",
                matrix.len(),
                catalog.len()
            )));
        }
        Ok(Self {
            catalog,
            matrix: Some(matrix),
            top_k,
        })
    }

    pub fn disabled(catalog: Arc<AnimeCatalog>, top_k: usize) -> Self {
        Self {
            catalog,
            matrix: None,
            top_k,
        }
    }

    pub fn load<P: AsRef<Path>>(catalog: Arc<AnimeCatalog>, path: P, top_k: usize) -> RecResult<Self> {
        let matrix = SimilarityMatrix::load(path.as_ref())?;
        info!("Loaded {}x{} similarity matrix from {:?}", matrix.len(), matrix.len(), path.as_ref());
        Self::new(catalog, matrix, top_k)
    }

    pub fn is_available(&self) -> bool {
        self.matrix.is_some()
    }

    pub fn similar_to(&self, title: &str) -> Outcome<Vec<SimilarTitle>> {
        let Some(matrix) = &self.matrix else {
            return Outcome::DataUnavailable;
        };

        let Some(index) = self.catalog.position_of(title) else {
            debug!("No title named {:?}", title);
            return Outcome::NotFound;
        };

        let similar = matrix
            .most_similar(index, self.top_k)
            .into_iter()
            .filter_map(|(i, score)| {
                self.catalog.get(i).map(|record| SimilarTitle {
                    name: record.name.clone(),
                    score,
                })
            })
            .collect();

        Outcome::Success(similar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleRecord;
    use ndarray::Array2;

    fn catalog(n: usize) -> Arc<AnimeCatalog> {
        Arc::new(AnimeCatalog::new(
            (0..n)
                .map(|i| TitleRecord::new(format!("Title {}", i), "Action", Some("TV"), 7.0, 100))
                .collect(),
        ))
    }

    fn matrix(n: usize) -> SimilarityMatrix {
        SimilarityMatrix::new(Array2::from_shape_fn((n, n), |(i, j)| 1.0 / (1.0 + (i as f32 - j as f32).abs()))).unwrap()
    }

    #[test]
    fn test_similar_to_returns_five_without_self() {
        let service = SimilarityService::new(catalog(10), matrix(10), 5).unwrap();
        let similar = service.similar_to("Title 4").success().unwrap();

        assert_eq!(similar.len(), 5);
        assert!(similar.iter().all(|s| s.name != "Title 4"));
        assert_eq!(similar[0].name, "Title 3");
        assert_eq!(similar[1].name, "Title 5");
        assert!(similar.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_unknown_title_is_not_found() {
        let service = SimilarityService::new(catalog(3), matrix(3), 5).unwrap();
        assert_eq!(service.similar_to("Nope"), Outcome::NotFound);
        assert_eq!(service.similar_to("title 1"), Outcome::NotFound);
    }

    #[test]
    fn test_disabled_and_misaligned() {
        let service = SimilarityService::disabled(catalog(3), 5);
        assert!(!service.is_available());
        assert_eq!(service.similar_to("Title 0"), Outcome::DataUnavailable);

        assert!(SimilarityService::new(catalog(3), matrix(4), 5).is_err());
    }
}

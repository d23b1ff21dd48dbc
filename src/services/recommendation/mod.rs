use crate::algorithms::{Classifier, FeatureSchema};
use crate::config::ModelConfig;
use crate::error::{Outcome, RecError, RecResult};
use crate::models::{Recommendation, RecommendationCriteria, TitleRecord};
use crate::services::dataset::AnimeCatalog;
use crate::services::training::TrainedModels;
use crate::utils::{dedup_by_key, normalize_title};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

pub struct RecommendationService {
    catalog: Arc<AnimeCatalog>,
    model: Arc<dyn Classifier>,
    schema: FeatureSchema,
    max_results: usize,
}

impl RecommendationService {
    pub fn new(catalog: Arc<AnimeCatalog>, models: &TrainedModels, config: &ModelConfig) -> RecResult<Self> {
        let model = models
            .get(config.active)
            .ok_or_else(|| RecError::DataUnavailable(format!("{} model was not trained", config.active.display_name())))?;

        Ok(Self::with_model(catalog, model, models.schema().clone(), config.max_results))
    }

    pub fn with_model(catalog: Arc<AnimeCatalog>, model: Arc<dyn Classifier>, schema: FeatureSchema, max_results: usize) -> Self {
        Self {
            catalog,
            model,
            schema,
            max_results,
        }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    pub fn recommend(&self, criteria: &RecommendationCriteria) -> RecResult<Outcome<Vec<Recommendation>>> {
        let filtered = self.filter(criteria);
        if filtered.is_empty() {
            debug!("No titles match {:?}", criteria);
            return Ok(Outcome::NotFound);
        }

        let features = self.schema.encode(filtered.iter().copied());
        let predictions = self.model.predict(&features)?;

        let mut kept: Vec<&TitleRecord> = filtered
            .into_iter()
            .zip(predictions)
            .filter_map(|(record, recommendable)| recommendable.then_some(record))
            .collect();

        if kept.is_empty() {
            debug!("No matching titles predicted recommendable for {:?}", criteria);
            return Ok(Outcome::NotFound);
        }

        // Stable, so equal ratings keep catalog order.
        kept.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));

        let recommendations: Vec<Recommendation> = dedup_by_key(kept, |record| normalize_title(&record.name))
            .into_iter()
            .take(self.max_results)
            .map(Recommendation::from)
            .collect();

        debug!("Returning {} recommendations for {:?}", recommendations.len(), criteria);
        Ok(Outcome::Success(recommendations))
    }

    fn filter(&self, criteria: &RecommendationCriteria) -> Vec<&TitleRecord> {
        let needle = criteria.genre.to_lowercase();
        self.catalog
            .records()
            .iter()
            .filter(|r| r.genre.to_lowercase().contains(&needle))
            .filter(|r| r.rating >= criteria.min_rating)
            .filter(|r| criteria.kind.matches(r.kind.as_deref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::encoder::OneHotFrame;
    use ndarray::{Array1, Array2};

    struct MembersCutoff {
        width: usize,
        cutoff: f64,
    }

    impl Classifier for MembersCutoff {
        fn name(&self) -> &'static str {
            "Cutoff"
        }

        fn n_features(&self) -> usize {
            self.width
        }

        fn predict_labels(&self, features: &Array2<f64>) -> Array1<usize> {
            features.column(0).mapv(|m| usize::from(m > self.cutoff))
        }
    }

    fn service(records: Vec<TitleRecord>, max_results: usize) -> RecommendationService {
        let schema = FeatureSchema::from_frame(&OneHotFrame::encode(&records));
        let model = Arc::new(MembersCutoff {
            width: schema.width(),
            cutoff: 1000.0,
        });
        RecommendationService::with_model(Arc::new(AnimeCatalog::new(records)), model, schema, max_results)
    }

    fn names(outcome: Outcome<Vec<Recommendation>>) -> Vec<String> {
        outcome.success().unwrap().into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_dedup_keeps_highest_rated_season() {
        let svc = service(
            vec![
                TitleRecord::new("Show: Season 1", "Comedy", Some("TV"), 7.9, 5000),
                TitleRecord::new("Show: Season 2", "Comedy", Some("TV"), 8.0, 5000),
            ],
            10,
        );
        let outcome = svc.recommend(&RecommendationCriteria::new("comedy", 7.0, "all")).unwrap();
        assert_eq!(names(outcome), vec!["Show: Season 2"]);
    }

    #[test]
    fn test_filters_by_genre_rating_and_type() {
        let svc = service(
            vec![
                TitleRecord::new("A", "Action, Comedy", Some("TV"), 8.5, 5000),
                TitleRecord::new("B", "Comedy", Some("Movie"), 9.0, 5000),
                TitleRecord::new("C", "Drama", Some("TV"), 9.5, 5000),
                TitleRecord::new("D", "Comedy", Some("TV"), 6.0, 5000),
                TitleRecord::new("E", "Romantic Comedy", None, 8.0, 5000),
            ],
            10,
        );

        let all = svc.recommend(&RecommendationCriteria::new("COMEDY", 8.0, "All")).unwrap();
        assert_eq!(names(all), vec!["B", "A", "E"]);

        let tv = svc.recommend(&RecommendationCriteria::new("comedy", 8.0, "tv")).unwrap();
        assert_eq!(names(tv), vec!["A"]);
    }

    #[test]
    fn test_no_match_signals() {
        let svc = service(
            vec![
                TitleRecord::new("Popular", "Comedy", Some("TV"), 8.5, 5000),
                TitleRecord::new("Obscure", "Horror", Some("TV"), 9.0, 10),
            ],
            10,
        );

        let too_high = svc.recommend(&RecommendationCriteria::new("Comedy", 11.0, "all")).unwrap();
        assert_eq!(too_high, Outcome::NotFound);

        // Matches the filter but the model rejects it.
        let rejected = svc.recommend(&RecommendationCriteria::new("Horror", 0.0, "all")).unwrap();
        assert_eq!(rejected, Outcome::NotFound);
    }

    #[test]
    fn test_output_bounded_sorted_and_unique() {
        let records: Vec<TitleRecord> = (0..30)
            .map(|i| {
                let name = if i % 3 == 0 { format!("Saga: Part {}", i) } else { format!("Title {}", i) };
                TitleRecord::new(name, "Action", Some("TV"), 5.0 + (i % 7) as f64 * 0.5, 5000)
            })
            .collect();
        let svc = service(records, 10);

        let recs = svc
            .recommend(&RecommendationCriteria::new("action", 0.0, "all"))
            .unwrap()
            .success()
            .unwrap();

        assert!(recs.len() <= 10);
        assert!(recs.windows(2).all(|w| w[0].rating >= w[1].rating));
        let bases: std::collections::HashSet<String> = recs.iter().map(|r| normalize_title(&r.name)).collect();
        assert_eq!(bases.len(), recs.len());
        assert_eq!(recs.iter().filter(|r| r.name.starts_with("Saga")).count(), 1);
    }

    #[test]
    fn test_rating_ties_keep_catalog_order() {
        let svc = service(
            vec![
                TitleRecord::new("First", "Comedy", Some("TV"), 8.0, 5000),
                TitleRecord::new("Second", "Comedy", Some("TV"), 8.0, 5000),
                TitleRecord::new("Third", "Comedy", Some("TV"), 8.0, 5000),
            ],
            10,
        );
        let outcome = svc.recommend(&RecommendationCriteria::new("Comedy", 0.0, "all")).unwrap();
        assert_eq!(names(outcome), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_unseen_primary_genre_is_zero_filled() {
        let training = vec![TitleRecord::new("Known", "Comedy", Some("TV"), 8.0, 5000)];
        let schema = FeatureSchema::from_frame(&OneHotFrame::encode(&training));
        let catalog = vec![TitleRecord::new("Novel", "Mecha, Comedy", Some("TV"), 8.0, 5000)];
        let svc = RecommendationService::with_model(
            Arc::new(AnimeCatalog::new(catalog)),
            Arc::new(MembersCutoff { width: schema.width(), cutoff: 1000.0 }),
            schema,
            10,
        );

        let outcome = svc.recommend(&RecommendationCriteria::new("comedy", 0.0, "all")).unwrap();
        assert_eq!(names(outcome), vec!["Novel"]);
    }
}

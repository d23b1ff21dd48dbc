use crate::algorithms::split::train_test_split;
use crate::algorithms::{
    Classifier, DecisionTreeModel, FeatureSchema, OneHotFrame, RandomForest, NOT_RECOMMENDABLE, RECOMMENDABLE,
};
use crate::config::{ModelConfig, ModelKind};
use crate::error::{RecError, RecResult};
use crate::services::dataset::AnimeCatalog;
use crate::utils::metrics::{ClassifierMetrics, MetricsCalculator};
use ndarray::{Array1, Axis};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct TrainedModels {
    models: HashMap<ModelKind, Arc<dyn Classifier>>,
    schema: FeatureSchema,
    evaluation: HashMap<ModelKind, ClassifierMetrics>,
    train_rows: usize,
    test_rows: usize,
}

impl TrainedModels {
    pub fn get(&self, kind: ModelKind) -> Option<Arc<dyn Classifier>> {
        self.models.get(&kind).cloned()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn evaluation(&self, kind: ModelKind) -> Option<&ClassifierMetrics> {
        self.evaluation.get(&kind)
    }

    pub fn train_rows(&self) -> usize {
        self.train_rows
    }

    pub fn test_rows(&self) -> usize {
        self.test_rows
    }
}

pub struct TrainingService {
    config: ModelConfig,
}

impl TrainingService {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn label(&self, rating: f64) -> usize {
        if rating >= self.config.recommendable_threshold {
            RECOMMENDABLE
        } else {
            NOT_RECOMMENDABLE
        }
    }

    pub fn train(&self, catalog: &AnimeCatalog) -> RecResult<TrainedModels> {
        if catalog.is_empty() {
            return Err(RecError::DataUnavailable("no titles to train on".to_string()));
        }
        let started = Instant::now();

        let frame = OneHotFrame::encode(catalog.records());
        let schema = FeatureSchema::from_frame(&frame);
        let labels: Array1<usize> = catalog.records().iter().map(|r| self.label(r.rating)).collect();

        let split = train_test_split(catalog.len(), self.config.test_ratio, self.config.seed);
        if split.train.is_empty() {
            return Err(RecError::Training("training split is empty".to_string()));
        }

        let x_train = frame.data.select(Axis(0), &split.train);
        let y_train = labels.select(Axis(0), &split.train);
        let x_test = frame.data.select(Axis(0), &split.test);
        let y_test: Vec<bool> = split.test.iter().map(|&i| labels[i] == RECOMMENDABLE).collect();

        info!(
            "Training on {} rows ({} held out), {} feature columns",
            split.train.len(),
            split.test.len(),
            schema.width()
        );

        let tree = DecisionTreeModel::fit(x_train.clone(), y_train.clone())?;
        let forest = RandomForest::fit(&x_train, &y_train, self.config.n_estimators, self.config.seed)?;

        let mut models: HashMap<ModelKind, Arc<dyn Classifier>> = HashMap::new();
        models.insert(ModelKind::DecisionTree, Arc::new(tree));
        models.insert(ModelKind::RandomForest, Arc::new(forest));

        let mut evaluation = HashMap::new();
        if !split.test.is_empty() {
            let calculator = MetricsCalculator::new();
            for kind in ModelKind::ALL {
                if let Some(model) = models.get(&kind) {
                    let predicted = model.predict(&x_test)?;
                    let metrics = calculator.evaluate(&predicted, &y_test);
                    info!(
                        "{} holdout: accuracy={:.3} precision={:.3} recall={:.3} f1={:.3}",
                        kind.display_name(),
                        metrics.accuracy,
                        metrics.precision,
                        metrics.recall,
                        metrics.f1_score
                    );
                    evaluation.insert(kind, metrics);
                }
            }
        }

        info!("Models trained in {:?}", started.elapsed());

        Ok(TrainedModels {
            models,
            schema,
            evaluation,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleRecord;

    fn catalog() -> AnimeCatalog {
        let mut records = Vec::new();
        for i in 0..30u64 {
            records.push(TitleRecord::new(format!("Hit {}", i), "Comedy, Drama", Some("TV"), 8.0, 200_000 + i));
            records.push(TitleRecord::new(format!("Miss {}", i), "Action", Some("OVA"), 6.0, 500 + i));
        }
        AnimeCatalog::new(records)
    }

    fn config() -> ModelConfig {
        ModelConfig {
            n_estimators: 11,
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_label_threshold_is_inclusive() {
        let service = TrainingService::new(ModelConfig::default());
        assert_eq!(service.label(7.5), RECOMMENDABLE);
        assert_eq!(service.label(7.49), NOT_RECOMMENDABLE);
    }

    #[test]
    fn test_train_produces_both_models_and_schema() {
        let trained = TrainingService::new(config()).train(&catalog()).unwrap();

        assert_eq!(trained.train_rows(), 48);
        assert_eq!(trained.test_rows(), 12);
        assert_eq!(
            trained.schema().columns(),
            &["members", "primary_genre_Action", "primary_genre_Comedy"]
        );
        for kind in ModelKind::ALL {
            let model = trained.get(kind).unwrap();
            assert_eq!(model.n_features(), 3);
            assert!(trained.evaluation(kind).unwrap().accuracy > 0.9);
        }
    }

    #[test]
    fn test_train_empty_catalog_is_unavailable() {
        let err = TrainingService::new(config()).train(&AnimeCatalog::default()).err().unwrap();
        assert!(matches!(err, RecError::DataUnavailable(_)));
    }
}

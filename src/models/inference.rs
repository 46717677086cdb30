//! Prediction service: scale, predict, round, convert

use crate::config::AppConfig;
use crate::error::{ArtifactError, PredictionError};
use crate::feature_extractor::FeatureExtractor;
use crate::models::loader::{ArtifactLoader, Artifacts};
use crate::types::{FeatureVector, PredictionResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Fuel-efficiency predictor owning the loaded artifacts
#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: Arc<Artifacts>,
    extractor: FeatureExtractor,
}

impl Predictor {
    /// Create a predictor over already-loaded artifacts
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self {
            artifacts,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Load the configured artifacts and build a predictor
    pub fn from_config(config: &AppConfig) -> Result<Self, ArtifactError> {
        let artifacts = ArtifactLoader::from_config(&config.artifacts).load()?;
        info!(format = ?config.artifacts.format, "Predictor initialized");
        Ok(Self::new(Arc::new(artifacts)))
    }

    /// The artifacts this predictor runs on
    pub fn artifacts(&self) -> &Arc<Artifacts> {
        &self.artifacts
    }

    /// Predict the fuel efficiency of one vehicle
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictionError> {
        let raw = self.extractor.extract(features);
        let scaled = self.artifacts.scaler().transform(&raw)?;
        let prediction = self.artifacts.model().predict(&scaled)?;

        if !prediction.is_finite() {
            return Err(PredictionError::NonFinite(prediction));
        }

        let result = PredictionResult::from_raw(prediction);
        debug!(
            raw_mpg = prediction,
            mpg = result.mpg,
            km_per_liter = result.km_per_liter,
            band = %result.band(),
            "Prediction complete"
        );
        Ok(result)
    }

    /// Predict a batch of vehicles, one result per input
    pub fn predict_batch(
        &self,
        batch: &[FeatureVector],
    ) -> Vec<Result<PredictionResult, PredictionError>> {
        batch.iter().map(|f| self.predict(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArtifactFormat;
    use crate::feature_extractor::FEATURE_COUNT;
    use crate::models::artifact::{FeatureScaler, LinearRegressor, Regressor, StandardScaler};
    use crate::models::loader::tests::write_artifacts;
    use crate::types::prediction::round_one_decimal;
    use crate::types::{reference_vehicles, EfficiencyBand, Origin, MPG_TO_KM_PER_LITER};

    fn demo_predictor() -> Predictor {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = write_artifacts(dir.path()).load().unwrap();
        Predictor::new(Arc::new(artifacts))
    }

    struct ConstantModel(f64);

    impl Regressor for ConstantModel {
        fn predict(&self, _: &[f32; FEATURE_COUNT]) -> Result<f64, PredictionError> {
            Ok(self.0)
        }
    }

    struct FailingScaler;

    impl FeatureScaler for FailingScaler {
        fn transform(&self, _: &[f32; FEATURE_COUNT]) -> Result<[f32; FEATURE_COUNT], PredictionError> {
            Err(PredictionError::Scaler("boom".to_string()))
        }
    }

    fn identity_scaler() -> Box<StandardScaler> {
        Box::new(StandardScaler::new(vec![0.0; 7], vec![1.0; 7]).unwrap())
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let predictor = demo_predictor();
        let fv = FeatureVector::default();

        let first = predictor.predict(&fv).unwrap();
        for _ in 0..10 {
            assert_eq!(predictor.predict(&fv).unwrap(), first);
        }
    }

    #[test]
    fn test_unit_law_for_predictions() {
        let predictor = demo_predictor();
        for origin in Origin::ALL {
            for model_year in 70..=82 {
                let fv = FeatureVector {
                    model_year,
                    origin,
                    ..FeatureVector::default()
                };
                let result = predictor.predict(&fv).unwrap();
                assert_eq!(
                    result.km_per_liter,
                    round_one_decimal(result.mpg * MPG_TO_KM_PER_LITER)
                );
                assert_eq!(result.mpg, round_one_decimal(result.mpg));
            }
        }
    }

    #[test]
    fn test_reference_vehicles_land_in_expected_bands() {
        let predictor = demo_predictor();
        let refs = reference_vehicles();

        let mustang = predictor.predict(&refs[0].features).unwrap();
        let civic = predictor.predict(&refs[1].features).unwrap();
        let golf = predictor.predict(&refs[2].features).unwrap();

        assert_eq!(mustang.band(), EfficiencyBand::Low);
        assert_eq!(civic.band(), EfficiencyBand::Outstanding);
        assert_eq!(golf.band(), EfficiencyBand::Excellent);
        assert!(civic.mpg > golf.mpg);
        assert!(golf.mpg > mustang.mpg);
    }

    #[test]
    fn test_permuted_features_change_output() {
        let predictor = demo_predictor();
        let fv = reference_vehicles()[1].features;
        let expected = predictor.predict(&fv).unwrap();

        let mut permuted = FeatureExtractor::new().extract(&fv);
        permuted.swap(2, 3);
        let artifacts = predictor.artifacts();
        let scaled = artifacts.scaler().transform(&permuted).unwrap();
        let raw = artifacts.model().predict(&scaled).unwrap();

        assert_ne!(PredictionResult::from_raw(raw), expected);
    }

    #[test]
    fn test_uses_explicit_artifacts() {
        let artifacts = Artifacts::new(identity_scaler(), Box::new(ConstantModel(27.96)));
        let predictor = Predictor::new(Arc::new(artifacts));

        let result = predictor.predict(&FeatureVector::default()).unwrap();
        assert_eq!(result.mpg, 28.0);
        assert_eq!(result.km_per_liter, 11.9);
        assert_eq!(result.band(), EfficiencyBand::Excellent);
    }

    #[test]
    fn test_non_finite_prediction_is_an_error() {
        let artifacts = Artifacts::new(identity_scaler(), Box::new(ConstantModel(f64::INFINITY)));
        let predictor = Predictor::new(Arc::new(artifacts));

        assert!(matches!(
            predictor.predict(&FeatureVector::default()),
            Err(PredictionError::NonFinite(_))
        ));
    }

    #[test]
    fn test_scaler_failure_propagates() {
        let model = LinearRegressor::new(vec![0.0; 7], 20.0).unwrap();
        let artifacts = Artifacts::new(Box::new(FailingScaler), Box::new(model));
        let predictor = Predictor::new(Arc::new(artifacts));

        assert!(matches!(
            predictor.predict(&FeatureVector::default()),
            Err(PredictionError::Scaler(_))
        ));
    }

    #[test]
    fn test_predict_batch() {
        let predictor = demo_predictor();
        let batch: Vec<FeatureVector> = reference_vehicles().iter().map(|r| r.features).collect();

        let results = predictor.predict_batch(&batch);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_from_config_reports_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.artifacts.base_dir = dir.path().to_path_buf();
        config.artifacts.format = ArtifactFormat::Json;

        let err = Predictor::from_config(&config).unwrap_err();
        assert_eq!(err.path(), &dir.path().join("scaler.json"));
    }
}

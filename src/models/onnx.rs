//! ONNX-exported scaler and regressor, run through ONNX Runtime

use crate::error::{ArtifactKind, PredictionError};
use crate::feature_extractor::FEATURE_COUNT;
use crate::models::artifact::{to_row, FeatureScaler, Regressor};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Loaded ONNX artifact with its input/output names
pub struct OnnxArtifact {
    /// Which artifact this session implements
    kind: ArtifactKind,
    /// ONNX Runtime session (running needs exclusive access)
    session: Mutex<Session>,
    /// Input name for the model
    input_name: String,
    /// Output name to read
    output_name: String,
}

impl OnnxArtifact {
    /// Load a single ONNX artifact from file
    pub fn load(path: &Path, kind: ArtifactKind, threads: usize) -> Result<Self, String> {
        info!(artifact = %kind, path = %path.display(), threads, "Loading ONNX artifact");

        let session = Session::builder()
            .map_err(|e| e.to_string())?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| e.to_string())?
            .with_intra_threads(threads)
            .map_err(|e| e.to_string())?
            .commit_from_file(path)
            .map_err(|e| e.to_string())?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| "session declares no inputs".to_string())?;

        // skl2onnx names the scaler/regressor output "variable"
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == "variable")
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| "session declares no outputs".to_string())?;

        info!(
            artifact = %kind,
            input = %input_name,
            output = %output_name,
            "ONNX artifact loaded successfully"
        );

        Ok(Self {
            kind,
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    /// Run the session on one row and return its flat f32 output
    fn run(&self, row: &[f32; FEATURE_COUNT]) -> Result<Vec<f32>, String> {
        // Input tensor shape [1, num_features]
        let shape = vec![1_i64, FEATURE_COUNT as i64];
        let input_tensor =
            Tensor::from_array((shape, row.to_vec())).map_err(|e| e.to_string())?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock error: {}", e))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| e.to_string())?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| format!("missing output '{}'", self.output_name))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| e.to_string())?;

        debug!(artifact = %self.kind, values = data.len(), "ONNX artifact evaluated");
        Ok(data.to_vec())
    }
}

impl FeatureScaler for OnnxArtifact {
    fn transform(&self, raw: &[f32; FEATURE_COUNT]) -> Result<[f32; FEATURE_COUNT], PredictionError> {
        let data = self.run(raw).map_err(PredictionError::Scaler)?;
        to_row(self.kind, &data)
    }
}

impl Regressor for OnnxArtifact {
    fn predict(&self, scaled: &[f32; FEATURE_COUNT]) -> Result<f64, PredictionError> {
        let data = self.run(scaled).map_err(PredictionError::Model)?;
        data.first()
            .map(|&v| v as f64)
            .ok_or(PredictionError::OutputShape {
                kind: self.kind,
                expected: 1,
                actual: 0,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArtifactFormat;
    use crate::models::loader::{ArtifactLoader, Artifacts};
    use crate::models::Predictor;
    use crate::types::{reference_vehicles, FeatureVector};
    use crate::FeatureExtractor;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn artifacts_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts")
    }

    fn load(format: ArtifactFormat) -> Artifacts {
        let ext = format.extension();
        let dir = match format {
            ArtifactFormat::Onnx => artifacts_dir().join("onnx"),
            ArtifactFormat::Json => artifacts_dir(),
        };
        ArtifactLoader::new(
            dir.join(format!("scaler.{ext}")),
            dir.join(format!("car_mileage_model.{ext}")),
            format,
        )
        .with_threads(1)
        .load()
        .unwrap()
    }

    #[test]
    fn test_onnx_artifacts_match_json_parameters() {
        let onnx = load(ArtifactFormat::Onnx);
        let json = load(ArtifactFormat::Json);
        let extractor = FeatureExtractor::new();

        let mut vehicles: Vec<FeatureVector> =
            reference_vehicles().iter().map(|r| r.features).collect();
        vehicles.push(FeatureVector::default());

        for fv in &vehicles {
            let raw = extractor.extract(fv);

            let onnx_scaled = onnx.scaler().transform(&raw).unwrap();
            let json_scaled = json.scaler().transform(&raw).unwrap();
            for (a, b) in onnx_scaled.iter().zip(json_scaled.iter()) {
                assert!((a - b).abs() < 1e-3, "scaled {a} vs {b} for {fv:?}");
            }

            let onnx_mpg = onnx.model().predict(&json_scaled).unwrap();
            let json_mpg = json.model().predict(&json_scaled).unwrap();
            assert!((onnx_mpg - json_mpg).abs() < 1e-2, "mpg {onnx_mpg} vs {json_mpg} for {fv:?}");
        }
    }

    #[test]
    fn test_onnx_predictor_end_to_end() {
        let onnx = Predictor::new(Arc::new(load(ArtifactFormat::Onnx)));
        let json = Predictor::new(Arc::new(load(ArtifactFormat::Json)));

        for reference in reference_vehicles() {
            let from_onnx = onnx.predict(&reference.features).unwrap();
            let from_json = json.predict(&reference.features).unwrap();
            assert!(
                (from_onnx.mpg - from_json.mpg).abs() <= 0.1 + 1e-9,
                "{}: {} vs {}",
                reference.name,
                from_onnx.mpg,
                from_json.mpg
            );
            assert_eq!(from_onnx.band(), from_json.band(), "{}", reference.name);
        }
    }

    #[test]
    fn test_regressor_graph_is_not_a_scaler() {
        let artifact =
            OnnxArtifact::load(
                &artifacts_dir().join("onnx").join("car_mileage_model.onnx"),
                ArtifactKind::Scaler,
                1,
            )
                .unwrap();

        let err = artifact.transform(&[0.0; FEATURE_COUNT]).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::OutputShape {
                kind: ArtifactKind::Scaler,
                expected: FEATURE_COUNT,
                actual: 1,
            }
        ));
    }

    #[test]
    fn test_corrupt_onnx_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.onnx");
        std::fs::write(&path, b"definitely not a protobuf graph").unwrap();

        assert!(OnnxArtifact::load(&path, ArtifactKind::Scaler, 1).is_err());
    }
}

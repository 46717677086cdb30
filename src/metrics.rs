//! Session statistics for the predictor.

use crate::types::{EfficiencyBand, PredictionResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tracing::info;

/// Latency samples kept before the oldest half is dropped
pub const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Metrics collector for one predictor session
pub struct SessionMetrics {
    /// Successful predictions
    pub predictions: AtomicU64,
    /// Failed predictions
    pub failures: AtomicU64,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Results per efficiency band
    bands: RwLock<BTreeMap<EfficiencyBand, u64>>,
    /// Sum of predicted MPG, for the session average
    mpg_total: RwLock<f64>,
}

impl SessionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            latencies: RwLock::new(Vec::new()),
            bands: RwLock::new(BTreeMap::new()),
            mpg_total: RwLock::new(0.0),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, latency: Duration, result: &PredictionResult) {
        self.predictions.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.latencies.write() {
            times.push(latency.as_micros() as u64);
            // Keep only the most recent samples for memory efficiency
            if times.len() > MAX_LATENCY_SAMPLES {
                times.drain(0..MAX_LATENCY_SAMPLES / 2);
            }
        }
        if let Ok(mut bands) = self.bands.write() {
            *bands.entry(result.band()).or_insert(0) += 1;
        }
        if let Ok(mut total) = self.mpg_total.write() {
            *total += result.mpg;
        }
    }

    /// Record a failed prediction
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get latency statistics
    pub fn latency_stats(&self) -> LatencyStats {
        let mut sorted = match self.latencies.read() {
            Ok(times) if !times.is_empty() => times.clone(),
            _ => return LatencyStats::default(),
        };
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            max_us: sorted[count - 1],
        }
    }

    /// Get result counts per band
    pub fn band_counts(&self) -> BTreeMap<EfficiencyBand, u64> {
        self.bands.read().map(|b| b.clone()).unwrap_or_default()
    }

    /// Average predicted MPG over the session
    pub fn average_mpg(&self) -> Option<f64> {
        let count = self.predictions.load(Ordering::Relaxed);
        if count == 0 {
            return None;
        }
        self.mpg_total.read().ok().map(|total| *total / count as f64)
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let predictions = self.predictions.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let latency = self.latency_stats();

        info!(
            predictions,
            failures,
            mean_us = latency.mean_us,
            p50_us = latency.p50_us,
            max_us = latency.max_us,
            average_mpg = self.average_mpg().unwrap_or(0.0),
            "Session summary"
        );
        for (band, count) in self.band_counts() {
            info!(band = %band, count, "Predictions by band");
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prediction latency statistics
#[derive(Debug, Default, PartialEq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = SessionMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), &PredictionResult::from_raw(36.2));
        metrics.record_prediction(Duration::from_micros(300), &PredictionResult::from_raw(14.0));
        metrics.record_prediction(Duration::from_micros(200), &PredictionResult::from_raw(35.0));
        metrics.record_failure();

        assert_eq!(metrics.predictions.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.failures.load(Ordering::Relaxed), 1);

        let bands = metrics.band_counts();
        assert_eq!(bands.get(&EfficiencyBand::Outstanding), Some(&2));
        assert_eq!(bands.get(&EfficiencyBand::Low), Some(&1));
        assert_eq!(bands.get(&EfficiencyBand::Good), None);

        let stats = metrics.latency_stats();
        assert_eq!(
            stats,
            LatencyStats {
                count: 3,
                mean_us: 200,
                p50_us: 200,
                max_us: 300,
            }
        );
    }

    #[test]
    fn test_empty_session() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.latency_stats(), LatencyStats::default());
        assert_eq!(metrics.average_mpg(), None);
        assert!(metrics.band_counts().is_empty());
    }

    #[test]
    fn test_latency_buffer_is_capped() {
        let metrics = SessionMetrics::new();
        let result = PredictionResult::from_raw(25.0);
        for i in 0..=MAX_LATENCY_SAMPLES as u64 {
            metrics.record_prediction(Duration::from_micros(i), &result);
        }

        let stats = metrics.latency_stats();
        assert_eq!(stats.count, (MAX_LATENCY_SAMPLES / 2 + 1) as u64);
        assert_eq!(stats.max_us, MAX_LATENCY_SAMPLES as u64);
        assert_eq!(
            metrics.predictions.load(Ordering::Relaxed),
            MAX_LATENCY_SAMPLES as u64 + 1
        );
    }

    #[test]
    fn test_average_mpg() {
        let metrics = SessionMetrics::new();
        metrics.record_prediction(Duration::from_micros(1), &PredictionResult::from_raw(20.0));
        metrics.record_prediction(Duration::from_micros(1), &PredictionResult::from_raw(30.0));
        assert_eq!(metrics.average_mpg(), Some(25.0));
    }
}

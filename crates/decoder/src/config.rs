use anyhow::Context;
use std::env;

pub use common::Environment;

use crate::decode::Decoder;
use crate::errors::DecodeError;
use crate::types::{DetectionParams, NetworkInfo, ThresholdPolicy};

#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    pub environment: Environment,
    pub network_size: (u32, u32),
    pub num_classes: usize,
    pub confidence_threshold: f32,
    pub per_class_thresholds: Option<Vec<f32>>,
}

impl DecoderConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = Environment::from_env();

        let network_width = env::var("NETWORK_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(640);

        let network_height = env::var("NETWORK_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(640);

        let num_classes = env::var("NUM_CLASSES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(80);

        let confidence_threshold = env::var("CONFIDENCE_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.5);

        let per_class_thresholds = match env::var("PER_CLASS_THRESHOLDS") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                parse_threshold_list(&raw).context("Failed to parse PER_CLASS_THRESHOLDS")?,
            ),
            _ => None,
        };

        Ok(Self {
            environment,
            network_size: (network_width, network_height),
            num_classes,
            confidence_threshold,
            per_class_thresholds,
        })
    }

    pub fn network(&self) -> Result<NetworkInfo, DecodeError> {
        NetworkInfo::new(self.network_size.0, self.network_size.1)
    }

    /// Per-class table when one is configured, the global threshold otherwise.
    pub fn params(&self) -> Result<DetectionParams, DecodeError> {
        match &self.per_class_thresholds {
            Some(table) => DetectionParams::new(self.num_classes, table.clone())?
                .with_policy(ThresholdPolicy::PerClass),
            None => DetectionParams::global(self.num_classes, self.confidence_threshold),
        }
    }

    pub fn decoder(&self) -> anyhow::Result<Decoder> {
        let network = self.network().context("Invalid network geometry")?;
        let params = self.params().context("Invalid detection parameters")?;
        Ok(Decoder::new(network, params))
    }

    /// Create default configuration for testing
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            network_size: (640, 640),
            num_classes: 80,
            confidence_threshold: 0.5,
            per_class_thresholds: None,
        }
    }
}

fn parse_threshold_list(raw: &str) -> anyhow::Result<Vec<f32>> {
    raw.split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<f32>()
                .with_context(|| format!("Invalid threshold '{}'", item))
        })
        .collect()
}

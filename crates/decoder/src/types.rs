use serde::{Deserialize, Serialize};

use crate::errors::DecodeError;

/// Number of `f32` columns per detection row.
pub const ROW_WIDTH: usize = 7;

/// Largest class count whose ids all fit in a `u32`.
pub const MAX_CLASSES: u64 = u32::MAX as u64 + 1;

/// One candidate emitted by the detector, columns in tensor order
/// `[x, y, w, h, box_confidence, class_id, class_confidence]`.
///
/// Coordinates are normalized to the network input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRow {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub box_confidence: f32,
    pub class_id: f32,
    pub class_confidence: f32,
}

impl RawRow {
    pub fn from_columns(columns: &[f32; ROW_WIDTH]) -> Self {
        let [x, y, w, h, box_confidence, class_id, class_confidence] = *columns;
        Self {
            x,
            y,
            w,
            h,
            box_confidence,
            class_id,
            class_confidence,
        }
    }

    /// Final detection score, box confidence times class confidence.
    #[inline]
    pub fn confidence(&self) -> f32 {
        self.box_confidence * self.class_confidence
    }

    /// Class index after truncation toward zero, or `None` when the truncated
    /// value is negative, not finite, not below `num_classes`, or beyond `u32`.
    #[inline]
    pub fn class_index(&self, num_classes: usize) -> Option<u32> {
        let limit = (num_classes as f64).min(MAX_CLASSES as f64);
        let truncated = self.class_id.trunc() as f64;
        // NaN fails both comparisons
        if truncated >= 0.0 && truncated < limit {
            u32::try_from(truncated as u64).ok()
        } else {
            None
        }
    }
}

/// Input resolution of the network, used to denormalize coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    width: u32,
    height: u32,
}

impl NetworkInfo {
    pub fn new(width: u32, height: u32) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Scale a normalized horizontal value to pixels and clip to `[0, width - 1]`.
    #[inline]
    pub fn clip_x(&self, normalized: f32) -> f32 {
        clip(normalized * self.width as f32, (self.width - 1) as f32)
    }

    /// Scale a normalized vertical value to pixels and clip to `[0, height - 1]`.
    #[inline]
    pub fn clip_y(&self, normalized: f32) -> f32 {
        clip(normalized * self.height as f32, (self.height - 1) as f32)
    }
}

/// Upper bound first, then lower bound. `f32::min` drops NaN, so a NaN
/// coordinate lands on `max` and the result always stays in range.
#[inline]
fn clip(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}

/// How the threshold table is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThresholdPolicy {
    /// Every row is compared against entry 0 of the table.
    #[default]
    Global,
    /// Every row is compared against the entry for its own class.
    PerClass,
}

/// Read-only decode parameters supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    num_classes: usize,
    thresholds: Vec<f32>,
    policy: ThresholdPolicy,
}

impl DetectionParams {
    /// Parameters using the [`ThresholdPolicy::Global`] policy.
    pub fn new(num_classes: usize, thresholds: Vec<f32>) -> Result<Self, DecodeError> {
        if num_classes == 0 {
            return Err(DecodeError::NoClasses);
        }
        if num_classes as u64 > MAX_CLASSES {
            return Err(DecodeError::TooManyClasses { num_classes });
        }
        if thresholds.is_empty() {
            return Err(DecodeError::EmptyThresholds);
        }
        if let Some((class_id, &value)) = thresholds
            .iter()
            .enumerate()
            .find(|(_, t)| !(0.0..=1.0).contains(*t))
        {
            return Err(DecodeError::InvalidThreshold { class_id, value });
        }

        Ok(Self {
            num_classes,
            thresholds,
            policy: ThresholdPolicy::Global,
        })
    }

    /// Shorthand for a single global threshold.
    pub fn global(num_classes: usize, threshold: f32) -> Result<Self, DecodeError> {
        Self::new(num_classes, vec![threshold])
    }

    pub fn with_policy(mut self, policy: ThresholdPolicy) -> Result<Self, DecodeError> {
        if policy == ThresholdPolicy::PerClass && self.thresholds.len() < self.num_classes {
            return Err(DecodeError::ThresholdTableTooShort {
                len: self.thresholds.len(),
                num_classes: self.num_classes,
            });
        }
        self.policy = policy;
        Ok(self)
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }

    /// Threshold applied to a row of class `class_id`.
    ///
    /// Under the per-class policy `class_id` must already be in range.
    #[inline]
    pub fn threshold_for(&self, class_id: u32) -> f32 {
        match self.policy {
            ThresholdPolicy::Global => self.thresholds[0],
            ThresholdPolicy::PerClass => self.thresholds[class_id as usize],
        }
    }
}

/// Accepted detection in absolute network-input pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: u32,
    pub confidence: f32,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(class_id: f32) -> RawRow {
        RawRow::from_columns(&[0.5, 0.5, 0.2, 0.2, 0.9, class_id, 0.5])
    }

    #[test]
    fn test_from_columns_keeps_tensor_order() {
        let raw = RawRow::from_columns(&[0.1, 0.2, 0.3, 0.4, 0.5, 6.0, 0.7]);
        assert_eq!(raw.x, 0.1);
        assert_eq!(raw.y, 0.2);
        assert_eq!(raw.w, 0.3);
        assert_eq!(raw.h, 0.4);
        assert_eq!(raw.box_confidence, 0.5);
        assert_eq!(raw.class_id, 6.0);
        assert_eq!(raw.class_confidence, 0.7);
    }

    #[test]
    fn test_confidence_is_product_of_scores() {
        assert!((row(2.0).confidence() - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_class_index_truncates_instead_of_rounding() {
        assert_eq!(row(2.9).class_index(80), Some(2));
        assert_eq!(row(0.99).class_index(80), Some(0));
        // Truncation toward zero maps small negatives onto class 0
        assert_eq!(row(-0.5).class_index(80), Some(0));
    }

    #[test]
    fn test_class_index_rejects_out_of_range_values() {
        assert_eq!(row(3.0).class_index(3), None);
        assert_eq!(row(-1.0).class_index(3), None);
        assert_eq!(row(f32::NAN).class_index(3), None);
        assert_eq!(row(f32::INFINITY).class_index(3), None);
        assert_eq!(row(2.0).class_index(3), Some(2));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_class_index_never_saturates_past_u32() {
        // 5e9 is exact in f32 and above u32::MAX
        assert_eq!(row(5.0e9).class_index(10_000_000_000), None);
        assert_eq!(row(4_294_967_040.0).class_index(10_000_000_000), Some(4_294_967_040));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_params_reject_class_count_beyond_u32() {
        assert_eq!(
            DetectionParams::global(10_000_000_000, 0.1),
            Err(DecodeError::TooManyClasses {
                num_classes: 10_000_000_000
            })
        );
        assert!(DetectionParams::global(MAX_CLASSES as usize, 0.1).is_ok());
    }

    #[test]
    fn test_network_info_rejects_zero_dimensions() {
        assert_eq!(
            NetworkInfo::new(0, 512),
            Err(DecodeError::InvalidGeometry {
                width: 0,
                height: 512
            })
        );
        assert!(NetworkInfo::new(512, 0).is_err());
        assert!(NetworkInfo::new(1, 1).is_ok());
    }

    #[test]
    fn test_clip_bounds() {
        let network = NetworkInfo::new(640, 480).unwrap();
        assert_eq!(network.clip_x(-0.1), 0.0);
        assert_eq!(network.clip_x(1.5), 639.0);
        assert_eq!(network.clip_y(1.0), 479.0);
        assert_eq!(network.clip_y(0.5), 240.0);
        assert_eq!(network.clip_x(f32::NAN), 639.0);
        assert_eq!(network.clip_y(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_single_pixel_network_clips_everything_to_zero() {
        let network = NetworkInfo::new(1, 1).unwrap();
        assert_eq!(network.clip_x(0.7), 0.0);
        assert_eq!(network.clip_y(0.7), 0.0);
    }

    #[test]
    fn test_params_validation() {
        assert_eq!(DetectionParams::global(0, 0.5), Err(DecodeError::NoClasses));
        assert_eq!(
            DetectionParams::new(3, vec![]),
            Err(DecodeError::EmptyThresholds)
        );
        assert_eq!(
            DetectionParams::new(3, vec![0.5, 1.2]),
            Err(DecodeError::InvalidThreshold {
                class_id: 1,
                value: 1.2
            })
        );
        assert!(DetectionParams::global(3, f32::NAN).is_err());
        assert!(DetectionParams::global(3, 0.0).is_ok());
        assert!(DetectionParams::global(3, 1.0).is_ok());
    }

    #[test]
    fn test_global_policy_reads_first_entry_only() {
        let params = DetectionParams::new(3, vec![0.3, 0.9, 0.9]).unwrap();
        assert_eq!(params.policy(), ThresholdPolicy::Global);
        assert_eq!(params.threshold_for(0), 0.3);
        assert_eq!(params.threshold_for(2), 0.3);
    }

    #[test]
    fn test_per_class_policy_reads_class_entry() {
        let params = DetectionParams::new(3, vec![0.3, 0.6, 0.9])
            .unwrap()
            .with_policy(ThresholdPolicy::PerClass)
            .unwrap();
        assert_eq!(params.threshold_for(1), 0.6);
        assert_eq!(params.threshold_for(2), 0.9);
    }

    #[test]
    fn test_per_class_policy_requires_full_table() {
        let err = DetectionParams::global(80, 0.5)
            .unwrap()
            .with_policy(ThresholdPolicy::PerClass)
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::ThresholdTableTooShort {
                len: 1,
                num_classes: 80
            }
        );
    }
}

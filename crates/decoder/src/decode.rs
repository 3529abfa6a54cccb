use serde::Serialize;

use crate::observer::{DecodeObserver, NoopObserver};
use crate::rows::DetectionRows;
use crate::types::{Detection, DetectionParams, NetworkInfo, RawRow, ThresholdPolicy};

/// What happened to a single row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowOutcome {
    Accepted(Detection),
    BelowThreshold { confidence: f32, threshold: f32 },
    ClassOutOfRange { class_id: f32, num_classes: usize },
}

/// Row counts for one decode pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeSummary {
    pub rows: usize,
    pub accepted: usize,
    pub below_threshold: usize,
    pub rejected: usize,
    pub trailing_elements: usize,
}

/// Classify one row against the network geometry and thresholds.
///
/// Under the global policy the threshold is checked before the class id,
/// so a low-confidence row with a bogus class is simply below threshold.
/// The per-class policy needs a valid class to find its threshold.
pub fn classify_row(row: &RawRow, network: &NetworkInfo, params: &DetectionParams) -> RowOutcome {
    let num_classes = params.num_classes();
    let class_id = row.class_index(num_classes);

    let threshold = match (params.policy(), class_id) {
        (ThresholdPolicy::Global, _) => params.threshold_for(0),
        (ThresholdPolicy::PerClass, Some(id)) => params.threshold_for(id),
        (ThresholdPolicy::PerClass, None) => {
            return RowOutcome::ClassOutOfRange {
                class_id: row.class_id,
                num_classes,
            };
        }
    };

    let confidence = row.confidence();
    // Equal to threshold passes; NaN never does
    if confidence.is_nan() || confidence < threshold {
        return RowOutcome::BelowThreshold {
            confidence,
            threshold,
        };
    }

    let Some(class_id) = class_id else {
        return RowOutcome::ClassOutOfRange {
            class_id: row.class_id,
            num_classes,
        };
    };

    RowOutcome::Accepted(Detection {
        class_id,
        confidence,
        left: network.clip_x(row.x),
        top: network.clip_y(row.y),
        width: network.clip_x(row.w),
        height: network.clip_y(row.h),
    })
}

/// Stateless decoder for NMS-style detection tensors (7 floats per row).
///
/// Holds only the read-only geometry and parameters; every call works on
/// its own buffer, so one decoder can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoder {
    network: NetworkInfo,
    params: DetectionParams,
}

impl Decoder {
    pub fn new(network: NetworkInfo, params: DetectionParams) -> Self {
        Self { network, params }
    }

    pub fn network(&self) -> &NetworkInfo {
        &self.network
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Decode `data` into a fresh vector without any observer.
    pub fn decode(&self, data: &[f32]) -> Vec<Detection> {
        let mut detections = Vec::new();
        self.decode_into(data, &mut detections, NoopObserver);
        detections
    }

    /// Append accepted detections to `out` in row order.
    pub fn decode_into<O: DecodeObserver>(
        &self,
        data: &[f32],
        out: &mut Vec<Detection>,
        observer: O,
    ) -> DecodeSummary {
        decode_into(data, &self.network, &self.params, out, observer)
    }

    /// Lazily classify every complete row, keeping the per-row tag.
    pub fn outcomes<'a>(
        &'a self,
        data: &'a [f32],
    ) -> impl Iterator<Item = (usize, RowOutcome)> + 'a {
        decode_rows(data, &self.network, &self.params)
    }
}

/// Lazily classify every complete row of `data`, paired with its row index.
///
/// Nothing is filtered: below-threshold and out-of-range rows are yielded
/// with their tag, in row order.
pub fn decode_rows<'a>(
    data: &'a [f32],
    network: &'a NetworkInfo,
    params: &'a DetectionParams,
) -> impl Iterator<Item = (usize, RowOutcome)> + 'a {
    DetectionRows::new(data)
        .iter()
        .map(move |(index, row)| (index, classify_row(&row, network, params)))
}

/// One-shot decode of a flat detection buffer.
pub fn decode(data: &[f32], network: &NetworkInfo, params: &DetectionParams) -> Vec<Detection> {
    let mut detections = Vec::new();
    decode_into(data, network, params, &mut detections, NoopObserver);
    detections
}

/// Append accepted detections to `out` in row order.
///
/// Rows with an out-of-range class id are skipped and reported to the
/// observer; they never abort the pass.
#[tracing::instrument(level = "debug", skip_all, fields(elements = data.len()))]
pub fn decode_into<O: DecodeObserver>(
    data: &[f32],
    network: &NetworkInfo,
    params: &DetectionParams,
    out: &mut Vec<Detection>,
    mut observer: O,
) -> DecodeSummary {
    let rows = DetectionRows::new(data);
    let mut summary = DecodeSummary {
        rows: rows.len(),
        trailing_elements: rows.trailing_elements(),
        ..Default::default()
    };

    if summary.trailing_elements > 0 {
        observer.on_truncated(summary.trailing_elements);
    }

    out.reserve(summary.rows);
    for (index, row) in rows.iter() {
        match classify_row(&row, network, params) {
            RowOutcome::Accepted(detection) => {
                observer.on_accepted(index, &row, &detection);
                out.push(detection);
                summary.accepted += 1;
            }
            RowOutcome::BelowThreshold {
                confidence,
                threshold,
            } => {
                observer.on_below_threshold(index, confidence, threshold);
                summary.below_threshold += 1;
            }
            RowOutcome::ClassOutOfRange { num_classes, .. } => {
                observer.on_rejected(index, &row, num_classes);
                summary.rejected += 1;
            }
        }
    }

    summary
}

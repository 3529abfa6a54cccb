use crate::types::{Detection, RawRow};

/// Hooks called while decoding. All methods default to no-ops, so an
/// implementation only overrides what it cares about.
///
/// Observers are passed per call, the decoder itself keeps no state.
pub trait DecodeObserver {
    fn on_accepted(&mut self, _index: usize, _row: &RawRow, _detection: &Detection) {}

    fn on_below_threshold(&mut self, _index: usize, _confidence: f32, _threshold: f32) {}

    /// Row whose class id is outside `[0, num_classes)`.
    fn on_rejected(&mut self, _index: usize, _row: &RawRow, _num_classes: usize) {}

    /// Buffer length was not a multiple of the row width.
    fn on_truncated(&mut self, _trailing_elements: usize) {}
}

impl<O: DecodeObserver + ?Sized> DecodeObserver for &mut O {
    fn on_accepted(&mut self, index: usize, row: &RawRow, detection: &Detection) {
        (**self).on_accepted(index, row, detection);
    }

    fn on_below_threshold(&mut self, index: usize, confidence: f32, threshold: f32) {
        (**self).on_below_threshold(index, confidence, threshold);
    }

    fn on_rejected(&mut self, index: usize, row: &RawRow, num_classes: usize) {
        (**self).on_rejected(index, row, num_classes);
    }

    fn on_truncated(&mut self, trailing_elements: usize) {
        (**self).on_truncated(trailing_elements);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DecodeObserver for NoopObserver {}

/// Emits a `tracing` event per accepted or rejected row.
///
/// Accepted rows log at debug, below-threshold rows at trace and
/// out-of-range class ids at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DecodeObserver for TracingObserver {
    fn on_accepted(&mut self, index: usize, row: &RawRow, detection: &Detection) {
        tracing::debug!(
            row = index,
            class_id = detection.class_id,
            confidence = detection.confidence,
            box_confidence = row.box_confidence,
            class_confidence = row.class_confidence,
            x = row.x,
            y = row.y,
            w = row.w,
            h = row.h,
            "Accepted detection"
        );
    }

    fn on_below_threshold(&mut self, index: usize, confidence: f32, threshold: f32) {
        tracing::trace!(row = index, confidence, threshold, "Below threshold");
    }

    fn on_rejected(&mut self, index: usize, row: &RawRow, num_classes: usize) {
        tracing::warn!(
            row = index,
            class_id = row.class_id,
            num_classes,
            "Class id out of range, skipping row"
        );
    }

    fn on_truncated(&mut self, trailing_elements: usize) {
        tracing::debug!(trailing_elements, "Ignoring partial trailing row");
    }
}

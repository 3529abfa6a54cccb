use thiserror::Error;

/// Configuration and shape errors. Per-row problems never surface here;
/// they are reported through [`crate::RowOutcome`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Invalid network geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("Number of classes must be positive")]
    NoClasses,

    #[error("{num_classes} classes configured, class ids are limited to u32")]
    TooManyClasses { num_classes: usize },

    #[error("Threshold table is empty")]
    EmptyThresholds,

    #[error("Invalid threshold {value} for class {class_id}")]
    InvalidThreshold { class_id: usize, value: f32 },

    #[error("Per-class threshold table has {len} entries, {num_classes} classes configured")]
    ThresholdTableTooShort { len: usize, num_classes: usize },

    #[error("No output layers")]
    NoOutputLayers,

    #[error("Layer '{name}' declares {expected} elements but holds {actual}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

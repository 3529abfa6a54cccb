//! Decoder for detector outputs that already went through NMS in-graph.
//!
//! The output tensor holds 7 floats per candidate,
//! `[x, y, w, h, box_confidence, class_id, class_confidence]`, with
//! coordinates normalized to the network input. Decoding keeps the rows whose
//! `box_confidence * class_confidence` reaches the threshold and maps their
//! boxes to clipped network-input pixels, in row order.
//!
//! # Example
//!
//! ```
//! use decoder::{DetectionParams, NetworkInfo, decode};
//!
//! let network = NetworkInfo::new(512, 512)?;
//! let params = DetectionParams::global(80, 0.3)?;
//! let detections = decode(&[0.5, 0.5, 0.2, 0.2, 0.9, 2.0, 0.5], &network, &params);
//!
//! assert_eq!(detections.len(), 1);
//! assert_eq!(detections[0].class_id, 2);
//! assert_eq!(detections[0].left, 256.0);
//! # Ok::<(), decoder::DecodeError>(())
//! ```

pub mod config;
pub mod decode;
pub mod errors;
pub mod layers;
pub mod observer;
pub mod rows;
pub mod types;

// Re-export commonly used types for convenience
pub use config::DecoderConfig;
pub use decode::{
    DecodeSummary, Decoder, RowOutcome, classify_row, decode, decode_into, decode_rows,
};
pub use errors::DecodeError;
pub use layers::{OutputLayer, describe_layers, parse_nms_output};
pub use observer::{DecodeObserver, NoopObserver, TracingObserver};
pub use rows::DetectionRows;
pub use types::{
    Detection, DetectionParams, MAX_CLASSES, NetworkInfo, ROW_WIDTH, RawRow, ThresholdPolicy,
};

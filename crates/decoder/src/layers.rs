use crate::decode::{DecodeSummary, decode_into};
use crate::errors::DecodeError;
use crate::observer::DecodeObserver;
use crate::types::{Detection, DetectionParams, NetworkInfo};

/// One output binding as handed over by the host runtime.
#[derive(Debug, Clone, Copy)]
pub struct OutputLayer<'a> {
    pub name: &'a str,
    pub dims: &'a [usize],
    pub data: &'a [f32],
}

impl<'a> OutputLayer<'a> {
    pub fn new(name: &'a str, dims: &'a [usize], data: &'a [f32]) -> Self {
        Self { name, dims, data }
    }

    /// Product of `dims`; an empty shape is a scalar.
    pub fn element_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// The first `element_count()` values of `data`.
    pub fn elements(&self) -> Result<&'a [f32], DecodeError> {
        let expected = self.element_count();
        self.data
            .get(..expected)
            .ok_or_else(|| DecodeError::ShapeMismatch {
                name: self.name.to_string(),
                expected,
                actual: self.data.len(),
            })
    }
}

/// Debug-log name, shape and element count of every output layer.
pub fn describe_layers(layers: &[OutputLayer<'_>]) {
    for (index, layer) in layers.iter().enumerate() {
        tracing::debug!(
            index,
            name = layer.name,
            dims = ?layer.dims,
            elements = layer.element_count(),
            "Output layer"
        );
    }
}

/// Decode the first output layer of an NMS-style detector.
///
/// Only layer 0 is read. Its declared shape decides how many values are
/// decoded; extra capacity in `data` is ignored.
pub fn parse_nms_output<O: DecodeObserver>(
    layers: &[OutputLayer<'_>],
    network: &NetworkInfo,
    params: &DetectionParams,
    out: &mut Vec<Detection>,
    observer: O,
) -> Result<DecodeSummary, DecodeError> {
    let layer = layers.first().ok_or(DecodeError::NoOutputLayers)?;
    let elements = layer.elements()?;
    Ok(decode_into(elements, network, params, out, observer))
}

use crate::types::{ROW_WIDTH, RawRow};

/// Borrowed view of a flat detection tensor as fixed-width rows.
///
/// A buffer whose length is not a multiple of [`ROW_WIDTH`] keeps only the
/// complete rows; the leftover elements are reported by
/// [`DetectionRows::trailing_elements`] and never read.
#[derive(Debug, Clone, Copy)]
pub struct DetectionRows<'a> {
    data: &'a [f32],
}

impl<'a> DetectionRows<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self { data }
    }

    /// Number of complete rows.
    pub fn len(&self) -> usize {
        self.data.len() / ROW_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn trailing_elements(&self) -> usize {
        self.data.len() % ROW_WIDTH
    }

    /// Rows in tensor order, paired with their row index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, RawRow)> + use<'a> {
        self.data
            .chunks_exact(ROW_WIDTH)
            .map(|chunk| {
                RawRow::from_columns(chunk.try_into().expect("chunks_exact yields full rows"))
            })
            .enumerate()
    }
}

use glam::Mat4;

use crate::SceneError;

/// Floats per packed 4x4 matrix.
pub const MATRIX_FLOATS: usize = 16;

/// Maximum number of objects (triangles + quads + subject) a scene can hold.
/// The renderer sizes its instance storage buffer from this value.
pub const MAX_OBJECTS: usize = 1024;

/// Fixed-capacity, contiguous buffer of column-major model matrices.
///
/// Storage is allocated once at full capacity; `len` tracks how many slots
/// are live. Slots are only ever appended at build time and overwritten in
/// place afterwards.
#[derive(Debug, Clone)]
pub struct TransformBuffer {
    data: Vec<f32>,
    len: usize,
    capacity: usize,
}

impl Default for TransformBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_OBJECTS)
    }
}

impl TransformBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity * MATRIX_FLOATS],
            len: 0,
            capacity,
        }
    }

    /// Number of live matrix slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Claim the next slot and initialize it with `matrix`. Returns the slot index.
    pub fn push(&mut self, matrix: Mat4) -> Result<usize, SceneError> {
        if self.len >= self.capacity {
            return Err(SceneError::Capacity {
                requested: self.len + 1,
                capacity: self.capacity,
            });
        }
        let slot = self.len;
        self.len += 1;
        self.copy_into(slot, &matrix);
        Ok(slot)
    }

    /// Overwrite a live slot.
    pub fn write(&mut self, slot: usize, matrix: &Mat4) -> Result<(), SceneError> {
        if slot >= self.len {
            return Err(SceneError::SlotOutOfRange {
                slot,
                len: self.len,
            });
        }
        self.copy_into(slot, matrix);
        Ok(())
    }

    /// Read back a live slot.
    pub fn matrix(&self, slot: usize) -> Option<Mat4> {
        if slot >= self.len {
            return None;
        }
        let start = slot * MATRIX_FLOATS;
        let mut cols = [0.0f32; MATRIX_FLOATS];
        cols.copy_from_slice(&self.data[start..start + MATRIX_FLOATS]);
        Some(Mat4::from_cols_array(&cols))
    }

    /// The live prefix of the buffer: `len * 16` floats.
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..self.len * MATRIX_FLOATS]
    }

    /// Every live slot as a mutable 16-float chunk, in slot order.
    pub(crate) fn live_slots_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        self.data[..self.len * MATRIX_FLOATS].chunks_exact_mut(MATRIX_FLOATS)
    }

    fn copy_into(&mut self, slot: usize, matrix: &Mat4) {
        let start = slot * MATRIX_FLOATS;
        self.data[start..start + MATRIX_FLOATS].copy_from_slice(&matrix.to_cols_array());
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocumentError;
use crate::shape::DrawnShape;

/// The committed shape list, in draw order. Shapes are append-only from
/// the controller's point of view; edits replace whole records.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Document {
    shapes: Vec<DrawnShape>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shape(&mut self, shape: DrawnShape) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[DrawnShape] {
        &self.shapes
    }

    pub fn get(&self, id: Uuid) -> Option<&DrawnShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Remove a shape by id, returning it if present.
    pub fn remove(&mut self, id: Uuid) -> Option<DrawnShape> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        Some(self.shapes.remove(index))
    }

    /// Replace the record with the same id, keeping its position in draw
    /// order. Returns false if no shape with that id exists.
    pub fn replace(&mut self, shape: DrawnShape) -> bool {
        match self.shapes.iter_mut().find(|s| s.id == shape.id) {
            Some(slot) => {
                *slot = shape;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Export the shape list for persistence collaborators.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }
}

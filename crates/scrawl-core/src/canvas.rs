//! Whiteboard document and stroke store with undo/redo.

use crate::shapes::{ShapeAnnotation, Stroke, TextAnnotation};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fields a persisted document must carry.
const REQUIRED_FIELDS: [&str; 3] = ["strokes", "shapes", "textObjects"];

/// Errors raised when loading a persisted document.
#[derive(Debug, Error)]
pub enum DocumentLoadError {
    #[error("Invalid document JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Document is missing field `{0}`")]
    MissingField(&'static str),
}

/// The unit of persistence: everything drawn on a board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteboardDocument {
    #[serde(default)]
    pub selected_text: Option<TextAnnotation>,
    pub text_objects: Vec<TextAnnotation>,
    pub strokes: Vec<Stroke>,
    pub shapes: Vec<ShapeAnnotation>,
}

impl WhiteboardDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the document has no content.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.shapes.is_empty() && self.text_objects.is_empty()
    }

    /// Bounding box of all strokes and shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .filter_map(Stroke::bounds)
            .chain(self.shapes.iter().map(ShapeAnnotation::drag_bounds))
            .chain(self.text_objects.iter().map(TextAnnotation::bounds))
            .reduce(|acc, r| acc.union(r))
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a document from JSON, requiring every content field.
    pub fn from_json(json: &str) -> Result<Self, DocumentLoadError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        for field in REQUIRED_FIELDS {
            if value.get(field).is_none() {
                return Err(DocumentLoadError::MissingField(field));
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Owns the document and the redo source.
///
/// Strokes and shapes are append-only apart from undo/redo and erasing;
/// a committed stroke is never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    document: WhiteboardDocument,
    /// Strokes removed by undo or smart erase, most recent last.
    undo_history: Vec<Stroke>,
    /// Index into `text_objects` of the selected text.
    selected_text: Option<usize>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store around an existing document.
    pub fn with_document(document: WhiteboardDocument) -> Self {
        let mut store = Self::default();
        store.replace_document(document);
        store
    }

    pub fn document(&self) -> &WhiteboardDocument {
        &self.document
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.document.strokes
    }

    pub fn shapes(&self) -> &[ShapeAnnotation] {
        &self.document.shapes
    }

    pub fn text_objects(&self) -> &[TextAnnotation] {
        &self.document.text_objects
    }

    pub fn undo_history(&self) -> &[Stroke] {
        &self.undo_history
    }

    /// Append a finished stroke. Empty strokes are ignored.
    ///
    /// The undo history is left untouched, so `redo` can still bring back
    /// strokes undone before this commit.
    pub fn commit_stroke(&mut self, stroke: Stroke) -> bool {
        if stroke.is_empty() {
            return false;
        }
        self.document.strokes.push(stroke);
        true
    }

    /// Append a committed shape.
    pub fn add_shape(&mut self, shape: ShapeAnnotation) {
        self.document.shapes.push(shape);
    }

    /// Append a text annotation and select it.
    pub fn add_text(&mut self, text: TextAnnotation) -> usize {
        self.document.text_objects.push(text);
        let index = self.document.text_objects.len() - 1;
        self.set_selected_text(Some(index));
        index
    }

    /// Select the first text annotation containing `point`, or clear the selection.
    pub fn select_text_at(&mut self, point: Point) -> Option<usize> {
        let hit = self
            .document
            .text_objects
            .iter()
            .position(|text| text.contains(point));
        self.set_selected_text(hit);
        hit
    }

    pub fn selected_text(&self) -> Option<usize> {
        self.selected_text
    }

    /// Move the selected text annotation by a model-space delta.
    pub fn translate_selected_text(&mut self, delta: Vec2) -> bool {
        let Some(index) = self.selected_text else {
            return false;
        };
        let Some(text) = self.document.text_objects.get_mut(index) else {
            return false;
        };
        text.translate(delta);
        self.document.selected_text = Some(text.clone());
        true
    }

    fn set_selected_text(&mut self, index: Option<usize>) {
        self.selected_text = index.filter(|&i| i < self.document.text_objects.len());
        self.document.selected_text = self
            .selected_text
            .and_then(|i| self.document.text_objects.get(i).cloned());
    }

    /// Undo the last stroke.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.document.strokes.pop() {
            Some(stroke) => {
                self.undo_history.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone stroke.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.undo_history.pop() {
            Some(stroke) => {
                self.document.strokes.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.document.strokes.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.undo_history.is_empty()
    }

    /// Remove every stroke matching `predicate`, pushing each onto the undo
    /// history in document order. Returns the number removed.
    pub fn remove_strokes_where(&mut self, mut predicate: impl FnMut(&Stroke) -> bool) -> usize {
        let strokes = std::mem::take(&mut self.document.strokes);
        let before = strokes.len();
        for stroke in strokes {
            if predicate(&stroke) {
                self.undo_history.push(stroke);
            } else {
                self.document.strokes.push(stroke);
            }
        }
        before - self.document.strokes.len()
    }

    /// Empty strokes, shapes and text. The undo history survives.
    pub fn clear(&mut self) {
        self.document.strokes.clear();
        self.document.shapes.clear();
        self.document.text_objects.clear();
        self.set_selected_text(None);
    }

    /// Drop everything, including the undo history.
    pub fn reset(&mut self) {
        self.clear();
        self.undo_history.clear();
    }

    /// Replace the document wholesale (after a successful load).
    pub fn replace_document(&mut self, document: WhiteboardDocument) {
        self.selected_text = document
            .selected_text
            .as_ref()
            .and_then(|selected| document.text_objects.iter().rposition(|t| t == selected));
        self.document = document;
    }

    /// Parse and install a persisted document. On error the store is untouched.
    pub fn load_json(&mut self, json: &str) -> Result<(), DocumentLoadError> {
        let document = WhiteboardDocument::from_json(json)?;
        self.replace_document(document);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.document.to_json()
    }
}

//! Tool selection and brush settings.

use crate::snap::{MAX_GRID_COLS, MIN_GRID_COLS};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// The active drawing tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
    Rectangle,
    Circle,
    Line,
    Grid,
    Text,
}

/// Shape family for drag-to-preview tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Grid,
}

impl Tool {
    /// Pen and eraser paint incrementally as the pointer moves.
    pub fn is_freehand(self) -> bool {
        matches!(self, Tool::Pen | Tool::Eraser)
    }

    /// The shape family of a drag-to-preview tool, if any.
    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Line => Some(ShapeKind::Line),
            Tool::Grid => Some(ShapeKind::Grid),
            _ => None,
        }
    }
}

/// User-adjustable drawing parameters, shared by all tools.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushSettings {
    pub color: Color,
    pub brush_size: f64,
    pub eraser_size: f64,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    grid_cols: u32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            brush_size: 5.0,
            eraser_size: 20.0,
            font_size: 16.0,
            bold: false,
            italic: false,
            grid_cols: 3,
        }
    }
}

impl BrushSettings {
    /// The stroke width the given tool paints with.
    pub fn width_for(&self, tool: Tool) -> f64 {
        match tool {
            Tool::Eraser => self.eraser_size,
            _ => self.brush_size,
        }
    }

    pub fn grid_cols(&self) -> u32 {
        self.grid_cols
    }

    /// Set the grid column count, clamped to the supported range.
    pub fn set_grid_cols(&mut self, cols: u32) {
        self.grid_cols = cols.clamp(MIN_GRID_COLS, MAX_GRID_COLS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_classification() {
        assert!(Tool::Pen.is_freehand());
        assert!(Tool::Eraser.is_freehand());
        assert!(!Tool::Rectangle.is_freehand());
        assert_eq!(Tool::Line.shape(), Some(ShapeKind::Line));
        assert_eq!(Tool::Text.shape(), None);
        assert_eq!(Tool::Pen.shape(), None);
    }

    #[test]
    fn test_width_per_tool() {
        let settings = BrushSettings::default();
        assert_eq!(settings.width_for(Tool::Pen), 5.0);
        assert_eq!(settings.width_for(Tool::Eraser), 20.0);
        assert_eq!(settings.width_for(Tool::Rectangle), 5.0);
    }

    #[test]
    fn test_grid_cols_clamped() {
        let mut settings = BrushSettings::default();
        settings.set_grid_cols(1);
        assert_eq!(settings.grid_cols(), 2);
        settings.set_grid_cols(99);
        assert_eq!(settings.grid_cols(), 10);
        settings.set_grid_cols(7);
        assert_eq!(settings.grid_cols(), 7);
    }
}

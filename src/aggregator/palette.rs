//! Stable series coloring
//!
//! Each series gets the next slot of a fixed palette on first sight
//! (`assigned_count % palette size`) and keeps it for the whole session,
//! even if the series later disappears from the window.

use ratatui::style::Color;
use std::collections::HashMap;

/// Fixed palette, in assignment order
pub const PALETTE: [Color; 10] = [
    Color::Rgb(0, 123, 255),   // blue
    Color::Rgb(40, 167, 69),   // green
    Color::Rgb(255, 193, 7),   // yellow
    Color::Rgb(220, 53, 69),   // red
    Color::Rgb(23, 162, 184),  // teal
    Color::Rgb(102, 16, 242),  // indigo
    Color::Rgb(253, 126, 20),  // orange
    Color::Rgb(111, 66, 193),  // purple
    Color::Rgb(32, 201, 151),  // mint
    Color::Rgb(232, 62, 140),  // pink
];

/// Monotonically growing series → color mapping
#[derive(Debug, Clone, Default)]
pub struct SeriesPalette {
    assigned: HashMap<String, Color>,
}

impl SeriesPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for a series, assigning the next palette slot on first sight
    pub fn color_for(&mut self, key: &str) -> Color {
        if let Some(color) = self.assigned.get(key) {
            return *color;
        }
        let color = PALETTE[self.assigned.len() % PALETTE.len()];
        self.assigned.insert(key.to_string(), color);
        color
    }

    /// Color for an already-assigned series
    pub fn get(&self, key: &str) -> Option<Color> {
        self.assigned.get(key).copied()
    }

    /// Assign colors to any not-yet-seen keys, in the given order
    pub fn extend<'a, I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for key in keys {
            self.color_for(key);
        }
    }
}

//! Greedy word wrap and vertical placement at a fixed font size
//!
//! [`layout_text`] is pure: it reads metrics and returns a fresh [`Layout`].
//! The fitting search in [`crate::fit`] calls it once per candidate size.

use crate::{fixed::F26Dot6, metrics::GlyphMetrics, types::BoundingBox};

/// One wrapped row of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub words: Vec<String>,
    /// Wrap width: one space plus the word, for every word on the line
    pub width: F26Dot6,
    /// Left edge of the line
    pub x: i32,
    /// Baseline: `box.y` for the first line, then the previous baseline
    /// plus `base_to_base`
    pub y: i32,
    /// Distance from the previous baseline, or from the box top for the
    /// first line
    pub base_to_base: u32,
}

impl Line {
    fn empty() -> Self {
        Self {
            words: Vec::new(),
            width: F26Dot6::ZERO,
            x: 0,
            y: 0,
            base_to_base: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The words as they will be drawn
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Text wrapped and positioned at one font size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub font_size: u32,
    pub lines: Vec<Line>,
    /// Sum of every line's `base_to_base` plus the bottom padding
    pub height: u32,
}

impl Layout {
    pub fn fits(&self, bbox: &BoundingBox) -> bool {
        self.height <= bbox.height
    }

    /// Widest line in pixels, rounded up
    pub fn max_line_width(&self) -> i32 {
        self.lines
            .iter()
            .map(|line| line.width.to_int_ceil())
            .max()
            .unwrap_or(0)
    }
}

/// Extra space between lines, in pixels, for a line-height ratio in em
pub fn leading(line_height: f64, size: u32) -> u32 {
    (line_height * size as f64).floor().max(0.0) as u32
}

/// Wrap `text` into `bbox` at `size` points and place each line
pub fn layout_text(
    text: &str,
    bbox: &BoundingBox,
    size: u32,
    line_height: f64,
    metrics: &dyn GlyphMetrics,
) -> Layout {
    let max_width = F26Dot6::from_int(bbox.width.min(i32::MAX as u32 >> 6) as i32);
    let space = metrics.word_width(" ", size);

    let mut lines: Vec<Line> = Vec::new();
    for hard_line in text.split('\n') {
        let hard_line = hard_line.strip_suffix('\r').unwrap_or(hard_line);
        lines.push(Line::empty());
        let mut current = lines.len() - 1;

        for word in hard_line.split(' ').filter(|w| !w.is_empty()) {
            let word_width = metrics.word_width(word, size);
            if !lines[current].is_empty() && lines[current].width + space + word_width > max_width
            {
                lines.push(Line::empty());
                current = lines.len() - 1;
            }

            let line = &mut lines[current];
            line.width += space + word_width;
            line.words.push(word.to_string());
        }
    }

    let leading = leading(line_height, size);
    let mut height = 0u32;
    let mut baseline = bbox.y;
    for (index, line) in lines.iter_mut().enumerate() {
        if index == 0 {
            line.base_to_base = size;
        } else {
            line.base_to_base = leading.saturating_add(size);
            baseline = baseline.saturating_add(i32::try_from(line.base_to_base).unwrap_or(i32::MAX));
        }
        line.x = bbox.x;
        line.y = baseline;
        height = height.saturating_add(line.base_to_base);
    }
    height = height.saturating_add(leading);

    Layout {
        font_size: size,
        lines,
        height,
    }
}

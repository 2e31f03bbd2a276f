//! Largest font size whose wrapped layout fits a box
//!
//! Layout height never shrinks as the size grows, so the fitting sizes form
//! a prefix `1..=best`. The search probes the maximum first and then bisects
//! `(low, high)` where `low` is the largest size known to fit (0 while none
//! is known) and `high` the smallest size known not to. It stops once the two
//! are adjacent, after at most `1 + ceil(log2(max))` probes.

use crate::{
    layout::{layout_text, Layout},
    metrics::GlyphMetrics,
    types::BoundingBox,
};

/// Inputs to the size search besides the text and box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Upper bound for the chosen size, in points
    pub max_font_size: u32,
    /// Extra space between lines, in em
    pub line_height: f64,
}

/// Outcome of a size search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fit {
    pub layout: Layout,
    /// How many layouts were computed to reach this one
    pub probes: u32,
    /// Even size 1 is taller than the box; `layout` is the size-1 layout
    pub overflow: bool,
}

impl Fit {
    pub fn font_size(&self) -> u32 {
        self.layout.font_size
    }
}

/// Upper bound on probes for a given maximum size
pub fn max_probes(max_font_size: u32) -> u32 {
    let max = max_font_size.max(1);
    // ceil(log2(max)) for max >= 1
    1 + (u32::BITS - (max - 1).leading_zeros())
}

/// Find the largest size `<= params.max_font_size` whose layout fits `bbox`
pub fn find_fitting_size(
    text: &str,
    bbox: &BoundingBox,
    params: &FitParams,
    metrics: &dyn GlyphMetrics,
) -> Fit {
    let max = params.max_font_size.max(1);
    let mut probes = 0u32;
    let mut probe = |size: u32| {
        probes += 1;
        let layout = layout_text(text, bbox, size, params.line_height, metrics);
        log::debug!(
            "fit probe {}: size={} lines={} height={} box_height={}",
            probes,
            size,
            layout.lines.len(),
            layout.height,
            bbox.height
        );
        layout
    };

    let top = probe(max);
    if top.fits(bbox) {
        return Fit {
            layout: top,
            probes,
            overflow: false,
        };
    }

    let mut low = 0u32;
    let mut high = max;
    let mut best: Option<Layout> = None;
    let mut smallest_failure = top;

    while high - low > 1 {
        let mid = low + (high - low) / 2;
        let layout = probe(mid);
        if layout.fits(bbox) {
            low = mid;
            best = Some(layout);
        } else {
            high = mid;
            smallest_failure = layout;
        }
    }

    match best {
        Some(layout) => {
            log::debug!("fit: chose size {} after {} probes", layout.font_size, probes);
            Fit {
                layout,
                probes,
                overflow: false,
            }
        },
        None => {
            log::warn!(
                "text does not fit a {}x{} box even at size {}; layout is {} px tall",
                bbox.width,
                bbox.height,
                smallest_failure.font_size,
                smallest_failure.height
            );
            Fit {
                layout: smallest_failure,
                probes,
                overflow: true,
            }
        },
    }
}

//! Compositing coverage onto an RGBA canvas
//!
//! The canvas holds straight (not premultiplied) RGBA, as decoded images do.
//! Every covered pixel takes its paint from the fill style at the same
//! canvas position and is blended source-over.

use image::{Rgba, RgbaImage};

use annotate_core::{traits::GlyphMask, types::Color, FillStyle};

/// Source-over blend of `src`, scaled by `coverage`, onto `dst`
pub fn blend(dst: &mut Rgba<u8>, src: Color, coverage: u8) {
    let src_a = (src.a as u32 * coverage as u32 + 127) / 255;
    if src_a == 0 {
        return;
    }

    let dst_a = dst[3] as u32;
    let inv_a = 255 - src_a;
    let out_a = src_a + (dst_a * inv_a + 127) / 255;
    if out_a == 0 {
        return;
    }

    let den = out_a * 255;
    for (channel, src_c) in [src.r, src.g, src.b].into_iter().enumerate() {
        let num = src_c as u32 * src_a * 255 + dst[channel] as u32 * dst_a * inv_a;
        dst[channel] = ((num + den / 2) / den).min(255) as u8;
    }
    dst[3] = out_a.min(255) as u8;
}

/// Paints `mask` with its top-left corner at (`left`, `top`), clipped to the
/// canvas
pub fn composite_mask(canvas: &mut RgbaImage, mask: &GlyphMask, left: i32, top: i32, fill: &FillStyle) {
    let (canvas_w, canvas_h) = canvas.dimensions();

    for my in 0..mask.height {
        let y = top as i64 + my as i64;
        if y < 0 || y >= canvas_h as i64 {
            continue;
        }
        for mx in 0..mask.width {
            let x = left as i64 + mx as i64;
            if x < 0 || x >= canvas_w as i64 {
                continue;
            }

            let coverage = mask.coverage_at(mx, my);
            if coverage == 0 {
                continue;
            }

            let (x, y) = (x as u32, y as u32);
            let paint = fill.sample(x, y);
            blend(canvas.get_pixel_mut(x, y), paint, coverage);
        }
    }
}

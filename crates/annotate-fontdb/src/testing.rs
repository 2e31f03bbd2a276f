//! Tiny TrueType fonts built in memory
//!
//! Each glyph is either empty or a single rectangle, so rasterized output is
//! easy to predict. The builder writes `cmap` (format 12), `glyf`, `head`,
//! `hhea`, `hmtx`, `kern` (when pairs were added), `loca` and `maxp`.

use std::collections::BTreeMap;

/// A glyph's advance and optional rectangular outline `(x0, y0, x1, y1)`
#[derive(Debug, Clone, Copy)]
struct TestGlyph {
    advance: u16,
    rect: Option<(i16, i16, i16, i16)>,
}

/// Assembles a minimal, valid TrueType font
#[derive(Debug, Clone)]
pub struct TestFontBuilder {
    units_per_em: u16,
    glyphs: Vec<TestGlyph>,
    cmap: BTreeMap<char, u16>,
    kerning: Vec<(char, char, i16)>,
}

impl TestFontBuilder {
    /// A font with only `.notdef`: half an em wide, drawn as a box
    pub fn new(units_per_em: u16) -> Self {
        let half = (units_per_em / 2) as i16;
        Self {
            units_per_em,
            glyphs: vec![TestGlyph {
                advance: units_per_em / 2,
                rect: Some((half / 5, 0, half - half / 5, half)),
            }],
            cmap: BTreeMap::new(),
            kerning: Vec::new(),
        }
    }

    /// Adds a glyph for `ch` with the next free glyph id
    pub fn glyph(mut self, ch: char, advance: u16, rect: Option<(i16, i16, i16, i16)>) -> Self {
        let id = self.glyphs.len() as u16;
        self.glyphs.push(TestGlyph { advance, rect });
        self.cmap.insert(ch, id);
        self
    }

    /// Adds a kerning pair between two already mapped characters
    pub fn kern(mut self, left: char, right: char, value: i16) -> Self {
        self.kerning.push((left, right, value));
        self
    }

    /// Glyph id assigned to `ch`, if mapped
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.cmap.get(&ch).copied()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut tables: BTreeMap<[u8; 4], Vec<u8>> = BTreeMap::new();
        let (glyf, loca) = self.glyf_and_loca();
        tables.insert(*b"cmap", self.cmap_table());
        tables.insert(*b"glyf", glyf);
        tables.insert(*b"head", self.head_table());
        tables.insert(*b"hhea", self.hhea_table());
        tables.insert(*b"hmtx", self.hmtx_table());
        if let Some(kern) = self.kern_table() {
            tables.insert(*b"kern", kern);
        }
        tables.insert(*b"loca", loca);
        tables.insert(*b"maxp", self.maxp_table());
        sfnt(&tables)
    }

    fn head_table(&self) -> Vec<u8> {
        let mut t = Vec::with_capacity(54);
        push_u16(&mut t, 1);
        push_u16(&mut t, 0);
        push_u32(&mut t, 0x0001_0000);
        push_u32(&mut t, 0);
        push_u32(&mut t, 0x5F0F_3CF5);
        push_u16(&mut t, 0);
        push_u16(&mut t, self.units_per_em);
        t.extend_from_slice(&[0; 16]);
        let (x0, y0, x1, y1) = self.font_bounds();
        for v in [x0, y0, x1, y1] {
            push_i16(&mut t, v);
        }
        push_u16(&mut t, 0);
        push_u16(&mut t, 8);
        push_i16(&mut t, 2);
        // Long loca offsets
        push_i16(&mut t, 1);
        push_i16(&mut t, 0);
        t
    }

    fn hhea_table(&self) -> Vec<u8> {
        let mut t = Vec::with_capacity(36);
        push_u16(&mut t, 1);
        push_u16(&mut t, 0);
        let ascender = (self.units_per_em as i32 * 4 / 5) as i16;
        let descender = -((self.units_per_em / 5) as i16);
        push_i16(&mut t, ascender);
        push_i16(&mut t, descender);
        push_i16(&mut t, 0);
        let max_advance = self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
        push_u16(&mut t, max_advance);
        push_i16(&mut t, 0);
        push_i16(&mut t, 0);
        push_i16(&mut t, self.font_bounds().2);
        push_i16(&mut t, 1);
        push_i16(&mut t, 0);
        push_i16(&mut t, 0);
        t.extend_from_slice(&[0; 8]);
        push_i16(&mut t, 0);
        push_u16(&mut t, self.glyphs.len() as u16);
        t
    }

    fn maxp_table(&self) -> Vec<u8> {
        let mut t = Vec::with_capacity(32);
        push_u32(&mut t, 0x0001_0000);
        push_u16(&mut t, self.glyphs.len() as u16);
        // maxPoints, maxContours
        push_u16(&mut t, 4);
        push_u16(&mut t, 1);
        push_u16(&mut t, 0);
        push_u16(&mut t, 0);
        // maxZones
        push_u16(&mut t, 2);
        t.extend_from_slice(&[0; 16]);
        t
    }

    fn hmtx_table(&self) -> Vec<u8> {
        let mut t = Vec::with_capacity(self.glyphs.len() * 4);
        for glyph in &self.glyphs {
            push_u16(&mut t, glyph.advance);
            push_i16(&mut t, glyph.rect.map(|r| r.0).unwrap_or(0));
        }
        t
    }

    fn cmap_table(&self) -> Vec<u8> {
        let mut t = Vec::new();
        push_u16(&mut t, 0);
        push_u16(&mut t, 1);
        // Windows, full Unicode repertoire
        push_u16(&mut t, 3);
        push_u16(&mut t, 10);
        push_u32(&mut t, 12);

        let groups = self.cmap.len() as u32;
        push_u16(&mut t, 12);
        push_u16(&mut t, 0);
        push_u32(&mut t, 16 + 12 * groups);
        push_u32(&mut t, 0);
        push_u32(&mut t, groups);
        for (&ch, &gid) in &self.cmap {
            push_u32(&mut t, ch as u32);
            push_u32(&mut t, ch as u32);
            push_u32(&mut t, gid as u32);
        }
        t
    }

    fn kern_table(&self) -> Option<Vec<u8>> {
        let mut pairs: Vec<(u16, u16, i16)> = self
            .kerning
            .iter()
            .filter_map(|&(l, r, v)| Some((self.glyph_id(l)?, self.glyph_id(r)?, v)))
            .collect();
        if pairs.is_empty() {
            return None;
        }
        pairs.sort_by_key(|&(l, r, _)| (l, r));

        let mut t = Vec::new();
        push_u16(&mut t, 0);
        push_u16(&mut t, 1);
        push_u16(&mut t, 0);
        push_u16(&mut t, (14 + pairs.len() * 6) as u16);
        // Horizontal, format 0
        push_u16(&mut t, 0x0001);
        push_u16(&mut t, pairs.len() as u16);
        push_u16(&mut t, 0);
        push_u16(&mut t, 0);
        push_u16(&mut t, 0);
        for (l, r, v) in pairs {
            push_u16(&mut t, l);
            push_u16(&mut t, r);
            push_i16(&mut t, v);
        }
        Some(t)
    }

    fn glyf_and_loca(&self) -> (Vec<u8>, Vec<u8>) {
        let mut glyf = Vec::new();
        let mut loca = Vec::new();
        for glyph in &self.glyphs {
            push_u32(&mut loca, glyf.len() as u32);
            if let Some((x0, y0, x1, y1)) = glyph.rect {
                push_i16(&mut glyf, 1);
                for v in [x0, y0, x1, y1] {
                    push_i16(&mut glyf, v);
                }
                push_u16(&mut glyf, 3);
                push_u16(&mut glyf, 0);
                // Four on-curve points with 16-bit deltas
                glyf.extend_from_slice(&[0x01; 4]);
                for dx in [x0, x1 - x0, 0, x0 - x1] {
                    push_i16(&mut glyf, dx);
                }
                for dy in [y0, 0, y1 - y0, 0] {
                    push_i16(&mut glyf, dy);
                }
                while glyf.len() % 4 != 0 {
                    glyf.push(0);
                }
            }
        }
        push_u32(&mut loca, glyf.len() as u32);
        (glyf, loca)
    }

    fn font_bounds(&self) -> (i16, i16, i16, i16) {
        self.glyphs
            .iter()
            .filter_map(|g| g.rect)
            .fold((0, 0, 0, 0), |acc, r| {
                (acc.0.min(r.0), acc.1.min(r.1), acc.2.max(r.2), acc.3.max(r.3))
            })
    }
}

/// 1000 units per em. ASCII letters and digits advance 500 units and are
/// drawn as a box from (50, 0) to (450, 700); space advances 250 with no
/// outline; "AV" is kerned by -80.
pub fn sample_font() -> Vec<u8> {
    sample_builder().build()
}

/// The builder behind [`sample_font`], for tests that need glyph ids
pub fn sample_builder() -> TestFontBuilder {
    let mut builder = TestFontBuilder::new(1000).glyph(' ', 250, None);
    for ch in ('A'..='Z').chain('a'..='z').chain('0'..='9') {
        builder = builder.glyph(ch, 500, Some((50, 0, 450, 700)));
    }
    builder.kern('A', 'V', -80)
}

fn sfnt(tables: &BTreeMap<[u8; 4], Vec<u8>>) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut entry_selector = 0u16;
    while (1u16 << (entry_selector + 1)) <= num_tables {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector) * 16;

    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u16(&mut out, num_tables);
    push_u16(&mut out, search_range);
    push_u16(&mut out, entry_selector);
    push_u16(&mut out, num_tables * 16 - search_range);

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in tables {
        out.extend_from_slice(tag);
        push_u32(&mut out, 0);
        push_u32(&mut out, offset as u32);
        push_u32(&mut out, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    out.extend(body);
    out
}

fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn push_i16(buf: &mut Vec<u8>, v: i16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

//! 26.6 fixed-point pixel measurements
//!
//! Widths are summed glyph by glyph across a whole line, so they are kept in
//! integer 1/64ths of a pixel. Repeated layout probes at the same size then
//! produce bit-identical widths. Arithmetic saturates at the `i32` range, so
//! a huge size measures as a very wide line instead of overflowing.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Pixel distance with six fractional bits
///
/// ```rust
/// use annotate_core::fixed::F26Dot6;
///
/// let x = F26Dot6::from_int(5);
/// let y = F26Dot6::from_float(5.5);
/// assert_eq!((y - x).raw(), 32);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct F26Dot6(i32);

impl F26Dot6 {
    pub const FRAC_BITS: u32 = 6;

    pub const FRAC_MASK: i32 = (1 << Self::FRAC_BITS) - 1;

    pub const ONE: F26Dot6 = F26Dot6(1 << Self::FRAC_BITS);

    pub const ZERO: F26Dot6 = F26Dot6(0);

    #[inline]
    pub const fn from_int(x: i32) -> Self {
        F26Dot6(x << Self::FRAC_BITS)
    }

    #[inline]
    pub fn from_float(x: f32) -> Self {
        F26Dot6((x * 64.0).round() as i32)
    }

    /// Scales a design-unit distance to pixels at `ppem` pixels per em
    ///
    /// Rounds to the nearest 1/64 px. A zero `units_per_em` is treated as
    /// 1000, the PostScript convention.
    #[inline]
    pub fn from_font_units(units: f32, ppem: f64, units_per_em: u16) -> Self {
        let upem = if units_per_em == 0 {
            1000.0
        } else {
            units_per_em as f64
        };
        F26Dot6((units as f64 * ppem * 64.0 / upem).round() as i32)
    }

    /// Whole pixels, rounding toward negative infinity
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Whole pixels, rounding up
    #[inline]
    pub const fn to_int_ceil(self) -> i32 {
        self.0.saturating_add(Self::FRAC_MASK) >> Self::FRAC_BITS
    }

    #[inline]
    pub const fn to_int_round(self) -> i32 {
        self.0.saturating_add(1 << (Self::FRAC_BITS - 1)) >> Self::FRAC_BITS
    }

    #[inline]
    pub fn to_float(self) -> f32 {
        self.0 as f32 / 64.0
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        F26Dot6(raw)
    }
}

impl Add for F26Dot6 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        F26Dot6(self.0.saturating_add(other.0))
    }
}

impl AddAssign for F26Dot6 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for F26Dot6 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        F26Dot6(self.0.saturating_sub(other.0))
    }
}

impl Neg for F26Dot6 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        F26Dot6(self.0.saturating_neg())
    }
}

impl Sum for F26Dot6 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(F26Dot6::ZERO, Add::add)
    }
}

impl fmt::Display for F26Dot6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}px", self.to_float())
    }
}

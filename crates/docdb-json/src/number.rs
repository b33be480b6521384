//! [`Number64`]: the generic JSON number, held as either an `i64` or an `f64`.

use std::fmt;

/// A JSON number that keeps integers exact.
///
/// Values parsed from integral text, or decoded from the binary integer
/// markers, are `Int`; everything else is `Double`. Equality is numeric, so
/// `Int(3) == Double(3.0)` and large integers compare without going through
/// a lossy `f64` conversion.
#[derive(Debug, Clone, Copy)]
pub enum Number64 {
    Int(i64),
    Double(f64),
}

const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

impl Number64 {
    pub fn is_integer(&self) -> bool {
        self.exact_integer().is_some()
    }

    /// The value as an `f64`, rounding large integers to the nearest double.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number64::Int(i) => i as f64,
            Number64::Double(d) => d,
        }
    }

    /// `-0.0`, which compares equal to `0` but must keep its sign when
    /// encoded.
    pub fn is_negative_zero(&self) -> bool {
        matches!(*self, Number64::Double(d) if d == 0.0 && d.is_sign_negative())
    }

    /// The value as an `i64` when it is integral and in range.
    pub fn exact_integer(&self) -> Option<i64> {
        match *self {
            Number64::Int(i) => Some(i),
            Number64::Double(d) => double_to_i64(d),
        }
    }
}

pub(crate) fn double_to_i64(d: f64) -> Option<i64> {
    if d.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(&d) {
        Some(d as i64)
    } else {
        None
    }
}

impl PartialEq for Number64 {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number64::Int(a), Number64::Int(b)) => a == b,
            (Number64::Double(a), Number64::Double(b)) => a == b,
            (Number64::Int(i), Number64::Double(d)) | (Number64::Double(d), Number64::Int(i)) => {
                double_to_i64(d) == Some(i)
            }
        }
    }
}

impl From<i64> for Number64 {
    fn from(value: i64) -> Self {
        Number64::Int(value)
    }
}

impl From<i32> for Number64 {
    fn from(value: i32) -> Self {
        Number64::Int(i64::from(value))
    }
}

impl From<u32> for Number64 {
    fn from(value: u32) -> Self {
        Number64::Int(i64::from(value))
    }
}

impl From<f64> for Number64 {
    fn from(value: f64) -> Self {
        Number64::Double(value)
    }
}

impl fmt::Display for Number64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number64::Int(i) => write!(f, "{i}"),
            Number64::Double(d) => f.write_str(&format_double(d)),
        }
    }
}

/// Formats a double the way the text writer emits it.
///
/// Integral values below 1e15 print without a fraction; everything else uses
/// the shortest representation that parses back to the same bits.
pub(crate) fn format_double(d: f64) -> String {
    if let Some(special) = non_finite_literal(d) {
        special.to_string()
    } else if d.fract() == 0.0 && d.abs() < 1e15 && !Number64::Double(d).is_negative_zero() {
        format!("{}", d as i64)
    } else {
        format!("{d:?}")
    }
}

pub(crate) fn format_float32(f: f32) -> String {
    match non_finite_literal(f64::from(f)) {
        Some(special) => special.to_string(),
        None => format!("{f:?}"),
    }
}

pub(crate) fn format_float64(d: f64) -> String {
    match non_finite_literal(d) {
        Some(special) => special.to_string(),
        None => format!("{d:?}"),
    }
}

fn non_finite_literal(d: f64) -> Option<&'static str> {
    if d.is_nan() {
        Some("NaN")
    } else if d.is_infinite() {
        Some(if d > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        None
    }
}

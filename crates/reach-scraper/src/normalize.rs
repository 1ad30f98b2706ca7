//! Count normalization.
//!
//! Profile pages print counts as `1,234`, `12.5K`, `3.1M`, `1.2만` or `2억`
//! depending on locale and magnitude. [`normalize_count`] turns any of these
//! into a plain integer and returns `0` for anything it cannot read.

/// Fraction digits beyond this are ignored; no page prints more.
const MAX_FRACTION_DIGITS: usize = 9;

/// Converts a displayed count into an integer.
///
/// The leading run of digits and `.` is the mantissa; a `,` or whitespace
/// inside it is a thousands separator only when another digit follows. When
/// a multiplier suffix comes next, optionally after whitespace, the mantissa
/// is multiplied and floored; otherwise the integer part of the mantissa is
/// returned. `천`, `만` and `억` always count as suffixes. `K`/`M`/`B` (any
/// case) count only when no ASCII letter follows, so `3 members` is `3`.
/// Empty or non-numeric input yields `0`. Results saturate at `u64::MAX`.
#[must_use]
pub fn normalize_count(raw: &str) -> u64 {
    let (mantissa, rest) = split_mantissa(raw.trim_start());

    let Some(mantissa) = Mantissa::parse(&mantissa) else {
        return 0;
    };

    match suffix_factor(rest.trim_start()) {
        Some(factor) => mantissa.scaled(factor),
        None => mantissa.whole,
    }
}

/// Splits `text` into its separator-free mantissa and the remainder.
fn split_mantissa(text: &str) -> (String, &str) {
    let mut mantissa = String::new();
    let mut chars = text.char_indices().peekable();
    while let Some((at, c)) = chars.next() {
        if c.is_ascii_digit() || c == '.' {
            mantissa.push(c);
            continue;
        }
        let separates_digits = (c == ',' || c.is_whitespace())
            && !mantissa.is_empty()
            && chars.peek().is_some_and(|(_, next)| next.is_ascii_digit());
        if !separates_digits {
            return (mantissa, &text[at..]);
        }
    }
    (mantissa, "")
}

/// Multiplier for the suffix that starts `rest`, if there is one.
fn suffix_factor(rest: &str) -> Option<u64> {
    let mut chars = rest.chars();
    let first = chars.next()?;
    let latin = match first {
        '천' => return Some(1_000),
        '만' => return Some(10_000),
        '억' => return Some(100_000_000),
        'k' | 'K' => 1_000,
        'm' | 'M' => 1_000_000,
        'b' | 'B' => 1_000_000_000,
        _ => return None,
    };
    match chars.next() {
        Some(next) if next.is_ascii_alphabetic() => None,
        _ => Some(latin),
    }
}

/// A non-negative decimal kept as integers so `1.2K` floors to exactly 1200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mantissa {
    whole: u64,
    fraction: u64,
    fraction_scale: u64,
}

impl Mantissa {
    fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split('.');
        let whole_digits = parts.next().unwrap_or_default();
        let fraction_digits = parts.next().unwrap_or_default();
        if whole_digits.is_empty() && fraction_digits.is_empty() {
            return None;
        }

        let whole = if whole_digits.is_empty() {
            0
        } else {
            // Only overflow can fail here: the slice holds ASCII digits.
            whole_digits.parse::<u64>().unwrap_or(u64::MAX)
        };

        let fraction_digits = &fraction_digits[..fraction_digits.len().min(MAX_FRACTION_DIGITS)];
        let (fraction, fraction_scale) = if fraction_digits.is_empty() {
            (0, 1)
        } else {
            let exponent = u32::try_from(fraction_digits.len()).unwrap_or(0);
            (
                fraction_digits.parse::<u64>().unwrap_or(0),
                10u64.pow(exponent),
            )
        };

        Some(Self {
            whole,
            fraction,
            fraction_scale,
        })
    }

    fn scaled(self, factor: u64) -> u64 {
        let whole = u128::from(self.whole) * u128::from(factor);
        let fraction =
            u128::from(self.fraction) * u128::from(factor) / u128::from(self.fraction_scale);
        u64::try_from(whole + fraction).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

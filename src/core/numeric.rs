/// Number formatting shared by every effect renderer.

const FULL_WIDTH_DIGITS: [char; 10] = ['０', '１', '２', '３', '４', '５', '６', '７', '８', '９'];

/// Format a multiplier: round to two decimals, drop trailing zeros, and drop
/// the decimal point when the value is integral.
///
/// `1.0 → "1"`, `1.5 → "1.5"`, `0.333333 → "0.33"`.
pub fn fmt_mult(x: f64) -> String {
    let rounded = format!("{:.2}", x);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format a ratio (`0.25`) as a percentage number (`"25"`).
pub fn fmt_percent(ratio: f64) -> String {
    fmt_mult(ratio * 100.0)
}

/// Render every decimal digit of `n` as its full-width counterpart.
pub fn half_to_full(n: u64) -> String {
    n.to_string()
        .bytes()
        .map(|b| FULL_WIDTH_DIGITS[(b - b'0') as usize])
        .collect()
}

/// `"a~b"` when the bounds differ, otherwise the single value.
pub fn minmax<T: PartialEq + std::fmt::Display>(min: T, max: T) -> String {
    if min == max {
        min.to_string()
    } else {
        format!("{}~{}", min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_multipliers_have_no_point() {
        assert_eq!(fmt_mult(1.0), "1");
        assert_eq!(fmt_mult(10.0), "10");
        assert_eq!(fmt_mult(100.0), "100");
        assert_eq!(fmt_mult(0.0), "0");
    }

    #[test]
    fn fractional_multipliers() {
        assert_eq!(fmt_mult(1.5), "1.5");
        assert_eq!(fmt_mult(0.1), "0.1");
        assert_eq!(fmt_mult(0.333333), "0.33");
        assert_eq!(fmt_mult(2.25), "2.25");
        assert_eq!(fmt_mult(3.999), "4");
    }

    #[test]
    fn percentages_absorb_float_noise() {
        assert_eq!(fmt_percent(0.1), "10");
        assert_eq!(fmt_percent(0.35), "35");
        assert_eq!(fmt_percent(1.0), "100");
        assert_eq!(fmt_percent(0.125), "12.5");
    }

    #[test]
    fn full_width_digits() {
        assert_eq!(half_to_full(12), "１２");
        assert_eq!(half_to_full(0), "０");
        assert_eq!(half_to_full(907), "９０７");
        assert_eq!(half_to_full(12).chars().count(), 2);
    }

    #[test]
    fn minmax_collapses_equal_bounds() {
        assert_eq!(minmax(2, 2), "2");
        assert_eq!(minmax(1, 3), "1~3");
        assert_eq!(minmax("1.5", "2"), "1.5~2");
    }
}

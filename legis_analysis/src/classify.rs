use crate::config::FORMULAIC_MIN_PRODUCT;

const FORMULAIC_PREFIXES: [&str; 4] = [
    "A bill to designate ",
    "To designate ",
    "To name ",
    "A bill for the relief of ",
];

const FORMULAIC_FRAGMENTS: [&str; 1] = ["Commemorative Coin Act"];

/// Decides whether the overlap between two bills amounts to incorporation of one
/// into the other.
///
/// Arguments:
/// * `ratio_a`, `ratio_b`: the share of each bill found in the other
/// * `matched_length`: the length in characters of the text in common
///
/// The first matching tier wins:
/// 1. both bills mostly reflect each other and the overlap is long,
/// 2. one bill is largely contained in the other and the overlap is significant,
/// 3. the overlap is a small part of a large bill but is itself very long.
pub fn is_incorporated(ratio_a: f64, ratio_b: f64, matched_length: usize) -> bool {
    let len = matched_length as f64;
    if ratio_a * ratio_b > f64::max(0.95 - 0.0006 * (len - 300.0), 0.66) && matched_length > 300
    {
        return true;
    }
    if f64::max(ratio_a, ratio_b) > f64::max(0.8 - 0.00015 * (len - 800.0), 0.33)
        && matched_length > 800
    {
        return true;
    }
    (ratio_a > 0.15 || ratio_b > 0.15) && matched_length > 8000
}

/// Titles of bills made mostly of boilerplate (namings, private relief, coins).
pub fn is_formulaic_title(title: &str) -> bool {
    FORMULAIC_PREFIXES.iter().any(|p| title.starts_with(p))
        || FORMULAIC_FRAGMENTS.iter().any(|f| title.contains(f))
}

/// `is_incorporated` with the stricter policy for formulaic bills: their ratios
/// must multiply to at least 0.85.
pub fn classify(ratio_a: f64, ratio_b: f64, matched_length: usize, formulaic: bool) -> bool {
    if formulaic && ratio_a * ratio_b < FORMULAIC_MIN_PRODUCT {
        return false;
    }
    is_incorporated(ratio_a, ratio_b, matched_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_cases() {
        assert!(!is_incorporated(0.5, 0.5, 300));
        assert!(is_incorporated(0.99, 0.99, 301));
        assert!(is_incorporated(0.9, 0.1, 801));
        assert!(is_incorporated(0.2, 0.1, 8001));
    }

    #[test]
    fn lengths_are_strict() {
        assert!(!is_incorporated(1.0, 1.0, 300));
        assert!(!is_incorporated(0.9, 0.1, 800));
        assert!(!is_incorporated(0.2, 0.1, 8000));
        assert!(!is_incorporated(0.0, 0.0, 100_000));
    }

    #[test]
    fn formulaic_titles() {
        assert!(is_formulaic_title(
            "To designate the facility of the United States Postal Service located at 1 Main Street"
        ));
        assert!(is_formulaic_title("A bill for the relief of John Doe."));
        assert!(is_formulaic_title("Apollo 11 50th Anniversary Commemorative Coin Act"));
        assert!(!is_formulaic_title("Consolidated Appropriations Act, 2016"));
        // Prefixes are matched at the start only.
        assert!(!is_formulaic_title("An act To name a bridge"));
    }

    #[test]
    fn formulaic_override() {
        // Tier 2 passes, but the product is too low for a naming bill.
        assert!(classify(0.9, 0.5, 2000, false));
        assert!(!classify(0.9, 0.5, 2000, true));
        assert!(classify(0.95, 0.95, 2000, true));
        // The override never promotes a pair.
        assert!(!classify(0.95, 0.95, 100, true));
    }
}

use legis_analysis::classify::is_incorporated;
use legis_analysis::compare::compare;
use legis_analysis::scores::{leadership, median, pagerank, smooth};
use legis_analysis::text::extract_text_from_str;
use legis_analysis::ScoringConfig;
use nalgebra::DMatrix;
use proptest::prelude::*;

fn text_strategy(max_words: usize) -> impl Strategy<Value = String> {
    prop::collection::vec("[a-f]{1,3}", 1..max_words).prop_map(|w| w.join(" "))
}

fn counts_strategy() -> impl Strategy<Value = DMatrix<f64>> {
    (1usize..12).prop_flat_map(|half| {
        let n = 2 * half + 1;
        prop::collection::vec(0u32..6, n * n).prop_map(move |cells| {
            let mut m = DMatrix::<f64>::identity(n, n);
            for (k, c) in cells.iter().enumerate() {
                m[(k / n, k % n)] += *c as f64;
            }
            m
        })
    })
}

proptest! {
    #[test]
    fn extraction_is_deterministic(body in "[a-z ]{0,200}", header in "[a-z ]{0,30}") {
        let xml = format!(
            "<bill><legis-body><section><header>{}</header><text>{}</text></section></legis-body></bill>",
            header, body
        );
        let first = extract_text_from_str(&xml).unwrap();
        let second = extract_text_from_str(&xml).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn swapping_texts_swaps_ratios(a in text_strategy(120), b in text_strategy(120)) {
        let ab = compare(&a, &b);
        let ba = compare(&b, &a);
        prop_assert_eq!(ab.ratio_a, ba.ratio_b);
        prop_assert_eq!(ab.ratio_b, ba.ratio_a);
        prop_assert_eq!(ab.matched_words, ba.matched_words);
    }

    #[test]
    fn self_comparison_is_complete(t in text_strategy(300)) {
        let c = compare(&t, &t);
        prop_assert_eq!(c.ratio_a, 1.0);
        prop_assert_eq!(c.ratio_b, 1.0);
        prop_assert_eq!(c.extract, t);
    }

    #[test]
    fn classifier_is_monotone(
        ratio_a in 0.0f64..1.0,
        ratio_b in 0.0f64..1.0,
        bump in 0.0f64..0.5,
        len in 0usize..12_000,
    ) {
        if is_incorporated(ratio_a, ratio_b, len) {
            prop_assert!(is_incorporated((ratio_a + bump).min(1.0), ratio_b, len));
            prop_assert!(is_incorporated(ratio_a, (ratio_b + bump).min(1.0), len));
        }
    }

    #[test]
    fn leadership_converges(counts in counts_strategy()) {
        let smoothed = smooth(&counts);
        let raw = pagerank(&smoothed, &ScoringConfig::DEFAULT).unwrap();
        prop_assert!((raw.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let scores = leadership(&smoothed, &ScoringConfig::DEFAULT).unwrap();
        prop_assert!(scores.iter().all(|v| (-1e-12..=1.0 + 1e-12).contains(v)));
        let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
        let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let m = median(&raw);
        prop_assume!(m > min && m < max);
        let idx = raw.iter().position(|v| *v == m).unwrap();
        prop_assert!((scores[idx] - 0.5).abs() < 1e-9);
    }
}

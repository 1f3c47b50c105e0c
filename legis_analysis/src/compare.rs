use log::debug;
use std::collections::HashMap;

use crate::config::*;
use crate::matcher::*;

/// Interns words as integer ids. The mapping is invertible.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: HashMap<String, u32>,
    words: Vec<String>,
}

impl Vocabulary {
    pub fn intern(&mut self, word: &str) -> u32 {
        if let Some(id) = self.ids.get(word) {
            return *id;
        }
        let id = self.words.len() as u32;
        self.words.push(word.to_string());
        self.ids.insert(word.to_string(), id);
        id
    }

    pub fn id(&self, word: &str) -> Option<u32> {
        self.ids.get(word).copied()
    }

    pub fn word(&self, id: u32) -> Option<&str> {
        self.words.get(id as usize).map(|w| w.as_str())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// The id of the words that the prepared text never uses. It matches nothing.
const UNKNOWN_WORD: u32 = u32::MAX;

/// The outcome of aligning two texts.
///
/// `a` is the text being compared and `b` the reference text.
#[derive(PartialEq, Debug, Clone)]
pub struct Comparison {
    /// Fraction of the words of `a` found in matched blocks.
    pub ratio_a: f64,
    /// Fraction of the words of `b` found in matched blocks.
    pub ratio_b: f64,
    pub matched_words: usize,
    /// The words of `a` in each matched block, blocks separated by `...`.
    pub extract: String,
}

impl Comparison {
    /// The length in characters of the extract. This is the overlap length the
    /// incorporation thresholds are calibrated against.
    pub fn matched_length(&self) -> usize {
        self.extract.chars().count()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum RunKind {
    /// Words present in both texts.
    Same,
    /// Words only in `b`.
    Insert,
    /// Words only in `a`.
    Delete,
    /// Words of `a` replaced by words of `b`.
    Replace,
}

/// A stretch of the alignment. `matched` counts the words actually shared, which
/// can be less than the span once short differences are absorbed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Run {
    pub kind: RunKind,
    pub a_start: usize,
    pub a_len: usize,
    pub b_start: usize,
    pub b_len: usize,
    pub matched: usize,
}

impl Run {
    fn span(&self) -> usize {
        self.a_len.max(self.b_len)
    }

    fn a_end(&self) -> usize {
        self.a_start + self.a_len
    }

    fn b_end(&self) -> usize {
        self.b_start + self.b_len
    }

    /// The same run seen with the two texts swapped.
    pub fn mirrored(&self) -> Run {
        let kind = match self.kind {
            RunKind::Insert => RunKind::Delete,
            RunKind::Delete => RunKind::Insert,
            k => k,
        };
        Run {
            kind,
            a_start: self.b_start,
            a_len: self.b_len,
            b_start: self.a_start,
            b_len: self.a_len,
            matched: self.matched,
        }
    }

    // Covers self and every run up to `last`, which must follow it.
    fn joined(&self, last: &Run, kind: RunKind, matched: usize) -> Run {
        Run {
            kind,
            a_start: self.a_start,
            a_len: last.a_end() - self.a_start,
            b_start: self.b_start,
            b_len: last.b_end() - self.b_start,
            matched,
        }
    }
}

/// A text prepared as the fixed side of many comparisons.
///
/// The vocabulary and the block matcher of the text are built once and reused for each
/// text compared against it.
#[derive(Debug, Clone)]
pub struct PreparedText {
    vocabulary: Vocabulary,
    matcher: BlockMatcher,
}

impl PreparedText {
    pub fn new(text: &str) -> PreparedText {
        let words: Vec<&str> = text.split_whitespace().collect();
        PreparedText::from_words(&words)
    }

    fn from_words(words: &[&str]) -> PreparedText {
        let mut vocabulary = Vocabulary::default();
        let tokens: Vec<u32> = words.iter().map(|w| vocabulary.intern(w)).collect();
        PreparedText {
            vocabulary,
            matcher: BlockMatcher::new(tokens),
        }
    }

    pub fn word_count(&self) -> usize {
        self.matcher.b().len()
    }

    /// The prepared text, rebuilt from its vocabulary.
    pub fn words(&self) -> Vec<&str> {
        self.matcher
            .b()
            .iter()
            .filter_map(|id| self.vocabulary.word(*id))
            .collect()
    }

    /// Compares `text` (side `a`) against the prepared text (side `b`).
    pub fn compare_with(&self, text: &str) -> Comparison {
        let words: Vec<&str> = text.split_whitespace().collect();
        let runs = simplify_runs(&self.align(&words));
        summarize(&runs, &words, self.word_count())
    }

    fn align(&self, words: &[&str]) -> Vec<Run> {
        let tokens: Vec<u32> = words
            .iter()
            .map(|w| self.vocabulary.id(w).unwrap_or(UNKNOWN_WORD))
            .collect();
        let blocks = self.matcher.matching_blocks(&tokens);
        debug!(
            "align: {} words against {}: {} raw blocks",
            tokens.len(),
            self.word_count(),
            blocks.len()
        );
        runs_from_blocks(&blocks, tokens.len(), self.word_count())
    }
}

/// Compares two normalized texts.
///
/// The alignment does not depend on the order of the arguments: `compare(b, a)` returns
/// the ratios of `compare(a, b)` swapped. The extract is made of the words of `text_a`.
pub fn compare(text_a: &str, text_b: &str) -> Comparison {
    let words_a: Vec<&str> = text_a.split_whitespace().collect();
    let words_b: Vec<&str> = text_b.split_whitespace().collect();
    // The longer text (then the greater one) is always the fixed side.
    let prepare_a = (words_a.len(), &words_a) > (words_b.len(), &words_b);
    let runs: Vec<Run> = if prepare_a {
        PreparedText::from_words(&words_a)
            .align(&words_b)
            .iter()
            .map(|r| r.mirrored())
            .collect()
    } else {
        PreparedText::from_words(&words_b).align(&words_a)
    };
    summarize(&simplify_runs(&runs), &words_a, words_b.len())
}

/// Turns matching blocks into a complete sequence of runs covering both texts.
///
/// A stretch that differs on both sides becomes a `Delete` followed by an `Insert`.
pub fn runs_from_blocks(blocks: &[MatchBlock], len_a: usize, len_b: usize) -> Vec<Run> {
    let terminator = MatchBlock {
        a_start: len_a,
        b_start: len_b,
        size: 0,
    };
    let mut runs: Vec<Run> = Vec::new();
    let (mut i, mut j) = (0, 0);
    for m in blocks.iter().chain(std::iter::once(&terminator)) {
        if m.a_start > i {
            runs.push(Run {
                kind: RunKind::Delete,
                a_start: i,
                a_len: m.a_start - i,
                b_start: j,
                b_len: 0,
                matched: 0,
            });
        }
        if m.b_start > j {
            runs.push(Run {
                kind: RunKind::Insert,
                a_start: m.a_start,
                a_len: 0,
                b_start: j,
                b_len: m.b_start - j,
                matched: 0,
            });
        }
        if m.size > 0 {
            runs.push(Run {
                kind: RunKind::Same,
                a_start: m.a_start,
                a_len: m.size,
                b_start: m.b_start,
                b_len: m.size,
                matched: m.size,
            });
        }
        i = m.a_start + m.size;
        j = m.b_start + m.size;
    }
    runs
}

fn merge_threshold(middle: usize) -> f64 {
    (middle.saturating_sub(1) as f64).powf(MERGE_EXPONENT)
}

/// Absorbs short differences into the surrounding runs, left to right, looking back
/// at most two runs:
/// * `Same`, difference, `Same` becomes one `Same` run when the two outer runs are
///   together longer than `(middle - 1)^1.4`,
/// * two adjacent differences of different kinds become one `Replace` when they are
///   together longer than `(shorter - 1)^1.4`.
pub fn simplify_runs(runs: &[Run]) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs.iter() {
        out.push(*run);
        while merge_tail(&mut out) {}
    }
    out
}

fn merge_tail(out: &mut Vec<Run>) -> bool {
    let n = out.len();
    if n >= 3 {
        let (x, y, z) = (out[n - 3], out[n - 2], out[n - 1]);
        if x.kind == RunKind::Same
            && z.kind == RunKind::Same
            && y.kind != RunKind::Same
            && (x.span() + z.span()) as f64 > merge_threshold(y.span())
        {
            out.truncate(n - 3);
            out.push(x.joined(&z, RunKind::Same, x.matched + z.matched));
            return true;
        }
    }
    if n >= 2 {
        let (x, y) = (out[n - 2], out[n - 1]);
        if x.kind != RunKind::Same
            && y.kind != RunKind::Same
            && x.kind != y.kind
            && (x.span() + y.span()) as f64 > merge_threshold(x.span().min(y.span()))
        {
            out.truncate(n - 2);
            out.push(x.joined(&y, RunKind::Replace, 0));
            return true;
        }
    }
    false
}

/// The `Same` runs that count as copied text: more than 10 matched words, or more
/// matched words than each gap to the neighbouring `Same` runs, in both texts.
pub fn matched_blocks(runs: &[Run]) -> Vec<Run> {
    let same: Vec<&Run> = runs.iter().filter(|r| r.kind == RunKind::Same).collect();
    let mut kept: Vec<Run> = Vec::new();
    for (idx, run) in same.iter().enumerate() {
        let (before_a, before_b) = match idx.checked_sub(1).map(|p| same[p]) {
            Some(prev) => (run.a_start - prev.a_end(), run.b_start - prev.b_end()),
            None => (0, 0),
        };
        let (after_a, after_b) = match same.get(idx + 1) {
            Some(next) => (next.a_start - run.a_end(), next.b_start - run.b_end()),
            None => (0, 0),
        };
        let size = run.matched;
        if size > MIN_UNCONDITIONAL_BLOCK
            || (size > before_a && size > before_b && size > after_a && size > after_b)
        {
            kept.push(**run);
        }
    }
    kept
}

fn ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

fn summarize(runs: &[Run], words_a: &[&str], len_b: usize) -> Comparison {
    let kept = matched_blocks(runs);
    let matched_words: usize = kept.iter().map(|r| r.matched).sum();
    let extract = kept
        .iter()
        .map(|r| words_a[r.a_start..r.a_end()].join(" "))
        .collect::<Vec<String>>()
        .join("...");
    Comparison {
        ratio_a: ratio(matched_words, words_a.len()),
        ratio_b: ratio(matched_words, len_b),
        matched_words,
        extract,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn same(a_start: usize, b_start: usize, len: usize) -> Run {
        Run {
            kind: RunKind::Same,
            a_start,
            a_len: len,
            b_start,
            b_len: len,
            matched: len,
        }
    }

    #[test]
    fn vocabulary_is_invertible() {
        let mut v = Vocabulary::default();
        let a = v.intern("the");
        let b = v.intern("secretary");
        assert_eq!(v.intern("the"), a);
        assert_eq!(v.word(b), Some("secretary"));
        assert_eq!(v.id("secretary"), Some(b));
        assert_eq!(v.len(), 2);
        let p = PreparedText::new("the secretary shall the");
        assert_eq!(p.words(), vec!["the", "secretary", "shall", "the"]);
    }

    #[test]
    fn self_comparison() {
        let text = "the secretary shall submit a report to congress on the status of the program";
        let c = compare(text, text);
        assert_eq!(c.ratio_a, 1.0);
        assert_eq!(c.ratio_b, 1.0);
        assert_eq!(c.extract, text);
    }

    #[test]
    fn swapped_arguments_swap_ratios() {
        let base = words("w", 60);
        let mut longer = base.clone();
        longer.splice(30..30, words("x", 25));
        let a = base.join(" ");
        let b = longer.join(" ");
        let ab = compare(&a, &b);
        let ba = compare(&b, &a);
        assert_eq!(ab.ratio_a, ba.ratio_b);
        assert_eq!(ab.ratio_b, ba.ratio_a);
        assert_eq!(ab.ratio_a, 1.0);
        assert_eq!(ab.matched_words, 60);
    }

    #[test]
    fn disjoint_texts() {
        let c = compare("alpha beta gamma", "delta epsilon");
        assert_eq!(c.ratio_a, 0.0);
        assert_eq!(c.ratio_b, 0.0);
        assert_eq!(c.extract, "");
        assert_eq!(compare("", "").ratio_a, 0.0);
    }

    #[test]
    fn short_insertion_is_absorbed() {
        let runs = vec![
            same(0, 0, 20),
            Run {
                kind: RunKind::Insert,
                a_start: 20,
                a_len: 0,
                b_start: 20,
                b_len: 1,
                matched: 0,
            },
            same(20, 21, 20),
        ];
        let simplified = simplify_runs(&runs);
        assert_eq!(
            simplified,
            vec![Run {
                kind: RunKind::Same,
                a_start: 0,
                a_len: 40,
                b_start: 0,
                b_len: 41,
                matched: 40
            }]
        );
    }

    #[test]
    fn long_insertion_is_kept() {
        let runs = vec![
            same(0, 0, 5),
            Run {
                kind: RunKind::Insert,
                a_start: 5,
                a_len: 0,
                b_start: 5,
                b_len: 12,
                matched: 0,
            },
            same(5, 17, 5),
        ];
        assert_eq!(simplify_runs(&runs), runs);
    }

    #[test]
    fn one_word_substitution_becomes_one_block() {
        let mut a = words("w", 30);
        let b = a.clone();
        a[15] = "changed".to_string();
        let c = compare(&a.join(" "), &b.join(" "));
        // The delete and insert merge into a replace, then into the surrounding match.
        assert_eq!(c.matched_words, 29);
        assert!(!c.extract.contains("..."));
        assert!(c.extract.contains("changed"));
    }

    #[test]
    fn isolated_coincidences_are_dropped() {
        let runs = vec![
            same(0, 0, 2),
            Run {
                kind: RunKind::Delete,
                a_start: 2,
                a_len: 40,
                b_start: 2,
                b_len: 0,
                matched: 0,
            },
            same(42, 2, 30),
        ];
        let kept = matched_blocks(&runs);
        assert_eq!(kept, vec![same(42, 2, 30)]);
    }

    #[test]
    fn prepared_text_reuse() {
        let prepared = PreparedText::new("a b c d e f g h i j k l m");
        let first = prepared.compare_with("a b c d e f g h i j k l m");
        let second = prepared.compare_with("x y z");
        let third = prepared.compare_with("a b c d e f g h i j k l m");
        assert_eq!(first, third);
        assert_eq!(second.matched_words, 0);
        assert_eq!(prepared.word_count(), 13);
    }
}

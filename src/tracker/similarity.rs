// A shortlist of textually similar bills, to avoid aligning every pair of bills.

use legis_analysis::BillId;
use std::collections::HashMap;

use crate::tracker::*;

/// Finds the bills whose text resembles a given text.
pub trait SimilaritySearch {
    /// Up to `limit` bills that share vocabulary with `text`, most similar first.
    fn more_like_this(&self, text: &str, limit: usize) -> Vec<BillId>;
}

// A sparse vector, sorted by term.
type TermVector = Vec<(u32, f64)>;

/// TF-IDF vectors of a set of bill texts, compared by cosine similarity.
#[derive(Debug, Clone, Default)]
pub struct TermVectorIndex {
    terms: HashMap<String, u32>,
    // Number of documents in which each term appears.
    document_frequency: Vec<usize>,
    documents: Vec<(BillId, HashMap<u32, usize>)>,
    vectors: Vec<TermVector>,
}

impl TermVectorIndex {
    pub fn new() -> TermVectorIndex {
        TermVectorIndex::default()
    }

    /// Adds a bill to the index. The vectors are computed by `finish`.
    pub fn add(&mut self, id: BillId, text: &str) {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for word in text.split_whitespace() {
            let next = self.terms.len() as u32;
            let term = *self.terms.entry(word.to_string()).or_insert(next);
            if term as usize == self.document_frequency.len() {
                self.document_frequency.push(0);
            }
            *counts.entry(term).or_default() += 1;
        }
        for term in counts.keys() {
            self.document_frequency[*term as usize] += 1;
        }
        self.documents.push((id, counts));
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    fn idf(&self, term: u32) -> f64 {
        let n = self.documents.len() as f64;
        let df = self.document_frequency[term as usize] as f64;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    }

    fn weigh(&self, counts: &HashMap<u32, usize>) -> TermVector {
        let mut v: TermVector = counts
            .iter()
            .map(|(term, count)| (*term, *count as f64 * self.idf(*term)))
            .collect();
        let norm = v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|(_, w)| *w /= norm);
        }
        v.sort_by_key(|(term, _)| *term);
        v
    }

    /// Computes the vectors of all the bills added so far.
    pub fn finish(mut self) -> TermVectorIndex {
        self.vectors = self
            .documents
            .iter()
            .map(|(_, counts)| self.weigh(counts))
            .collect();
        debug!(
            "finish: {} documents, {} terms",
            self.documents.len(),
            self.terms.len()
        );
        self
    }
}

fn dot(query: &HashMap<u32, f64>, v: &TermVector) -> f64 {
    v.iter()
        .filter_map(|(term, w)| query.get(term).map(|q| q * w))
        .sum()
}

impl SimilaritySearch for TermVectorIndex {
    fn more_like_this(&self, text: &str, limit: usize) -> Vec<BillId> {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for word in text.split_whitespace() {
            // Words that no indexed bill uses cannot add to a similarity.
            if let Some(term) = self.terms.get(word) {
                *counts.entry(*term).or_default() += 1;
            }
        }
        let query: HashMap<u32, f64> = self.weigh(&counts).into_iter().collect();
        let mut scored: Vec<(f64, BillId)> = self
            .documents
            .iter()
            .zip(self.vectors.iter())
            .map(|((id, _), v)| (dot(&query, v), *id))
            .filter(|(score, _)| *score > 0.0)
            .collect();
        scored.sort_by(|(s1, id1), (s2, id2)| s2.total_cmp(s1).then(id1.cmp(id2)));
        scored.into_iter().take(limit).map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> BillId {
        s.parse().unwrap()
    }

    #[test]
    fn closest_first() {
        let mut index = TermVectorIndex::new();
        index.add(id("hr1-114"), "highway trust fund transit formula grants");
        index.add(id("hr2-114"), "highway safety grants for states");
        index.add(id("s3-114"), "veterans health care eligibility");
        let index = index.finish();
        assert_eq!(index.len(), 3);

        let found = index.more_like_this("the highway trust fund and transit grants", 10);
        assert_eq!(found, vec![id("hr1-114"), id("hr2-114")]);
        assert_eq!(
            index.more_like_this("the highway trust fund and transit grants", 1),
            vec![id("hr1-114")]
        );
        assert!(index.more_like_this("nothing in common", 10).is_empty());
    }
}

use std::collections::{HashMap, HashSet};

/// A maximal run of equal tokens: `a[a_start..a_start + size] == b[b_start..b_start + size]`.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

// Sequences shorter than this do not get the popular token treatment.
const POPULAR_MIN_LEN: usize = 200;

/// Finds matching blocks between a fixed token sequence `b` and any number of other sequences.
///
/// The blocks are found greedily: the longest common run first, then recursively on both
/// sides of it. In long sequences, tokens that occur in more than 1% of the positions
/// of `b` do not seed a match, although matches extend over them.
#[derive(Debug, Clone)]
pub struct BlockMatcher {
    b: Vec<u32>,
    // For each token that can seed a match, its positions in `b`, ascending.
    b2j: HashMap<u32, Vec<usize>>,
    popular: HashSet<u32>,
}

impl BlockMatcher {
    pub fn new(b: Vec<u32>) -> BlockMatcher {
        let mut b2j: HashMap<u32, Vec<usize>> = HashMap::new();
        for (j, tok) in b.iter().enumerate() {
            b2j.entry(*tok).or_default().push(j);
        }
        let mut popular: HashSet<u32> = HashSet::new();
        if b.len() >= POPULAR_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            for (tok, positions) in b2j.iter() {
                if positions.len() > ntest {
                    popular.insert(*tok);
                }
            }
            for tok in popular.iter() {
                b2j.remove(tok);
            }
        }
        BlockMatcher { b, b2j, popular }
    }

    pub fn b(&self) -> &[u32] {
        &self.b
    }

    pub fn num_popular(&self) -> usize {
        self.popular.len()
    }

    /// The matching blocks between `a` and the fixed sequence, ordered by position in both
    /// sequences and with adjacent blocks joined. No empty sentinel block is returned.
    pub fn matching_blocks(&self, a: &[u32]) -> Vec<MatchBlock> {
        let (la, lb) = (a.len(), self.b.len());

        // A common prefix and suffix are always part of the alignment. This is not the
        // strict longest-first order: a longer run that overlaps the edges is passed over,
        // so the blocks at the edges can differ from a plain longest-first search while
        // covering as many tokens.
        let prefix = a
            .iter()
            .zip(self.b.iter())
            .take_while(|(x, y)| x == y)
            .count();
        let suffix = a[prefix..]
            .iter()
            .rev()
            .zip(self.b[prefix..].iter().rev())
            .take_while(|(x, y)| x == y)
            .count();

        let mut found: Vec<MatchBlock> = Vec::new();
        if prefix > 0 {
            found.push(MatchBlock {
                a_start: 0,
                b_start: 0,
                size: prefix,
            });
        }
        let mut queue: Vec<(usize, usize, usize, usize)> =
            vec![(prefix, la - suffix, prefix, lb - suffix)];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            if alo >= ahi || blo >= bhi {
                continue;
            }
            let m = self.find_longest_match(a, alo, ahi, blo, bhi);
            if m.size > 0 {
                found.push(m);
                if alo < m.a_start && blo < m.b_start {
                    queue.push((alo, m.a_start, blo, m.b_start));
                }
                if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                    queue.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
                }
            }
        }
        if suffix > 0 {
            found.push(MatchBlock {
                a_start: la - suffix,
                b_start: lb - suffix,
                size: suffix,
            });
        }
        found.sort_by_key(|m| (m.a_start, m.b_start));

        let mut res: Vec<MatchBlock> = Vec::new();
        for m in found {
            match res.last_mut() {
                Some(prev)
                    if prev.a_start + prev.size == m.a_start
                        && prev.b_start + prev.size == m.b_start =>
                {
                    prev.size += m.size;
                }
                _ => res.push(m),
            }
        }
        res
    }

    // The longest block in a[alo..ahi] x b[blo..bhi], earliest in `a` then in `b` on ties,
    // then extended over popular tokens on both ends.
    fn find_longest_match(
        &self,
        a: &[u32],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> MatchBlock {
        let b = &self.b;
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);
        // j2len[j] is the length of the run ending with a[i - 1] and b[j].
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, tok) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut newj2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(tok) {
                for &j in positions.iter() {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    newj2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = newj2len;
        }

        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi && bestj + bestsize < bhi && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }
        MatchBlock {
            a_start: besti,
            b_start: bestj,
            size: bestsize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(a: &[u32], b: &[u32]) -> Vec<(usize, usize, usize)> {
        BlockMatcher::new(b.to_vec())
            .matching_blocks(a)
            .iter()
            .map(|m| (m.a_start, m.b_start, m.size))
            .collect()
    }

    #[test]
    fn identical_sequences() {
        assert_eq!(blocks(&[1, 2, 3, 4], &[1, 2, 3, 4]), vec![(0, 0, 4)]);
    }

    #[test]
    fn one_insertion() {
        assert_eq!(
            blocks(&[1, 2, 3, 9, 4, 5], &[1, 2, 3, 4, 5]),
            vec![(0, 0, 3), (4, 3, 2)]
        );
    }

    #[test]
    fn longest_block_first() {
        // The long run wins over the earlier short one.
        assert_eq!(
            blocks(&[7, 8, 1, 2, 3, 4], &[1, 2, 3, 4, 0, 7, 8]),
            vec![(2, 0, 4)]
        );
    }

    #[test]
    fn common_edges_are_kept() {
        // A longest-first search would pick the single run (3, 0, 3). The shared prefix
        // and suffix are kept instead, for the same number of tokens.
        assert_eq!(
            blocks(&[1, 2, 9, 1, 2, 3], &[1, 2, 3]),
            vec![(0, 0, 2), (5, 2, 1)]
        );
    }

    #[test]
    fn disjoint_sequences() {
        assert!(blocks(&[1, 2], &[3, 4]).is_empty());
        assert!(blocks(&[], &[3, 4]).is_empty());
        assert!(blocks(&[1], &[]).is_empty());
    }

    #[test]
    fn popular_tokens_do_not_seed_matches() {
        // Token 0 fills most of b: it is popular and cannot start a block by itself.
        let mut b: Vec<u32> = vec![0; 300];
        b[150] = 5;
        b[151] = 6;
        let m = BlockMatcher::new(b);
        assert_eq!(m.num_popular(), 1);
        let res = m.matching_blocks(&[9, 0, 5, 6, 0, 9]);
        assert_eq!(
            res,
            vec![MatchBlock {
                a_start: 1,
                b_start: 149,
                size: 4
            }]
        );
    }
}

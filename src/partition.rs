//! Splits the upper-triangular pair space `(i, j), i < j` of the active clusters into contiguous
//! row-major ranges, one per worker, each holding a near-equal share of the pairs.

/// A contiguous run of pairs in row-major order, from `start` to `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRange {
    pub start: (usize, usize),
    pub end: (usize, usize),
    len: usize,
}

impl PairRange {
    /// Number of pairs in the range. Never zero.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the pairs of the range in row-major order, given the number of active clusters
    /// the range was computed for.
    pub fn pairs(&self, n_active: usize) -> PairIter {
        PairIter {
            i: self.start.0,
            j: self.start.1,
            n_active,
            remaining: self.len,
        }
    }
}

/// Row-major iterator over the pairs of a [`PairRange`].
#[derive(Debug, Clone)]
pub struct PairIter {
    i: usize,
    j: usize,
    n_active: usize,
    remaining: usize,
}

impl Iterator for PairIter {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let pair = (self.i, self.j);
        self.remaining -= 1;
        self.j += 1;
        if self.j == self.n_active {
            self.i += 1;
            self.j = self.i + 1;
        }
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Number of unordered pairs among `n_active` clusters.
pub fn n_pairs(n_active: usize) -> usize {
    n_active * n_active.saturating_sub(1) / 2
}

/// Partitions the pairs of `n_active` clusters between `n_workers` workers.
///
/// # Parameters
/// * `n_active` - the number of currently active clusters.
/// * `n_workers` - the number of workers to share the pairs between.
///
/// # Returns
/// * Contiguous, non-empty ranges covering every pair exactly once, in row-major order. Each
///   holds `ceil(pairs / n_workers)` pairs except possibly the last. Fewer than `n_workers`
///   ranges are returned when the remaining workers would be left with nothing to scan.
pub fn partition_pairs(n_active: usize, n_workers: usize) -> Vec<PairRange> {
    let total = n_pairs(n_active);
    if total == 0 || n_workers == 0 {
        return Vec::new();
    }
    let chunk_size = total.div_ceil(n_workers);
    let n_ranges = total.div_ceil(chunk_size);

    (0..n_ranges)
        .map(|n| {
            let first = n * chunk_size;
            let last = (first + chunk_size).min(total) - 1;
            PairRange {
                start: pair_at(first, n_active),
                end: pair_at(last, n_active),
                len: last - first + 1,
            }
        })
        .collect()
}

fn pair_at(mut index: usize, n_active: usize) -> (usize, usize) {
    for i in 0..n_active {
        let row_len = n_active - 1 - i;
        if index < row_len {
            return (i, i + 1 + index);
        }
        index -= row_len;
    }
    // Callers only ask for indices below n_pairs(n_active)
    (n_active.saturating_sub(2), n_active.saturating_sub(1))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Fresh,
    Running,
    Done,
}

/// In-place swap-based permutation generator.
///
/// Yields every ordering of the seed items exactly once, in the same order as
/// the classic recursive backtracking scheme
/// `for i in l..=r { swap(l, i); recurse(l + 1); swap(l, i) }`, but driven by
/// an explicit cursor stack so the caller pulls permutations one at a time.
/// Each call to [`next_perm`](Self::next_perm) reuses the same buffer.
///
/// An empty seed yields a single empty permutation (`0! = 1`).
#[derive(Clone, Debug)]
pub struct Permutations {
    seed: Vec<usize>,
    items: Vec<usize>,
    cursors: Vec<usize>,
    last: usize,
    state: State,
}

impl Permutations {
    pub fn new(items: Vec<usize>) -> Self {
        let last = items.len().saturating_sub(1);
        Self {
            seed: items.clone(),
            cursors: (0..last).collect(),
            items,
            last,
            state: State::Fresh,
        }
    }

    /// Permutations of `1..n`, the non-origin nodes of an `n`-node instance.
    pub fn non_origin(n: usize) -> Self {
        Self::new((1..n.max(1)).collect())
    }

    pub fn len_items(&self) -> usize {
        self.seed.len()
    }

    /// Number of permutations a full pass yields, `None` on overflow.
    pub fn count(&self) -> Option<u64> {
        (1..=self.seed.len() as u64).try_fold(1_u64, |acc, k| acc.checked_mul(k))
    }

    /// Restarts the sequence from the seed ordering.
    pub fn reset(&mut self) {
        self.items.copy_from_slice(&self.seed);
        for (level, cursor) in self.cursors.iter_mut().enumerate() {
            *cursor = level;
        }
        self.state = State::Fresh;
    }

    pub fn next_perm(&mut self) -> Option<&[usize]> {
        match self.state {
            State::Done => None,
            State::Fresh => {
                self.state = State::Running;
                Some(&self.items)
            }
            State::Running => {
                if self.advance() {
                    Some(&self.items)
                } else {
                    self.state = State::Done;
                    None
                }
            }
        }
    }

    /// Visits every remaining permutation.
    pub fn for_each(&mut self, mut visit: impl FnMut(&[usize])) {
        while let Some(perm) = self.next_perm() {
            visit(perm);
        }
    }

    // Undo the swap of the deepest level that can still move, move it one
    // step and reset every level below it.
    fn advance(&mut self) -> bool {
        let mut level = self.last;
        while level > 0 {
            level -= 1;
            let cursor = self.cursors[level];
            self.items.swap(level, cursor);

            let next = cursor + 1;
            if next <= self.last {
                self.cursors[level] = next;
                self.items.swap(level, next);
                for deeper in (level + 1)..self.last {
                    self.cursors[deeper] = deeper;
                }
                return true;
            }
            self.cursors[level] = level;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Permutations;

    fn collect(items: Vec<usize>) -> Vec<Vec<usize>> {
        let mut perms = Permutations::new(items);
        let mut out = Vec::new();
        perms.for_each(|p| out.push(p.to_vec()));
        out
    }

    fn recursive_reference(arr: &mut Vec<usize>, l: usize, out: &mut Vec<Vec<usize>>) {
        if arr.len() <= 1 || l == arr.len() - 1 {
            out.push(arr.clone());
            return;
        }
        for i in l..arr.len() {
            arr.swap(l, i);
            recursive_reference(arr, l + 1, out);
            arr.swap(l, i);
        }
    }

    #[test]
    fn empty_seed_yields_one_empty_permutation() {
        assert_eq!(collect(vec![]), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn single_item_yields_itself_once() {
        assert_eq!(collect(vec![7]), vec![vec![7]]);
    }

    #[test]
    fn three_items_follow_swap_backtracking_order() {
        assert_eq!(
            collect(vec![1, 2, 3]),
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 2, 1],
                vec![3, 1, 2],
            ]
        );
    }

    #[test]
    fn order_matches_recursive_scheme_up_to_six_items() {
        for k in 0..=6 {
            let seed: Vec<usize> = (1..=k).collect();
            let mut expected = Vec::new();
            recursive_reference(&mut seed.clone(), 0, &mut expected);
            assert_eq!(collect(seed), expected, "k={k}");
        }
    }

    #[test]
    fn yields_k_factorial_distinct_permutations() {
        let perms = collect((0..7).collect());
        assert_eq!(perms.len(), 5040);
        let unique: HashSet<Vec<usize>> = perms.into_iter().collect();
        assert_eq!(unique.len(), 5040);
        assert_eq!(Permutations::new((0..7).collect()).count(), Some(5040));
    }

    #[test]
    fn exhausted_generator_stays_exhausted_and_restores_seed() {
        let mut perms = Permutations::new(vec![4, 5, 6, 7]);
        while perms.next_perm().is_some() {}
        assert!(perms.next_perm().is_none());
        assert_eq!(perms.items, vec![4, 5, 6, 7]);
    }

    #[test]
    fn reset_restarts_mid_sequence() {
        let mut perms = Permutations::new(vec![1, 2, 3]);
        perms.next_perm();
        perms.next_perm();
        perms.next_perm();
        perms.reset();
        assert_eq!(perms.next_perm(), Some(&[1, 2, 3][..]));
        assert_eq!(perms.next_perm(), Some(&[1, 3, 2][..]));
    }

    #[test]
    fn non_origin_skips_index_zero() {
        assert_eq!(Permutations::non_origin(4).len_items(), 3);
        assert_eq!(Permutations::non_origin(1).len_items(), 0);
        assert_eq!(Permutations::non_origin(0).len_items(), 0);
        assert_eq!(collect((1..3).collect()), vec![vec![1, 2], vec![2, 1]]);
    }
}

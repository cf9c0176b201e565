//! Lazy k-subset enumeration.
//!
//! [`Combinations`] walks every `k`-element subset of a source slice in lexicographic order of
//! source indices. State is a stack of chosen indices plus the chosen items themselves, both
//! bounded by `k`, so stepping never allocates. Each subset is lent out as a slice that stays
//! valid until the next call.

/// Number of `k`-subsets of an `n`-set.
pub const fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = if k > n - k { n - k } else { k };
    let mut result = 1usize;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

#[derive(Debug, Clone)]
pub struct Combinations<'a, T: Copy> {
    source: &'a [T],
    size: usize,
    chosen: Vec<T>,
    stack: Vec<usize>,
    cursor: usize,
    yielded: bool,
    exhausted: bool,
}

impl<'a, T: Copy> Combinations<'a, T> {
    /// Enumerates subsets of `size` items. A `size` larger than the source yields nothing.
    pub fn new(source: &'a [T], size: usize) -> Self {
        Self {
            source,
            size,
            chosen: Vec::with_capacity(size),
            stack: Vec::with_capacity(size),
            cursor: 0,
            yielded: false,
            exhausted: false,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of subsets a full pass produces.
    pub fn len(&self) -> usize {
        binomial(self.source.len(), self.size)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewinds to the first subset.
    pub fn reset(&mut self) {
        self.chosen.clear();
        self.stack.clear();
        self.cursor = 0;
        self.yielded = false;
        self.exhausted = false;
    }

    /// Advances to the next subset, or returns `None` once every subset has been produced.
    pub fn next_combination(&mut self) -> Option<&[T]> {
        if self.exhausted {
            return None;
        }
        if self.yielded {
            self.yielded = false;
            if !self.backtrack() {
                self.exhausted = true;
                return None;
            }
        }

        while self.chosen.len() != self.size {
            if self.cursor < self.source.len() {
                self.chosen.push(self.source[self.cursor]);
                self.stack.push(self.cursor);
                self.cursor += 1;
            } else if !self.backtrack() {
                self.exhausted = true;
                return None;
            }
        }

        self.yielded = true;
        Some(&self.chosen)
    }

    /// Drops the newest choice and resumes after its index. False when nothing is left to drop.
    fn backtrack(&mut self) -> bool {
        match self.stack.pop() {
            Some(index) => {
                self.chosen.pop();
                self.cursor = index + 1;
                true
            }
            None => false,
        }
    }
}

use serde::{Serialize, Serializer};

const WORD_BITS: usize = 64;

/// Growable bitset of source text-element indices contributing to a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSet {
    words: Vec<u64>,
}

impl ElementSet {
    pub fn new() -> Self {
        ElementSet::default()
    }

    pub fn insert(&mut self, idx: usize) {
        let word = idx / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (idx % WORD_BITS);
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.words
            .get(idx / WORD_BITS)
            .is_some_and(|w| w & (1u64 << (idx % WORD_BITS)) != 0)
    }

    pub fn union_with(&mut self, other: &ElementSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= theirs;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            (0..WORD_BITS)
                .filter(move |bit| w & (1u64 << bit) != 0)
                .map(move |bit| i * WORD_BITS + bit)
        })
    }
}

impl Serialize for ElementSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains_across_words() {
        let mut s = ElementSet::new();
        s.insert(3);
        s.insert(130);
        assert!(s.contains(3));
        assert!(s.contains(130));
        assert!(!s.contains(4));
        assert!(!s.contains(1000));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn union_grows_to_longer_operand() {
        let mut a = ElementSet::new();
        a.insert(1);
        let mut b = ElementSet::new();
        b.insert(70);
        b.insert(1);
        a.union_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 70]);
    }

    #[test]
    fn empty_set() {
        let s = ElementSet::new();
        assert!(s.is_empty());
        assert_eq!(s.iter().count(), 0);
    }
}

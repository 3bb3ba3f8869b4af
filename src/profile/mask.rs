/// Fixed-length boolean mask over the index space of a circular profile.
///
/// Rule evaluation carries the surviving candidate indices through one of
/// these; the mask has the same length as the profile it was built against
/// and all combining operations require equal lengths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexMask {
    bits: Vec<bool>,
}

impl IndexMask {
    /// Create a mask of `len` entries, all set to `value`.
    pub fn new(len: usize, value: bool) -> Self {
        Self {
            bits: vec![value; len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        self.bits[index] = value;
    }

    /// Set an entry addressed by a possibly out-of-range index, wrapping
    /// into `[0, len)`. Used by rules that widen candidates across the seam.
    #[inline]
    pub fn set_wrapped(&mut self, index: isize, value: bool) {
        let len = self.bits.len() as isize;
        let wrapped = index.rem_euclid(len) as usize;
        self.bits[wrapped] = value;
    }

    /// Intersection with another mask of the same length.
    pub fn and(&self, other: &IndexMask) -> IndexMask {
        assert_eq!(self.bits.len(), other.bits.len(), "mask length mismatch");
        IndexMask {
            bits: self
                .bits
                .iter()
                .zip(&other.bits)
                .map(|(a, b)| *a && *b)
                .collect(),
        }
    }

    /// Complement over the full index range.
    pub fn invert(&self) -> IndexMask {
        IndexMask {
            bits: self.bits.iter().map(|b| !*b).collect(),
        }
    }

    /// Number of set entries.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// True if any entry is set.
    pub fn any(&self) -> bool {
        self.bits.iter().any(|b| *b)
    }

    /// Lowest set index, if any.
    pub fn first_true(&self) -> Option<usize> {
        self.bits.iter().position(|b| *b)
    }

    /// Highest set index, if any.
    pub fn last_true(&self) -> Option<usize> {
        self.bits.iter().rposition(|b| *b)
    }

    /// Iterator over set indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.then_some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_and_invert() {
        let mut a = IndexMask::new(5, false);
        a.set(1, true);
        a.set(3, true);
        let mut b = IndexMask::new(5, false);
        b.set(3, true);
        b.set(4, true);

        let both = a.and(&b);
        assert_eq!(both.indices().collect::<Vec<_>>(), vec![3]);

        let inv = both.invert();
        assert_eq!(inv.count(), 4);
        assert!(!inv.get(3));
    }

    #[test]
    fn first_and_last_true() {
        let mut m = IndexMask::new(6, false);
        assert_eq!(m.first_true(), None);
        m.set(2, true);
        m.set(4, true);
        assert_eq!(m.first_true(), Some(2));
        assert_eq!(m.last_true(), Some(4));
    }

    #[test]
    fn set_wrapped_handles_negative_and_overflow() {
        let mut m = IndexMask::new(4, false);
        m.set_wrapped(-1, true);
        m.set_wrapped(5, true);
        assert!(m.get(3));
        assert!(m.get(1));
    }
}

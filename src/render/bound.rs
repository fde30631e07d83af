/// An iterator that yields at most a fixed amount of items, and then
/// reports whether the underlying iterator had more.
///
/// A fresh [`Bounded`] is created for each loop, so the limit applies per
/// loop rather than across a render.
#[derive(Debug, Clone)]
pub struct Bounded<I> {
    inner: I,
    remaining: usize,
    truncated: bool,
}

impl<I> Bounded<I>
where
    I: Iterator,
{
    /// Wrap the iterator, yielding no more than `limit` items.
    pub fn new(inner: I, limit: usize) -> Self {
        Self {
            inner,
            remaining: limit,
            truncated: false,
        }
    }

    /// Return true if the limit was reached while the underlying iterator
    /// still had items.
    ///
    /// Only meaningful after the [`Bounded`] iterator has returned `None`.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl<I> Iterator for Bounded<I>
where
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if self.remaining == 0 {
            self.truncated = true;
            return None;
        }
        self.remaining -= 1;

        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::Bounded;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_caps_long_iterator() {
        let mut bounded = Bounded::new(0..1000, 50);
        let taken: Vec<_> = bounded.by_ref().collect();

        assert_eq!(taken, (0..50).collect::<Vec<_>>());
        assert!(bounded.is_truncated());
    }

    #[test]
    fn test_short_iterator() {
        let mut bounded = Bounded::new(0..3, 50);

        assert_eq!(bounded.by_ref().count(), 3);
        assert!(!bounded.is_truncated());
    }

    #[test]
    fn test_exact_length_is_not_truncated() {
        let mut bounded = Bounded::new(0..5, 5);

        assert_eq!(bounded.by_ref().count(), 5);
        assert!(!bounded.is_truncated());
    }

    #[test]
    fn test_zero_limit() {
        assert_eq!(Bounded::new("abc".chars(), 0).next(), None);
    }
}

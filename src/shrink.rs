//! Lazy shrink-candidate sequences and the algebra for composing them.
//!
//! A [`Shrinks`] is a finite, forward-only sequence of candidates assumed
//! smaller than the value they were derived from. The shrink driver tests
//! candidates in order and, on the first still-failing one, restarts from
//! that candidate's own sequence (greedy local-minimum search). Sequences are
//! consumed once; they cannot be rewound.

/// A lazily produced sequence of smaller candidate values.
pub struct Shrinks<T> {
    iter: Box<dyn Iterator<Item = T>>,
}

impl<T> Iterator for Shrinks<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.iter.next()
    }
}

impl<T: 'static> Shrinks<T> {
    /// Wrap an arbitrary iterator as a shrink sequence.
    pub fn new(iter: impl Iterator<Item = T> + 'static) -> Self {
        Self {
            iter: Box::new(iter),
        }
    }

    /// The empty sequence, the universal default.
    pub fn none() -> Self {
        Self::new(std::iter::empty())
    }

    /// A fixed literal candidate list, for small enumerable domains.
    pub fn constant(candidates: Vec<T>) -> Self {
        Self::new(candidates.into_iter())
    }

    /// Concatenation: every candidate of `self` precedes any of `next`.
    ///
    /// Used to try cheap moves (truncation) before expensive per-element
    /// moves.
    pub fn sequentially(self, next: Shrinks<T>) -> Self {
        Self::new(self.iter.chain(next.iter))
    }

    /// Lazily transform each candidate, lifting a component's sequence into
    /// the composite's type.
    pub fn map<U: 'static>(self, f: impl FnMut(T) -> U + 'static) -> Shrinks<U> {
        Shrinks::new(self.iter.map(f))
    }
}

impl<T> std::fmt::Debug for Shrinks<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Shrinks(..)")
    }
}

/// For each position in turn, exhaust that position's candidates via
/// `element_shrink`, substituting each into an otherwise-unchanged copy.
///
/// Every candidate differs from the source container in exactly one
/// position; the container's length never changes.
pub fn each_element<C, T, F>(container: C, mut element_shrink: F) -> Shrinks<C>
where
    C: IntoIterator<Item = T> + FromIterator<T> + 'static,
    T: Clone + 'static,
    F: FnMut(&T) -> Shrinks<T> + 'static,
{
    let elements: Vec<T> = container.into_iter().collect();
    let positions = 0..elements.len();
    Shrinks::new(positions.flat_map(move |index| {
        let snapshot = elements.clone();
        element_shrink(&snapshot[index]).map(move |candidate| {
            let mut copy = snapshot.clone();
            copy[index] = candidate;
            copy.into_iter().collect::<C>()
        })
    }))
}

/// Candidates with contiguous spans removed, largest spans first.
///
/// The first candidate is always the empty container (the whole span
/// removed); span length then decreases, with start positions tried left to
/// right within each length.
pub fn remove_chunks<C, T>(container: C) -> Shrinks<C>
where
    C: IntoIterator<Item = T> + FromIterator<T> + 'static,
    T: Clone + 'static,
{
    let elements: Vec<T> = container.into_iter().collect();
    let total = elements.len();
    Shrinks::new((1..=total).rev().flat_map(move |span| {
        let snapshot = elements.clone();
        (0..=total - span).map(move |start| {
            snapshot
                .iter()
                .enumerate()
                .filter(|(i, _)| *i < start || *i >= start + span)
                .map(|(_, element)| element.clone())
                .collect::<C>()
        })
    }))
}

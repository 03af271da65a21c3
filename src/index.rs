//! A per-chromosome index of feature intervals.

use std::collections::HashMap;

use crate::feature::Attributes;

pub mod builder;

pub use builder::Builder;

/// How the candidate feature for a coordinate is chosen from the sorted
/// starts of a chromosome.
///
/// Whichever strategy is used, the candidate is only reported if it actually
/// contains the coordinate.
///
/// The default, [`SearchStrategy::Preceding`], differs from the lookup of
/// earlier versions of this tool, which is kept as
/// [`SearchStrategy::Leftmost`]. With the default, any coordinate inside a
/// feature is found; with `Leftmost`, only coordinates on a feature start are.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SearchStrategy {
    /// The candidate is the feature with the greatest start that is less than
    /// or equal to the coordinate.
    #[default]
    Preceding,

    /// The candidate is the feature at the leftmost insertion point of the
    /// coordinate, i.e. the feature with the smallest start that is greater
    /// than or equal to the coordinate.
    ///
    /// Because that start is never less than the coordinate, only coordinates
    /// that fall exactly on a feature start can be found this way. This
    /// reproduces the behavior of earlier versions of this tool.
    Leftmost,
}

/// The end position and attributes of a feature stored in the index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    /// The last position of the feature.
    end: u64,
    /// The attribute column of the feature.
    attributes: Attributes,
}

impl Entry {
    /// Creates a new entry.
    pub fn new(end: u64, attributes: Attributes) -> Self {
        Self { end, attributes }
    }

    /// Gets the end position.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Gets the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// The features of a single chromosome.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChromosomeIndex {
    /// The features, keyed by their start position.
    features: HashMap<u64, Entry>,
    /// The keys of `features` in ascending order.
    starts: Vec<u64>,
}

impl ChromosomeIndex {
    /// Freezes a start-keyed map of features into an index.
    fn new(features: HashMap<u64, Entry>) -> Self {
        let mut starts = features.keys().copied().collect::<Vec<_>>();
        starts.sort_unstable();

        Self { features, starts }
    }

    /// Gets the distinct feature starts in ascending order.
    pub fn starts(&self) -> &[u64] {
        &self.starts
    }

    /// Gets the feature that starts at `start`.
    pub fn get(&self, start: u64) -> Option<&Entry> {
        self.features.get(&start)
    }

    /// Gets the number of features.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Returns whether the chromosome has no features.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Gets the candidate start for `coordinate` under `strategy`.
    ///
    /// Returns [`None`] when the search runs off either end of the sorted
    /// starts.
    pub fn candidate(&self, coordinate: u64, strategy: SearchStrategy) -> Option<u64> {
        match strategy {
            SearchStrategy::Preceding => {
                let index = self.starts.partition_point(|start| *start <= coordinate);
                index.checked_sub(1).map(|i| self.starts[i])
            }
            SearchStrategy::Leftmost => {
                let index = self.starts.partition_point(|start| *start < coordinate);
                self.starts.get(index).copied()
            }
        }
    }

    /// Finds the feature containing `coordinate`, returning its start and
    /// entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::feature;
    /// use gtfpos::index;
    /// use gtfpos::index::SearchStrategy;
    ///
    /// let data = b"chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";";
    /// let reader = feature::Reader::new(&data[..]);
    /// let index = index::Builder::default().try_build_from(reader)?;
    ///
    /// let chr1 = index.get("chr1").unwrap();
    /// let (start, entry) = chr1.find(150, SearchStrategy::Preceding).unwrap();
    /// assert_eq!(start, 100);
    /// assert_eq!(entry.end(), 200);
    ///
    /// assert!(chr1.find(250, SearchStrategy::Preceding).is_none());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn find(&self, coordinate: u64, strategy: SearchStrategy) -> Option<(u64, &Entry)> {
        let start = self.candidate(coordinate, strategy)?;
        let entry = self.features.get(&start)?;

        if start <= coordinate && coordinate <= entry.end {
            Some((start, entry))
        } else {
            None
        }
    }
}

/// An index of features for every chromosome in a GTF file.
///
/// A [`GenomeIndex`] cannot be modified once built. Generally, you will want
/// to use a [`builder::Builder`] to construct one of these.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GenomeIndex {
    /// The index for each chromosome.
    inner: HashMap<String, ChromosomeIndex>,
}

impl GenomeIndex {
    /// Gets the index for `chromosome`.
    pub fn get(&self, chromosome: &str) -> Option<&ChromosomeIndex> {
        self.inner.get(chromosome)
    }

    /// Returns whether `chromosome` has any features.
    pub fn contains(&self, chromosome: &str) -> bool {
        self.inner.contains_key(chromosome)
    }

    /// Iterates over the indexed chromosome names in no particular order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.keys().map(String::as_str)
    }

    /// Gets the number of chromosomes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether the index has no chromosomes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Gets the total number of features across all chromosomes.
    pub fn num_features(&self) -> usize {
        self.inner.values().map(ChromosomeIndex::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chromosome(features: &[(u64, u64, &str)]) -> ChromosomeIndex {
        ChromosomeIndex::new(
            features
                .iter()
                .map(|(start, end, attributes)| (*start, Entry::new(*end, (*attributes).into())))
                .collect(),
        )
    }

    #[test]
    fn test_starts_are_sorted() {
        let index = chromosome(&[(300, 400, "c"), (100, 200, "a"), (150, 160, "b")]);
        assert_eq!(index.starts(), &[100, 150, 300]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(150).map(Entry::end), Some(160));
    }

    #[test]
    fn test_default_strategy_is_preceding() {
        assert_eq!(SearchStrategy::default(), SearchStrategy::Preceding);
    }

    #[test]
    fn test_preceding_candidate() {
        let index = chromosome(&[(100, 200, "a"), (300, 400, "b")]);

        assert_eq!(index.candidate(50, SearchStrategy::Preceding), None);
        assert_eq!(index.candidate(100, SearchStrategy::Preceding), Some(100));
        assert_eq!(index.candidate(250, SearchStrategy::Preceding), Some(100));
        assert_eq!(index.candidate(300, SearchStrategy::Preceding), Some(300));
        assert_eq!(index.candidate(1000, SearchStrategy::Preceding), Some(300));
    }

    #[test]
    fn test_leftmost_candidate() {
        let index = chromosome(&[(100, 200, "a"), (300, 400, "b")]);

        assert_eq!(index.candidate(50, SearchStrategy::Leftmost), Some(100));
        assert_eq!(index.candidate(100, SearchStrategy::Leftmost), Some(100));
        assert_eq!(index.candidate(250, SearchStrategy::Leftmost), Some(300));
        assert_eq!(index.candidate(300, SearchStrategy::Leftmost), Some(300));
        assert_eq!(index.candidate(1000, SearchStrategy::Leftmost), None);
    }

    #[test]
    fn test_find_contained_coordinates() {
        let index = chromosome(&[(100, 200, "a"), (300, 400, "b")]);

        for coordinate in [100, 150, 200] {
            let (start, _) = index.find(coordinate, SearchStrategy::Preceding).unwrap();
            assert_eq!(start, 100);
        }

        let (start, entry) = index.find(400, SearchStrategy::Preceding).unwrap();
        assert_eq!(start, 300);
        assert_eq!(entry.attributes().as_str(), "b");
    }

    #[test]
    fn test_find_misses() {
        let index = chromosome(&[(100, 200, "a"), (300, 400, "b")]);

        for strategy in [SearchStrategy::Preceding, SearchStrategy::Leftmost] {
            assert!(index.find(99, strategy).is_none());
            assert!(index.find(201, strategy).is_none());
            assert!(index.find(299, strategy).is_none());
            assert!(index.find(401, strategy).is_none());
        }
    }

    #[test]
    fn test_leftmost_only_finds_exact_starts() {
        let index = chromosome(&[(100, 200, "a"), (300, 400, "b")]);

        assert_eq!(
            index.find(100, SearchStrategy::Leftmost).map(|(s, _)| s),
            Some(100)
        );
        assert_eq!(
            index.find(300, SearchStrategy::Leftmost).map(|(s, _)| s),
            Some(300)
        );
        assert!(index.find(150, SearchStrategy::Leftmost).is_none());
    }

    #[test]
    fn test_nested_features_resolve_to_the_closest_start() {
        // 150 lies in both features; the later start wins.
        let index = chromosome(&[(100, 500, "outer"), (120, 160, "inner")]);
        let (start, _) = index.find(150, SearchStrategy::Preceding).unwrap();
        assert_eq!(start, 120);

        // 170 lies in the outer feature only, but the inner one is the
        // candidate and does not contain it.
        assert!(index.find(170, SearchStrategy::Preceding).is_none());
    }

    #[test]
    fn test_empty_chromosome() {
        let index = chromosome(&[]);
        assert!(index.is_empty());
        assert!(index.find(1, SearchStrategy::Preceding).is_none());
        assert!(index.find(1, SearchStrategy::Leftmost).is_none());
    }
}

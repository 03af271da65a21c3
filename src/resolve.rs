//! Resolving query coordinates onto the features of a [`GenomeIndex`].

use crate::index::ChromosomeIndex;
use crate::index::Entry;
use crate::index::GenomeIndex;
use crate::index::SearchStrategy;

/// An error related to resolving a single coordinate.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The coordinate lies within a feature, but no name could be extracted
    /// from the feature's attributes.
    MalformedAnnotation {
        /// The chromosome.
        chromosome: String,
        /// The query coordinate.
        coordinate: u64,
        /// The start of the containing feature.
        start: u64,
        /// The raw attribute text of the containing feature.
        attributes: String,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedAnnotation {
                chromosome,
                coordinate,
                start,
                attributes,
            } => write!(
                f,
                "malformed annotation: coordinate {} on {} falls in the feature starting at {}, \
                 but no name could be found in its attributes: {}",
                coordinate, chromosome, start, attributes
            ),
        }
    }
}

impl std::error::Error for Error {}

/// The outcome of resolving one coordinate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// The coordinate lies within the named feature.
    Found(String),
    /// The chromosome is indexed, but the coordinate lies within no feature.
    NotFound,
    /// The chromosome does not occur in the index.
    UnknownChromosome,
}

/// Where the name reported for a feature comes from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum NameSource {
    /// The second word of the first attribute segment, quotes removed (see
    /// [`Attributes::display_name()`](crate::feature::Attributes::display_name)).
    #[default]
    FirstToken,
    /// The value of the named attribute tag, quotes removed.
    Tag(String),
}

impl NameSource {
    /// Extracts the name of a feature.
    fn name_of(&self, entry: &Entry) -> Option<String> {
        match self {
            NameSource::FirstToken => entry.attributes().display_name(),
            NameSource::Tag(tag) => entry.attributes().get(tag),
        }
    }
}

/// Resolves coordinates against a borrowed [`GenomeIndex`].
#[derive(Debug)]
pub struct Resolver<'a> {
    /// The index.
    index: &'a GenomeIndex,
    /// The search strategy.
    strategy: SearchStrategy,
    /// The source of feature names.
    names: NameSource,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver with the default search strategy and name source.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::resolve::Resolution;
    /// use gtfpos::resolve::Resolver;
    ///
    /// let data = b"chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";  ";
    /// let reader = gtfpos::feature::Reader::new(&data[..]);
    /// let index = gtfpos::index::Builder::default().try_build_from(reader)?;
    ///
    /// let resolver = Resolver::new(&index);
    /// assert_eq!(resolver.resolve("chr1", 150)?, Resolution::Found(String::from("ABC")));
    /// assert_eq!(resolver.resolve("chr1", 250)?, Resolution::NotFound);
    /// assert_eq!(resolver.resolve("chr2", 10)?, Resolution::UnknownChromosome);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(index: &'a GenomeIndex) -> Self {
        Self {
            index,
            strategy: SearchStrategy::default(),
            names: NameSource::default(),
        }
    }

    /// Sets the search strategy.
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the source of feature names.
    pub fn with_names(mut self, names: NameSource) -> Self {
        self.names = names;
        self
    }

    /// Gets the index.
    pub fn index(&self) -> &'a GenomeIndex {
        self.index
    }

    /// Gets the search strategy.
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Resolves a single coordinate on `chromosome`.
    pub fn resolve(&self, chromosome: &str, coordinate: u64) -> Result<Resolution, Error> {
        let chromosome_index = match self.index.get(chromosome) {
            Some(chromosome_index) => chromosome_index,
            None => return Ok(Resolution::UnknownChromosome),
        };

        match self.name_at(chromosome, chromosome_index, coordinate)? {
            Some(name) => Ok(Resolution::Found(name)),
            None => Ok(Resolution::NotFound),
        }
    }

    /// Resolves every coordinate in `coordinates` on `chromosome`.
    ///
    /// Returns [`None`] if the chromosome does not occur in the index, so the
    /// caller can report it once rather than once per coordinate. Otherwise
    /// each coordinate is paired with the name of the feature containing it,
    /// or [`None`] if no feature does.
    pub fn resolve_all<I>(
        &self,
        chromosome: &str,
        coordinates: I,
    ) -> Option<Vec<(u64, Result<Option<String>, Error>)>>
    where
        I: IntoIterator<Item = u64>,
    {
        let chromosome_index = self.index.get(chromosome)?;

        Some(
            coordinates
                .into_iter()
                .map(|coordinate| {
                    (
                        coordinate,
                        self.name_at(chromosome, chromosome_index, coordinate),
                    )
                })
                .collect(),
        )
    }

    /// Gets the name of the feature on `chromosome_index` that contains
    /// `coordinate`, if any.
    fn name_at(
        &self,
        chromosome: &str,
        chromosome_index: &ChromosomeIndex,
        coordinate: u64,
    ) -> Result<Option<String>, Error> {
        let (start, entry) = match chromosome_index.find(coordinate, self.strategy) {
            Some(found) => found,
            None => return Ok(None),
        };

        match self.names.name_of(entry) {
            Some(name) => Ok(Some(name)),
            None => Err(Error::MalformedAnnotation {
                chromosome: chromosome.into(),
                coordinate,
                start,
                attributes: entry.attributes().as_str().into(),
            }),
        }
    }
}

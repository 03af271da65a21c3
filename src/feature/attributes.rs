//! The free-form attribute column of a feature record.

/// The delimiter between tag/value pairs.
const PAIR_DELIMITER: char = ';';

/// The character stripped from names and values.
const QUOTE: char = '"';

/// The attribute column of a feature record.
///
/// The text is kept verbatim. A GTF attribute column is a list of `tag value`
/// pairs separated by semicolons, e.g. `gene_id "ABC"; gene_name "abc";`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Attributes(String);

impl Attributes {
    /// Gets the raw attribute text.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::feature::Attributes;
    ///
    /// let attributes = Attributes::from(r#"gene_id "ABC";"#);
    /// assert_eq!(attributes.as_str(), r#"gene_id "ABC";"#);
    /// ```
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Gets the display name of the feature.
    ///
    /// This is the second whitespace-delimited word of the first
    /// semicolon-delimited segment with every `"` removed, which for a
    /// well-formed GTF line is the value of the first tag. Returns [`None`] if
    /// the first segment has fewer than two words.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::feature::Attributes;
    ///
    /// let attributes = Attributes::from(r#"gene_id "ABC"; transcript_id "ABC.1";"#);
    /// assert_eq!(attributes.display_name(), Some(String::from("ABC")));
    ///
    /// let attributes = Attributes::from("gene_id; transcript_id \"ABC.1\";");
    /// assert_eq!(attributes.display_name(), None);
    /// ```
    pub fn display_name(&self) -> Option<String> {
        let segment = self.0.split(PAIR_DELIMITER).next()?;
        let word = segment.split_whitespace().nth(1)?;
        Some(word.replace(QUOTE, ""))
    }

    /// Iterates over the `(tag, value)` pairs of the attribute column.
    ///
    /// Empty segments are skipped, as are segments with a tag but no value.
    /// Values keep their quotes.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0
            .split(PAIR_DELIMITER)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .filter_map(|segment| segment.split_once(char::is_whitespace))
            .map(|(tag, value)| (tag, value.trim()))
    }

    /// Gets the value of the first pair with the specified `tag`, with every
    /// `"` removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::feature::Attributes;
    ///
    /// let attributes = Attributes::from(r#"gene_id "ABC"; gene_name "abc";"#);
    /// assert_eq!(attributes.get("gene_name"), Some(String::from("abc")));
    /// assert_eq!(attributes.get("gene_type"), None);
    /// ```
    pub fn get(&self, tag: &str) -> Option<String> {
        self.pairs()
            .find(|(t, _)| *t == tag)
            .map(|(_, value)| value.replace(QUOTE, ""))
    }
}

impl From<&str> for Attributes {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for Attributes {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

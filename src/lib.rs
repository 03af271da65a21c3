//! `gtfpos` is a crate for resolving genomic positions onto the features of a
//! GTF (GFF version 2) file.
//!
//! Given a list of `chromosome<TAB>coordinate` positions (for example, variant
//! calls) and a GTF file, the crate reports, for each position that falls
//! inside an annotated feature, the name of that feature.
//!
//! ## Building an index
//!
//! Feature records are read with a [`feature::Reader`] and accumulated into an
//! [`index::Builder`]. Building the index freezes it: each chromosome holds its
//! features keyed by start position along with the distinct starts in
//! ascending order, and nothing can be added afterwards. When several records
//! share a chromosome and start, the last one read wins.
//!
//! ## Resolving positions
//!
//! A [`resolve::Resolver`] borrows the index and, for each coordinate, binary
//! searches the sorted starts of its chromosome for a candidate feature and
//! checks that the coordinate lies within `start..=end`. Each query costs a
//! single binary search. How the candidate is picked is controlled by
//! [`index::SearchStrategy`].
//!
//! Queries are usually read with a [`position::Reader`] and grouped into
//! [`position::Queries`], which collapses duplicates, and then handed to
//! [`report::run()`] to write the results.
//!
//! ```
//! use gtfpos::index::Builder;
//! use gtfpos::resolve::Resolution;
//! use gtfpos::resolve::Resolver;
//!
//! let data = b"chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";";
//! let reader = gtfpos::feature::Reader::new(&data[..]);
//! let index = Builder::default().try_build_from(reader)?;
//!
//! let resolver = Resolver::new(&index);
//! assert_eq!(resolver.resolve("chr1", 150)?, Resolution::Found(String::from("ABC")));
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod core;
pub mod feature;
pub mod index;
pub mod position;
pub mod reader;
pub mod report;
pub mod resolve;

pub use index::GenomeIndex;
pub use resolve::Resolver;

//! # chord_namer
//!
//! Name musical chords from a set of note names. Every distinct pitch class
//! is tried as the root, and the resulting names are ranked so that the
//! simplest reading comes first.
//!
//! ## Example
//! ```rust
//! use chord_namer::{Accidental, ChordNamer};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Build a namer
//!     let namer = ChordNamer::builder()
//!         .preferred_accidental(Accidental::Flat)
//!         .rootless(true)
//!         .build();
//!
//!     // 2) Name a voicing, bass note first
//!     let chord = namer.name("E G C Bb")?;
//!
//!     // 3) Simplest name first
//!     for candidate in chord.candidates() {
//!         println!("{} (ranking {})", candidate.name, candidate.ranking);
//!     }
//!     assert_eq!(chord.best(), Some("C7/E"));
//!
//!     Ok(())
//! }
//! # run().unwrap();
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Chord naming API.
pub use chord_namer::{
    chord_quality, name_chord, Candidate, Chord, ChordNamer, ChordNamerBuilder, Quality,
};

/// Interval analysis.
pub use interval::{interval_table, named_intervals, InputError, Interval};

/// Notes and spelling.
pub use note::{dedupe, unique_indexes, Accidental, Note, NoteError};

/// Chord naming module.
pub mod chord_namer;

/// Interval analysis module.
pub mod interval;

/// Note model module.
pub mod note;

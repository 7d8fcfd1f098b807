//! Interval
//!
//! Semitone distances between the notes of a voicing and the context-dependent
//! names of those distances.
//!
//! The base naming, by distance from the root:
//!
//! ```text
//!  0 1     3 b3    6 b5    9 6
//!  1 b9    4 3     7 5    10 b7
//!  2 9     5 11    8 #5   11 7
//! ```
//!
//! [`interval_table`] then renames some entries depending on which other
//! distances are present (`#9`, `#11`, `b13`, `13`, `4`, `2`, `bb7`, ...).

use log::trace;
use thiserror::Error;

use crate::note::{self, Accidental, Note, NoteError, SEMITONES};

pub(crate) const MIN_2ND: usize = 1;
pub(crate) const MAJ_2ND: usize = 2;
pub(crate) const MIN_3RD: usize = 3;
pub(crate) const MAJ_3RD: usize = 4;
pub(crate) const PERF_4TH: usize = 5;
pub(crate) const DIM_5TH: usize = 6;
pub(crate) const PERF_5TH: usize = 7;
pub(crate) const AUG_5TH: usize = 8;
pub(crate) const MAJ_6TH: usize = 9;
pub(crate) const MIN_7TH: usize = 10;
pub(crate) const MAJ_7TH: usize = 11;

pub(crate) const AUG_2ND: usize = MIN_3RD;
pub(crate) const MIN_6TH: usize = AUG_5TH;
pub(crate) const DIM_7TH: usize = MAJ_6TH;
pub(crate) const MAJ_9TH: usize = MAJ_2ND;
pub(crate) const PERF_11TH: usize = PERF_4TH;
pub(crate) const MIN_13TH: usize = MIN_6TH;
pub(crate) const MAJ_13TH: usize = MAJ_6TH;

/// Interval names before any context is applied.
const BASE_NAMES: [&str; SEMITONES] = [
    "1", "b9", "9", "b3", "3", "11", "b5", "5", "#5", "6", "b7", "7",
];

/// Errors when turning input into a set of notes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// One of the tokens is not a note.
    #[error(transparent)]
    InvalidNote(#[from] NoteError),

    /// Naming needs at least two notes.
    #[error("at least two notes are required, got {got}")]
    TooFewNotes {
        /// The number of notes supplied.
        got: usize,
    },
}

/// Name every distance (`0..12`) in the context of all `distances`.
///
/// With `chord_mode` a fully diminished context names the diminished 7th
/// `7` and the minor 6th `13` (as used in `dim7` symbols); otherwise they
/// stay `bb7` and `b13`.
pub fn interval_table(distances: &[usize], chord_mode: bool) -> [&'static str; SEMITONES] {
    let mut names = BASE_NAMES;

    let mut present = [false; SEMITONES];
    for &d in distances {
        present[d % SEMITONES] = true;
    }
    let mut third = false;

    if present[MAJ_3RD] {
        names[AUG_2ND] = "#9";
        third = true;
    }
    if present[PERF_5TH] {
        names[DIM_5TH] = "#11";
        names[MIN_6TH] = "b13";
    }
    if present[MIN_7TH] || present[MAJ_7TH] {
        names[MAJ_6TH] = "13";
    }
    if present[MIN_3RD] {
        third = true;
        let fully_diminished =
            present[DIM_5TH] && present[DIM_7TH] && !present[MIN_7TH] && !present[MAJ_7TH];
        if fully_diminished {
            if chord_mode {
                names[DIM_7TH] = "7";
                names[MIN_6TH] = "13";
            } else {
                names[DIM_7TH] = "bb7";
                names[MIN_6TH] = "b13";
            }
        }
    }
    if !third {
        names[PERF_4TH] = "4";
        if !present[PERF_4TH] {
            names[MAJ_2ND] = "2";
        }
    }

    trace!("interval table for {distances:?} (chord mode {chord_mode}): {names:?}");
    names
}

/// Name each distance in `distances`, in order, as plain intervals.
pub fn named_intervals(distances: &[usize]) -> Vec<&'static str> {
    let names = interval_table(distances, false);
    distances.iter().map(|&d| names[d % SEMITONES]).collect()
}

/// The notes of one voicing, in input order, with the first index of every
/// distinct pitch class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    notes: Vec<Note>,
    unique_indexes: Vec<usize>,
}

impl Interval {
    /// Split `line` on spaces and commas and parse every token.
    ///
    /// Consecutive delimiters are collapsed.
    pub fn parse(line: &str, preferred: Accidental) -> Result<Interval, InputError> {
        Interval::from_tokens(&split(line), preferred)
    }

    /// Parse each token as a note. Every token is parsed before anything
    /// else happens; the first bad one is returned.
    pub fn from_tokens<S: AsRef<str>>(
        tokens: &[S],
        preferred: Accidental,
    ) -> Result<Interval, InputError> {
        let notes = tokens
            .iter()
            .map(|t| Note::parse(t.as_ref(), preferred))
            .collect::<Result<Vec<_>, _>>()?;
        Interval::from_notes(notes)
    }

    /// Build from already parsed notes.
    pub fn from_notes(notes: Vec<Note>) -> Result<Interval, InputError> {
        if notes.len() < 2 {
            return Err(InputError::TooFewNotes { got: notes.len() });
        }
        let unique_indexes = note::unique_indexes(&notes);
        Ok(Interval {
            notes,
            unique_indexes,
        })
    }

    /// All notes, as supplied.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// First index of every distinct pitch class, in order of appearance.
    pub fn unique_indexes(&self) -> &[usize] {
        &self.unique_indexes
    }

    /// The notes rotated so that `root` comes first.
    pub fn voicing_from(&self, root: usize) -> Vec<Note> {
        rotated(&self.notes, root).collect()
    }

    /// Distance from `notes[root]` to every note, walking the notes
    /// cyclically starting at `root`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not an index into [`Interval::notes`].
    pub fn distances_from(&self, root: usize) -> Vec<usize> {
        distances_from(&self.notes, root)
    }

    /// Interval name of every note of [`Interval::voicing_from`].
    ///
    /// # Panics
    ///
    /// Panics if `root` is not an index into [`Interval::notes`].
    pub fn named_intervals_from(&self, root: usize) -> Vec<&'static str> {
        named_intervals(&self.distances_from(root))
    }
}

pub(crate) fn distances_from(notes: &[Note], root: usize) -> Vec<usize> {
    let base = notes[root];
    rotated(notes, root).map(|n| base.distance_to(&n)).collect()
}

fn rotated(notes: &[Note], root: usize) -> impl Iterator<Item = Note> + '_ {
    notes.iter().cycle().skip(root).take(notes.len()).copied()
}

fn split(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ' ' || c == ',')
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(line: &str) -> Interval {
        Interval::parse(line, Accidental::Sharp).unwrap()
    }

    #[test]
    fn base_table_without_context() {
        let table = interval_table(&[0, 3], false);
        assert_eq!(table[MIN_3RD], "b3");
        assert_eq!(table[PERF_4TH], "11");
        assert_eq!(table[DIM_5TH], "b5");
        assert_eq!(table[AUG_5TH], "#5");
        assert_eq!(table[MAJ_6TH], "6");
    }

    #[test]
    fn major_third_turns_minor_third_into_sharp_nine() {
        let table = interval_table(&[0, 4, 3], false);
        assert_eq!(table[MIN_3RD], "#9");
    }

    #[test]
    fn fifth_and_seventh_rename_tensions() {
        let table = interval_table(&[0, 4, 7, 10], false);
        assert_eq!(table[DIM_5TH], "#11");
        assert_eq!(table[MIN_6TH], "b13");
        assert_eq!(table[MAJ_6TH], "13");
    }

    #[test]
    fn no_third_uses_four_and_two() {
        let table = interval_table(&[0, 2, 7], false);
        assert_eq!(table[PERF_4TH], "4");
        assert_eq!(table[MAJ_2ND], "2");

        let table = interval_table(&[0, 2, 5, 7], false);
        assert_eq!(table[PERF_4TH], "4");
        assert_eq!(table[MAJ_2ND], "9");
    }

    #[test]
    fn fully_diminished_depends_on_mode() {
        let dim7 = [0, 3, 6, 9, 8];
        let chord = interval_table(&dim7, true);
        assert_eq!(chord[DIM_7TH], "7");
        assert_eq!(chord[MIN_6TH], "13");

        let plain = interval_table(&dim7, false);
        assert_eq!(plain[DIM_7TH], "bb7");
        assert_eq!(plain[MIN_6TH], "b13");
    }

    #[test]
    fn named_intervals_follow_input_order() {
        assert_eq!(named_intervals(&[0, 7, 4, 10]), ["1", "5", "3", "b7"]);
    }

    #[test]
    fn parse_collapses_delimiters() {
        let chord = interval("C, E  ,,G ");
        let names: Vec<String> = chord.notes().iter().map(Note::to_string).collect();
        assert_eq!(names, ["C", "E", "G"]);
    }

    #[test]
    fn too_few_notes() {
        assert_eq!(
            Interval::parse("C", Accidental::Sharp),
            Err(InputError::TooFewNotes { got: 1 })
        );
        assert_eq!(
            Interval::parse(" , ", Accidental::Sharp),
            Err(InputError::TooFewNotes { got: 0 })
        );
        assert!(Interval::from_notes(Vec::new()).is_err());
    }

    #[test]
    fn invalid_token_aborts() {
        let err = Interval::parse("C E H", Accidental::Sharp).unwrap_err();
        assert!(matches!(err, InputError::InvalidNote(NoteError::InvalidLetter { .. })));
    }

    #[test]
    fn unique_indexes_skip_doublings() {
        let chord = interval("C E C G E");
        assert_eq!(chord.unique_indexes(), [0, 1, 3]);
    }

    #[test]
    fn distances_wrap_around_the_voicing() {
        let chord = interval("E G C");
        assert_eq!(chord.distances_from(0), [0, 3, 8]);
        assert_eq!(chord.distances_from(2), [0, 4, 7]);

        let voicing: Vec<String> = chord.voicing_from(2).iter().map(Note::to_string).collect();
        assert_eq!(voicing, ["C", "E", "G"]);
        assert_eq!(chord.named_intervals_from(2), ["1", "3", "5"]);
    }

    #[test]
    #[should_panic]
    fn distances_from_a_missing_root() {
        interval("E G C").distances_from(3);
    }
}

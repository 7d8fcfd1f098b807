//! Chord Namer
//!
//! Names a set of notes as a chord from every possible root and ranks the
//! names by how simple they are.
//!
//! For each root the distances to all other notes are classified into a
//! triad (major, minor, diminished, suspended, power chord or a missing
//! third), a 7th-based extension, a 6 or 6/9 chord, and whatever is left
//! over as added or altered tones. Every distance is consumed at most once.

use log::debug;

use crate::interval::{
    self, interval_table, InputError, Interval, AUG_2ND, AUG_5TH, DIM_5TH, DIM_7TH, MAJ_13TH,
    MAJ_2ND, MAJ_3RD, MAJ_7TH, MAJ_9TH, MAJ_6TH, MIN_13TH, MIN_2ND, MIN_3RD, MIN_7TH, PERF_11TH,
    PERF_4TH, PERF_5TH,
};
use crate::note::{Accidental, Note, SEMITONES};

/// Distances from the root that have not been named yet.
#[derive(Debug, Copy, Clone, Default)]
struct Presence(u16);

impl Presence {
    fn from_distances(distances: &[usize]) -> Self {
        let bits = distances
            .iter()
            .fold(0u16, |acc, &d| acc | (1 << (d % SEMITONES)));
        Presence(bits)
    }

    fn has(self, distance: usize) -> bool {
        self.0 & (1 << distance) != 0
    }

    /// Report whether `distance` is present and mark it as named.
    fn take(&mut self, distance: usize) -> bool {
        let present = self.has(distance);
        self.clear(distance);
        present
    }

    fn clear(&mut self, distance: usize) {
        self.0 &= !(1 << distance);
    }

    /// Whether `distance` is the only one left besides the root.
    fn only(self, distance: usize) -> bool {
        (self.0 & !1) == (1 << distance)
    }
}

/// The part of a chord name that follows the root, with its ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quality {
    /// Quality string, e.g. `m7b5`, `sus4`, `add9`, or empty for a major triad.
    pub name: String,
    /// Number of added/altered tones, plus one for a suspension. Lower is simpler.
    pub ranking: usize,
}

/// Chord quality of `distances` (semitones from the root, `0..12`).
///
/// ```
/// use chord_namer::chord_quality;
///
/// assert_eq!(chord_quality(&[0, 4, 7, 10]).name, "7");
/// assert_eq!(chord_quality(&[0, 3, 6, 10]).name, "m7b5");
/// ```
pub fn chord_quality(distances: &[usize]) -> Quality {
    let names = interval_table(distances, true);
    let mut present = Presence::from_distances(distances);

    let mut quality = String::new();
    let mut sus = "";
    // tones outside the triad and extension, triad notes first
    let mut additional: Vec<&'static str> = Vec::new();
    let mut diminished = false;

    if present.take(MAJ_3RD) {
        let altered = [MIN_2ND, AUG_2ND, DIM_5TH].iter().any(|&d| present.has(d));
        if !altered && present.take(AUG_5TH) {
            quality.push_str("aug");
        }
        present.clear(PERF_5TH);
    } else if present.take(MIN_3RD) {
        if !present.take(PERF_5TH) && present.take(DIM_5TH) {
            diminished = true;
            if present.has(MIN_7TH) {
                quality.push('m');
                additional.push("b5");
            } else {
                quality.push_str("dim");
            }
        } else {
            quality.push('m');
        }
    } else {
        if present.take(PERF_4TH) {
            sus = "sus4";
        } else if present.take(MAJ_2ND) {
            sus = "sus2";
        } else if present.only(PERF_5TH) {
            quality.push('5');
        } else {
            additional.push("omit3");
        }
        present.clear(PERF_5TH);
    }

    match extension(&mut present, &names, diminished) {
        Some(ext) => quality.push_str(&ext),
        None => {
            if present.take(MAJ_6TH) {
                quality.push('6');
                if present.take(MAJ_9TH) {
                    quality.push_str("/9");
                }
            }
        }
    }
    quality.push_str(sus);

    additional.extend((1..SEMITONES).filter(|&d| present.take(d)).map(|d| names[d]));

    match additional.as_slice() {
        [] => {}
        [label] if label.starts_with("omit") => {
            quality.push('(');
            quality.push_str(label);
            quality.push(')');
        }
        [label] if label.starts_with('#') || label.starts_with('b') => quality.push_str(label),
        [label] => {
            quality.push_str("add");
            quality.push_str(label);
        }
        many => {
            quality.push('(');
            quality.push_str(&many.join(", "));
            quality.push(')');
        }
    }

    Quality {
        name: quality,
        ranking: additional.len() + usize::from(!sus.is_empty()),
    }
}

/// Name the 7th-based extension, reporting only the highest of 7/9/11/13.
///
/// Returns `None` when there is no 7th of any kind.
fn extension(
    present: &mut Presence,
    names: &[&'static str; SEMITONES],
    diminished: bool,
) -> Option<String> {
    let mut stack = [MAJ_7TH, MAJ_9TH, PERF_11TH, MAJ_13TH];

    let prefix = if present.take(MAJ_7TH) {
        "maj"
    } else if present.take(MIN_7TH) {
        ""
    } else if diminished && present.take(DIM_7TH) {
        // dim7 sits on the major 6th, so 13 becomes b13
        stack[0] = DIM_7TH;
        stack[3] = MIN_13TH;
        ""
    } else {
        return None;
    };

    let mut highest = stack[0];
    for &degree in &stack[1..] {
        if present.take(degree) {
            highest = degree;
        }
    }

    Some(format!("{prefix}{}", names[highest]))
}

/// One way of naming the chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Index of the root in the input notes.
    pub root: usize,
    /// Full chord name, e.g. `C7` or `Em/C`.
    pub name: String,
    /// Complexity of the name; lower is simpler.
    pub ranking: usize,
}

/// Builder for `ChordNamer`
pub struct ChordNamerBuilder {
    preferred_accidental: Accidental,
    rootless: bool,
}

impl ChordNamerBuilder {
    /// Create a new builder with sharps preferred and rootless naming enabled.
    pub fn new() -> Self {
        ChordNamerBuilder {
            preferred_accidental: Accidental::Sharp,
            rootless: true,
        }
    }

    /// Accidental given to every parsed note as its preferred spelling.
    pub fn preferred_accidental(mut self, value: Accidental) -> Self {
        self.preferred_accidental = value;
        self
    }

    /// Also try naming slash chords with the bass note hidden, keeping the
    /// shorter name.
    pub fn rootless(mut self, value: bool) -> Self {
        self.rootless = value;
        self
    }

    /// Build the `ChordNamer`
    pub fn build(self) -> ChordNamer {
        ChordNamer {
            preferred_accidental: self.preferred_accidental,
            rootless: self.rootless,
        }
    }
}

impl Default for ChordNamerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns notes into ranked chord names.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChordNamer {
    preferred_accidental: Accidental,
    rootless: bool,
}

impl ChordNamer {
    /// Return a builder to customize spelling and rootless naming
    pub fn builder() -> ChordNamerBuilder {
        ChordNamerBuilder::new()
    }

    /// Create a namer with default settings.
    pub fn new() -> Self {
        ChordNamerBuilder::new().build()
    }

    /// Name the notes of a line such as `"C E G"` or `"C,Eb,G,Bb"`.
    pub fn name(&self, line: &str) -> Result<Chord, InputError> {
        let interval = Interval::parse(line, self.preferred_accidental)?;
        Ok(self.evaluate(interval))
    }

    /// Name a list of note tokens.
    pub fn name_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Chord, InputError> {
        let interval = Interval::from_tokens(tokens, self.preferred_accidental)?;
        Ok(self.evaluate(interval))
    }

    /// Name already parsed notes.
    pub fn name_notes(&self, notes: Vec<Note>) -> Result<Chord, InputError> {
        let interval = Interval::from_notes(notes)?;
        Ok(self.evaluate(interval))
    }

    /// Every candidate name of `interval`, one per distinct pitch class,
    /// simplest first.
    ///
    /// Sorting is stable on `(ranking, name length)`.
    pub fn candidates(&self, interval: &Interval) -> Vec<Candidate> {
        let notes = interval.notes();
        let mut candidates: Vec<Candidate> = interval
            .unique_indexes()
            .iter()
            .map(|&root| self.candidate(notes, root))
            .collect();
        candidates.sort_by_key(|c| (c.ranking, c.name.len()));
        candidates
    }

    fn evaluate(&self, interval: Interval) -> Chord {
        let candidates = self.candidates(&interval);
        Chord {
            namer: *self,
            interval,
            candidates,
        }
    }

    fn candidate(&self, notes: &[Note], root: usize) -> Candidate {
        let distances = interval::distances_from(notes, root);
        let mut quality = chord_quality(&distances);
        debug!(
            "root {} {distances:?}: `{}` ranking {}",
            notes[root], quality.name, quality.ranking
        );

        if root != 0 {
            if self.rootless {
                // hide the bass behind a copy of the next note
                let mut rootless = notes.to_vec();
                rootless[0] = rootless[1];
                let hidden = chord_quality(&interval::distances_from(&rootless, root));
                let shorter = hidden.name.len() < quality.name.len();
                debug!(
                    "root {} without bass: `{}` ranking {} ({} `{}`)",
                    notes[root],
                    hidden.name,
                    hidden.ranking,
                    if shorter { "replaces" } else { "keeps" },
                    quality.name
                );
                if shorter {
                    quality = hidden;
                }
            }
            quality.name = format!("{}/{}", quality.name, notes[0]);
            quality.ranking += 1;
        }

        Candidate {
            root,
            name: format!("{}{}", notes[root], quality.name),
            ranking: quality.ranking,
        }
    }
}

impl Default for ChordNamer {
    fn default() -> Self {
        ChordNamer::new()
    }
}

/// A set of notes and all of its ranked names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    namer: ChordNamer,
    interval: Interval,
    candidates: Vec<Candidate>,
}

impl Chord {
    /// Name the notes of `line` with default settings.
    pub fn parse(line: &str) -> Result<Chord, InputError> {
        ChordNamer::new().name(line)
    }

    /// The analysed notes.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// All input notes, as supplied.
    pub fn notes(&self) -> &[Note] {
        self.interval.notes()
    }

    /// Candidates, simplest first.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Candidate names, simplest first.
    pub fn names(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.name.as_str()).collect()
    }

    /// The simplest name.
    pub fn best(&self) -> Option<&str> {
        self.candidates.first().map(|c| c.name.as_str())
    }

    /// Replace the notes with those of `line` and name them again.
    ///
    /// On error the chord is left unchanged.
    pub fn reset(&mut self, line: &str) -> Result<&mut Self, InputError> {
        *self = self.namer.name(line)?;
        Ok(self)
    }

    /// Replace the notes with `tokens` and name them again.
    pub fn reset_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<&mut Self, InputError> {
        *self = self.namer.name_tokens(tokens)?;
        Ok(self)
    }

    /// Replace the notes with `notes` and name them again.
    pub fn reset_notes(&mut self, notes: Vec<Note>) -> Result<&mut Self, InputError> {
        *self = self.namer.name_notes(notes)?;
        Ok(self)
    }
}

/// Name the notes of `line` with default settings, simplest name first.
///
/// ```
/// let names = chord_namer::name_chord("E G C").unwrap();
/// assert_eq!(names[0], "C/E");
/// ```
pub fn name_chord(line: &str) -> Result<Vec<String>, InputError> {
    let chord = Chord::parse(line)?;
    Ok(chord.candidates.into_iter().map(|c| c.name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality(distances: &[usize]) -> (String, usize) {
        let q = chord_quality(distances);
        (q.name, q.ranking)
    }

    fn names(line: &str) -> Vec<String> {
        name_chord(line).unwrap()
    }

    #[test]
    fn presence_consumes_once() {
        let mut present = Presence::from_distances(&[0, 4, 7]);
        assert!(present.has(4));
        assert!(present.take(4));
        assert!(!present.take(4));
        assert!(present.only(7));
        present.clear(7);
        assert!(!present.has(7));
    }

    #[test]
    fn triads() {
        assert_eq!(quality(&[0, 4, 7]), ("".into(), 0));
        assert_eq!(quality(&[0, 3, 7]), ("m".into(), 0));
        assert_eq!(quality(&[0, 3, 6]), ("dim".into(), 0));
        assert_eq!(quality(&[0, 4, 8]), ("aug".into(), 0));
        assert_eq!(quality(&[0, 5, 7]), ("sus4".into(), 1));
        assert_eq!(quality(&[0, 2, 7]), ("sus2".into(), 1));
        assert_eq!(quality(&[0, 7]), ("5".into(), 0));
    }

    #[test]
    fn sevenths() {
        assert_eq!(quality(&[0, 4, 7, 10]), ("7".into(), 0));
        assert_eq!(quality(&[0, 4, 7, 11]), ("maj7".into(), 0));
        assert_eq!(quality(&[0, 3, 7, 10]), ("m7".into(), 0));
        assert_eq!(quality(&[0, 3, 6, 9]), ("dim7".into(), 0));
        assert_eq!(quality(&[0, 3, 6, 10]), ("m7b5".into(), 1));
        assert_eq!(quality(&[0, 5, 7, 10]), ("7sus4".into(), 1));
        assert_eq!(quality(&[0, 4, 10]), ("7".into(), 0));
    }

    #[test]
    fn only_highest_extension_is_named() {
        assert_eq!(quality(&[0, 4, 7, 10, 2]), ("9".into(), 0));
        assert_eq!(quality(&[0, 4, 7, 10, 2, 9]), ("13".into(), 0));
        assert_eq!(quality(&[0, 4, 7, 11, 2]), ("maj9".into(), 0));
    }

    #[test]
    fn sixth_chords() {
        assert_eq!(quality(&[0, 4, 7, 9]), ("6".into(), 0));
        assert_eq!(quality(&[0, 4, 7, 9, 2]), ("6/9".into(), 0));
        assert_eq!(quality(&[0, 3, 7, 9]), ("m6".into(), 0));
    }

    #[test]
    fn added_and_altered_tones() {
        assert_eq!(quality(&[0, 4, 7, 2]), ("add9".into(), 1));
        assert_eq!(quality(&[0, 4, 7, 10, 1]), ("7b9".into(), 1));
        assert_eq!(quality(&[0, 4, 7, 10, 3]), ("7#9".into(), 1));
        assert_eq!(quality(&[0, 4, 7, 10, 1, 3]), ("7(b9, #9)".into(), 2));
    }

    #[test]
    fn altered_major_is_not_augmented() {
        assert_eq!(quality(&[0, 4, 8, 1]), ("(b9, #5)".into(), 2));
    }

    #[test]
    fn missing_third() {
        assert_eq!(quality(&[0, 0]), ("(omit3)".into(), 1));
        assert_eq!(quality(&[0, 7, 10]), ("7(omit3)".into(), 1));
    }

    #[test]
    fn power_chord_needs_the_fifth_alone() {
        assert_eq!(quality(&[0, 7]), ("5".into(), 0));
        // not `57`: any other tone turns the bare fifth into a missing third
        assert_eq!(quality(&[0, 7, 10]).0, "7(omit3)");
        assert_eq!(quality(&[0, 7, 2]).0, "sus2");
        assert_eq!(names("C G Bb")[0], "C7(omit3)");
    }

    #[test]
    fn triad_tones_are_listed_before_leftovers() {
        assert_eq!(quality(&[0, 1]), ("(omit3, b9)".into(), 2));
        assert_eq!(quality(&[0, 3, 6, 10, 1]), ("m7(b5, b9)".into(), 2));
        assert_eq!(names("C Db G"), ["C(omit3, b9)", "Gsus4b5/C", "Db(omit3, b5)/C"]);
    }

    #[test]
    fn root_position_names_come_first() {
        assert_eq!(names("C E G")[0], "C");
        assert_eq!(names("C Eb G")[0], "Cm");
        assert_eq!(names("C E G Bb")[0], "C7");
        assert_eq!(names("C Eb Gb")[0], "Cdim");
    }

    #[test]
    fn full_ranking_of_a_major_triad() {
        assert_eq!(names("C E G"), ["C", "Em/C", "G6sus4/C"]);
    }

    #[test]
    fn inversion_names_the_bass() {
        assert_eq!(names("E G C"), ["C/E", "Em#5", "Gsus4/E"]);
    }

    #[test]
    fn rootless_can_be_disabled() {
        let chord = ChordNamer::builder().rootless(false).build().name("E G C").unwrap();
        assert_eq!(chord.names(), ["C/E", "Em#5", "G6sus4/E"]);
    }

    #[test]
    fn one_candidate_per_pitch_class() {
        let chord = Chord::parse("C E G C E Bb").unwrap();
        assert_eq!(chord.candidates().len(), 4);
        assert_eq!(chord.interval().unique_indexes().len(), 4);
        assert_eq!(chord.best(), Some("C7"));
    }

    #[test]
    fn candidates_are_sorted_by_ranking_then_length() {
        let chord = Chord::parse("C Eb Gb").unwrap();
        let candidates = chord.candidates();
        for pair in candidates.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!((a.ranking, a.name.len()) <= (b.ranking, b.name.len()));
        }
    }

    #[test]
    fn tied_candidates_keep_root_order() {
        let chord = Chord::parse("A A# B C C# D D# E F F# G G#").unwrap();
        let key = |c: &Candidate| (c.ranking, c.name.len());
        let ties: Vec<_> = chord
            .candidates()
            .windows(2)
            .filter(|pair| key(&pair[0]) == key(&pair[1]))
            .collect();
        assert!(!ties.is_empty());
        for pair in ties {
            assert!(pair[0].root < pair[1].root, "{} before {}", pair[0].name, pair[1].name);
        }

        let b = chord.names().iter().position(|n| n.starts_with("Bmaj13"));
        let c_sharp = chord.names().iter().position(|n| n.starts_with("C#maj13"));
        assert!(b.unwrap() < c_sharp.unwrap());
    }

    #[test]
    fn too_few_notes() {
        assert_eq!(name_chord("C"), Err(InputError::TooFewNotes { got: 1 }));
    }

    #[test]
    fn reset_recomputes_or_keeps_state() {
        let mut chord = Chord::parse("C E G").unwrap();
        chord.reset("A C E").unwrap();
        assert_eq!(chord.best(), Some("Am"));

        assert!(chord.reset("A X").is_err());
        assert_eq!(chord.best(), Some("Am"));

        chord.reset_tokens(&["D", "F#", "A"]).unwrap();
        assert_eq!(chord.best(), Some("D"));
    }

    #[test]
    fn preferred_accidental_reaches_the_notes() {
        let chord = ChordNamer::builder()
            .preferred_accidental(Accidental::Flat)
            .build()
            .name("C E G")
            .unwrap();
        assert!(chord
            .notes()
            .iter()
            .all(|n| n.preferred_accidental() == Accidental::Flat));
        assert_eq!(chord.notes()[0].at_distance(1).to_string(), "Db");
    }
}

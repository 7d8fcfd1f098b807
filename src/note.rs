//! Note
//!
//! Pitch classes with an enharmonic spelling.
//!
//! Pitch classes are counted from A, so every spelling of the same sounding
//! note shares one `pitch_class` value:
//!
//! ```text
//!  0 A          4 C#/Db     8 F/E#*
//!  1 A#/Bb      5 D         9 F#/Gb
//!  2 B/Cb*      6 D#/Eb    10 G
//!  3 C/B#*      7 E/Fb*    11 G#/Ab
//! ```
//!
//! Entries marked `*` are the white keys that also have a single-accidental
//! alternate spelling.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

pub(crate) const SEMITONES: usize = 12;

/// Natural letters and their pitch class.
const LETTERS: [(char, usize); 7] = [
    ('A', 0),
    ('B', 2),
    ('C', 3),
    ('D', 5),
    ('E', 7),
    ('F', 8),
    ('G', 10),
];

/// Pitch classes without a natural letter name.
const BLACK_KEYS: [usize; 5] = [1, 4, 6, 9, 11];

/// Spelling used when nothing else applies: naturals and sharps only.
const PLAIN_SPELLING: [(char, Accidental); SEMITONES] = [
    ('A', Accidental::Natural),
    ('A', Accidental::Sharp),
    ('B', Accidental::Natural),
    ('C', Accidental::Natural),
    ('C', Accidental::Sharp),
    ('D', Accidental::Natural),
    ('D', Accidental::Sharp),
    ('E', Accidental::Natural),
    ('F', Accidental::Natural),
    ('F', Accidental::Sharp),
    ('G', Accidental::Natural),
    ('G', Accidental::Sharp),
];

/// Accidental attached to a letter name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Accidental {
    /// Double flat, rendered `bb`.
    DoubleFlat,
    /// Flat, rendered `b`.
    Flat,
    /// No accidental.
    Natural,
    /// Sharp, rendered `#`.
    Sharp,
    /// Double sharp, rendered `x`.
    DoubleSharp,
}

impl Accidental {
    /// Semitone offset applied to the natural letter.
    pub const fn semitones(self) -> i32 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "x",
        }
    }

    fn from_prefix(marker: &str) -> Option<Accidental> {
        match marker {
            "-" => Some(Accidental::Flat),
            "--" => Some(Accidental::DoubleFlat),
            "+" => Some(Accidental::Sharp),
            "++" | "x" => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    fn from_suffix(marker: &str) -> Option<Accidental> {
        match marker {
            "b" => Some(Accidental::Flat),
            "bb" => Some(Accidental::DoubleFlat),
            "#" => Some(Accidental::Sharp),
            "x" => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }
}

/// Errors when parsing a note token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    /// The token was empty.
    #[error("empty note token")]
    Empty,

    /// The token does not contain a letter from A to G where one is expected.
    #[error("invalid note `{token}`: expected a letter from A to G")]
    InvalidLetter {
        /// The offending token.
        token: String,
    },

    /// The accidental marker is not one of the supported spellings.
    #[error("invalid note `{token}`: unknown accidental `{marker}`")]
    UnknownAccidental {
        /// The offending token.
        token: String,
        /// The unrecognized marker.
        marker: String,
    },

    /// The token carries an accidental both before and after the letter.
    #[error("invalid note `{token}`: accidental given both before and after the letter")]
    ConflictingAccidentals {
        /// The offending token.
        token: String,
    },
}

/// A single pitch class together with the way it is spelled.
///
/// Two notes sound the same when [`Note::is_enharmonic`] holds; `==` also
/// compares the spelling.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Note {
    pitch_class: usize,
    letter: char,
    accidental: Accidental,
    preferred_accidental: Accidental,
}

impl Note {
    /// Parse a note token such as `C`, `eb`, `F#`, `Bbb`, `Gx`, `-B` or `+F`.
    ///
    /// The letter is case-insensitive. Accidentals are written either after
    /// the letter (`b`, `bb`, `#`, `x`) or before it (`-`, `--`, `+`, `++`, `x`),
    /// never both. `preferred` is remembered and used whenever this note is
    /// later re-spelled onto a black key without an explicit accidental.
    pub fn parse(token: &str, preferred: Accidental) -> Result<Note, NoteError> {
        if token.is_empty() {
            return Err(NoteError::Empty);
        }

        let body = token.trim_start_matches(|c: char| matches!(c, '-' | '+' | 'x'));
        let prefix = &token[..token.len() - body.len()];

        let invalid_letter = || NoteError::InvalidLetter {
            token: token.to_string(),
        };
        let first = body.chars().next().ok_or_else(invalid_letter)?;
        let letter = first.to_ascii_uppercase();
        let natural = LETTERS
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|&(_, pc)| pc)
            .ok_or_else(invalid_letter)?;
        let suffix = &body[first.len_utf8()..];

        let unknown = |marker: &str| NoteError::UnknownAccidental {
            token: token.to_string(),
            marker: marker.to_string(),
        };
        let before = match prefix {
            "" => None,
            marker => Some(Accidental::from_prefix(marker).ok_or_else(|| unknown(marker))?),
        };
        let after = match suffix {
            "" => None,
            marker => Some(Accidental::from_suffix(marker).ok_or_else(|| unknown(marker))?),
        };

        let accidental = match (before, after) {
            (Some(_), Some(_)) => {
                return Err(NoteError::ConflictingAccidentals {
                    token: token.to_string(),
                })
            }
            (before, after) => before.or(after).unwrap_or(Accidental::Natural),
        };

        Ok(Note {
            pitch_class: wrap(natural as i32 + accidental.semitones()),
            letter,
            accidental,
            preferred_accidental: preferred,
        })
    }

    /// Pitch class, `A = 0` through `G# = 11`.
    pub fn pitch_class(&self) -> usize {
        self.pitch_class
    }

    /// Letter of the current spelling.
    pub fn letter(&self) -> char {
        self.letter
    }

    /// Accidental of the current spelling.
    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    /// Accidental used for black keys when no explicit one is requested.
    pub fn preferred_accidental(&self) -> Accidental {
        self.preferred_accidental
    }

    /// Move the note by `semitones` (either direction, any size).
    ///
    /// Black keys are spelled with `default_accidental`, or with the
    /// preferred accidental when `default_accidental` is natural. White keys
    /// keep `default_accidental` if it spells them (`B#`, `Fb`, ...) and are
    /// natural otherwise.
    pub fn shift_semitone(&self, semitones: i32, default_accidental: Accidental) -> Note {
        let pitch_class = wrap(self.pitch_class as i32 + semitones);
        let wanted = if is_black_key(pitch_class) && default_accidental == Accidental::Natural {
            self.preferred_accidental
        } else {
            default_accidental
        };
        self.respelled_as(pitch_class, wanted)
    }

    /// The note `semitones` above this one, spelled with the default rules.
    pub fn at_distance(&self, semitones: i32) -> Note {
        self.shift_semitone(semitones, Accidental::Natural)
    }

    /// Switch to the enharmonic alternative spelling.
    ///
    /// Double accidentals collapse to the plain spelling first. `A`, `D` and
    /// `G` have no alternative and are returned unchanged.
    pub fn respell(&self) -> Note {
        let current = match self.accidental {
            Accidental::DoubleFlat | Accidental::DoubleSharp => Accidental::Natural,
            other => other,
        };

        let next = match self.pitch_class {
            0 | 5 | 10 => current,
            // C <-> B#, F <-> E#
            3 | 8 => match current {
                Accidental::Natural => Accidental::Sharp,
                _ => Accidental::Natural,
            },
            // B <-> Cb, E <-> Fb
            2 | 7 => match current {
                Accidental::Natural => Accidental::Flat,
                _ => Accidental::Natural,
            },
            _ => match current {
                Accidental::Sharp => Accidental::Flat,
                Accidental::Flat => Accidental::Sharp,
                _ => self.preferred_accidental,
            },
        };

        self.respelled_as(self.pitch_class, next)
    }

    /// Distance in semitones going up from `self` to `other`, in `0..12`.
    pub fn distance_to(&self, other: &Note) -> usize {
        (other.pitch_class + SEMITONES - self.pitch_class) % SEMITONES
    }

    /// Whether both notes denote the same pitch class, whatever the spelling.
    pub fn is_enharmonic(&self, other: &Note) -> bool {
        self.pitch_class == other.pitch_class
    }

    fn respelled_as(&self, pitch_class: usize, wanted: Accidental) -> Note {
        let (letter, accidental) = spell(pitch_class, wanted, self.preferred_accidental);
        Note {
            pitch_class,
            letter,
            accidental,
            preferred_accidental: self.preferred_accidental,
        }
    }
}

impl FromStr for Note {
    type Err = NoteError;

    /// Parse with sharps preferred.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s, Accidental::Sharp)
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.letter, self.accidental.suffix())
    }
}

/// Keep the first note of every pitch class, in order of appearance.
pub fn dedupe(notes: &[Note]) -> Vec<Note> {
    unique_indexes(notes).into_iter().map(|i| notes[i]).collect()
}

/// Index of the first note of every pitch class, in order of appearance.
pub fn unique_indexes(notes: &[Note]) -> Vec<usize> {
    let mut seen = [false; SEMITONES];
    notes
        .iter()
        .enumerate()
        .filter(|(_, note)| !std::mem::replace(&mut seen[note.pitch_class], true))
        .map(|(i, _)| i)
        .collect()
}

fn wrap(value: i32) -> usize {
    value.rem_euclid(SEMITONES as i32) as usize
}

fn is_black_key(pitch_class: usize) -> bool {
    BLACK_KEYS.contains(&pitch_class)
}

/// Letter that `accidental` turns into `pitch_class`, if there is one.
fn letter_for(pitch_class: usize, accidental: Accidental) -> Option<char> {
    let natural = wrap(pitch_class as i32 - accidental.semitones());
    LETTERS
        .iter()
        .find(|&&(_, pc)| pc == natural)
        .map(|&(letter, _)| letter)
}

/// Spell `pitch_class` with `wanted` if possible, then the preferred
/// accidental on black keys, then naturals and sharps.
fn spell(pitch_class: usize, wanted: Accidental, preferred: Accidental) -> (char, Accidental) {
    let fallback = if is_black_key(pitch_class) {
        preferred
    } else {
        Accidental::Natural
    };
    [wanted, fallback]
        .into_iter()
        .find_map(|acc| letter_for(pitch_class, acc).map(|letter| (letter, acc)))
        .unwrap_or(PLAIN_SPELLING[pitch_class])
}

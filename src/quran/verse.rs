//! Verse references and canonical progression.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of surahs in the Quran.
pub const SURAH_COUNT: u16 = 114;

/// A validated (surah, ayah) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    pub surah: u16,
    pub ayah: u16,
}

impl VerseRef {
    /// Creates a reference if `1 <= surah <= 114` and `ayah >= 1`.
    #[must_use]
    pub fn new(surah: u16, ayah: u16) -> Option<Self> {
        ((1..=SURAH_COUNT).contains(&surah) && ayah >= 1).then_some(Self { surah, ayah })
    }

    /// Like [`VerseRef::new`] but accepts any integer width.
    #[must_use]
    pub fn from_parts<S, A>(surah: S, ayah: A) -> Option<Self>
    where
        S: TryInto<u16>,
        A: TryInto<u16>,
    {
        Self::new(surah.try_into().ok()?, ayah.try_into().ok()?)
    }

    /// First verse of the surah following `surah`, wrapping 114 back to 1.
    #[must_use]
    pub const fn first_of_next_surah(surah: u16) -> Self {
        Self {
            surah: (surah % SURAH_COUNT) + 1,
            ayah: 1,
        }
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}

/// Computes the verse after `(surah, ayah)`.
///
/// `total_ayahs` is the ayah count of `surah` when known. Without it the
/// position simply advances within the same surah. A current ayah at or past
/// the total (including a total of zero) moves to the next surah.
#[must_use]
pub fn next_verse(surah: u16, ayah: u16, total_ayahs: Option<u16>) -> VerseRef {
    match total_ayahs {
        Some(total) if ayah >= total => VerseRef::first_of_next_surah(surah),
        _ => VerseRef {
            surah,
            ayah: ayah.saturating_add(1),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_range() {
        assert!(VerseRef::new(1, 1).is_some());
        assert!(VerseRef::new(114, 6).is_some());
        assert!(VerseRef::new(0, 1).is_none());
        assert!(VerseRef::new(115, 1).is_none());
        assert!(VerseRef::new(2, 0).is_none());
    }

    #[test]
    fn test_from_parts_rejects_negative_and_huge() {
        assert_eq!(VerseRef::from_parts(2_i64, 255_i64), VerseRef::new(2, 255));
        assert!(VerseRef::from_parts(-1_i64, 5_i64).is_none());
        assert!(VerseRef::from_parts(2_i64, 1_000_000_i64).is_none());
    }

    #[test]
    fn test_next_within_surah() {
        for ayah in 1..286 {
            assert_eq!(
                next_verse(2, ayah, Some(286)),
                VerseRef { surah: 2, ayah: ayah + 1 }
            );
        }
    }

    #[test]
    fn test_next_wraps_to_next_surah() {
        assert_eq!(next_verse(1, 7, Some(7)), VerseRef { surah: 2, ayah: 1 });
        assert_eq!(next_verse(2, 286, Some(286)), VerseRef { surah: 3, ayah: 1 });
    }

    #[test]
    fn test_next_wraps_114_to_1() {
        assert_eq!(next_verse(114, 6, Some(6)), VerseRef { surah: 1, ayah: 1 });
    }

    #[test]
    fn test_next_unknown_total_advances() {
        assert_eq!(next_verse(2, 286, None), VerseRef { surah: 2, ayah: 287 });
    }

    #[test]
    fn test_next_from_initial_state() {
        assert_eq!(next_verse(1, 0, Some(7)), VerseRef { surah: 1, ayah: 1 });
    }

    #[test]
    fn test_next_zero_total_or_past_end() {
        assert_eq!(next_verse(5, 3, Some(0)), VerseRef { surah: 6, ayah: 1 });
        assert_eq!(next_verse(5, 200, Some(120)), VerseRef { surah: 6, ayah: 1 });
    }
}

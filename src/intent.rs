//! Command interpreter: free-form speech transcripts to navigation intents.
//!
//! This is a pure mapping with no side effects. The phrase table is plain
//! data (phrase, intent), kept separate from dispatch so the interpreter can
//! be tested without a navigator attached. The recognized phrases are
//! French-Canadian with a few English synonyms; see [`PHRASES`].

/// A navigation action derived from user input (button or voice).
///
/// Consumed immediately by the navigator; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    NextPage,
    PreviousPage,
    /// Zero-indexed target page. Spoken page numbers are 1-indexed, so
    /// "page 1" maps to `GoToPage(0)` and "page 0" to `GoToPage(-1)`,
    /// which the navigator clamps.
    GoToPage(i64),
    /// Chapter number as spoken; resolved to a page through an injected
    /// chapter table.
    GoToChapter(u32),
    GoToFirst,
    GoToLast,
    /// Transcript matched nothing. Expected for ambient speech; callers
    /// ignore it rather than surfacing an error.
    Unrecognized,
}

/// Exact-match phrase table, first match wins.
///
/// Lookup is against the case-normalized, whitespace-trimmed transcript —
/// exact equality, not substring containment, so "la page suivante est
/// blanche" does not trigger a page turn.
pub const PHRASES: &[(&str, NavigationIntent)] = &[
    ("page suivante", NavigationIntent::NextPage),
    ("suivante", NavigationIntent::NextPage),
    ("next", NavigationIntent::NextPage),
    ("page precedente", NavigationIntent::PreviousPage),
    ("precedente", NavigationIntent::PreviousPage),
    ("previous", NavigationIntent::PreviousPage),
    ("debut", NavigationIntent::GoToFirst),
    ("premiere page", NavigationIntent::GoToFirst),
    ("derniere page", NavigationIntent::GoToLast),
];

/// Interpret a raw transcript into a [`NavigationIntent`].
///
/// Deterministic and idempotent: identical transcripts always yield
/// identical intents, in any order of invocation.
///
/// Resolution order:
/// 1. normalize (lowercase, trim surrounding whitespace)
/// 2. exact phrase-table match
/// 3. `page <N>` pattern, converted to a zero-indexed page
/// 4. `chapitre <N>` pattern
/// 5. otherwise [`NavigationIntent::Unrecognized`]
///
/// Only the first recognized pattern is honored; the rest of the transcript
/// is ignored.
pub fn interpret(transcript: &str) -> NavigationIntent {
    let normalized = transcript.trim().to_lowercase();

    for (phrase, intent) in PHRASES {
        if normalized == *phrase {
            return *intent;
        }
    }

    if let Some(n) = number_after(&normalized, "page") {
        // Spoken 1-indexed, internal 0-indexed. "page 0" yields -1 here;
        // the navigator clamps it to the first page. Numbers too large for
        // the target type saturate so they still clamp to the last page.
        let target = i64::try_from(n).unwrap_or(i64::MAX).saturating_sub(1);
        return NavigationIntent::GoToPage(target);
    }

    if let Some(n) = number_after(&normalized, "chapitre") {
        return NavigationIntent::GoToChapter(u32::try_from(n).unwrap_or(u32::MAX));
    }

    NavigationIntent::Unrecognized
}

/// Find the first `<keyword> <integer>` pair in the transcript.
///
/// Scans word by word; the number may carry trailing punctuation from the
/// recognizer ("page 12," still counts as 12). Digit runs too long to fit
/// saturate instead of being dropped, so an absurd spoken number still
/// resolves to an intent and clamps downstream.
fn number_after(transcript: &str, keyword: &str) -> Option<u64> {
    let words: Vec<&str> = transcript.split_whitespace().collect();
    for pair in words.windows(2) {
        if pair[0] == keyword {
            let digits: String = pair[1]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if !digits.is_empty() {
                // Non-empty all-digit input only fails to parse on overflow.
                return Some(digits.parse().unwrap_or(u64::MAX));
            }
        }
    }
    None
}

/// How a single reference character looks against the typed input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    /// The next character to type.
    Current,
    Pending,
}

/// Result of comparing typed input against a reference text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub states: Vec<CharState>,
    pub error_count: usize,
    /// Number of typed characters that overlap the reference.
    pub typed_len: usize,
}

impl Comparison {
    pub fn correct_count(&self) -> usize {
        self.typed_len - self.error_count
    }
}

/// Classifies every reference character against `typed`.
///
/// Characters are compared one `char` at a time with no normalization, so
/// combining sequences are only equal if typed identically. Anything typed past
/// the end of the reference is not evaluated.
pub fn classify(reference: &str, typed: &str) -> Comparison {
    let mut typed_chars = typed.chars();
    let mut states = Vec::with_capacity(reference.len());
    let mut error_count = 0;
    let mut typed_len = 0;
    let mut cursor_placed = false;

    for expected in reference.chars() {
        let state = match typed_chars.next() {
            Some(actual) => {
                typed_len += 1;
                if actual == expected {
                    CharState::Correct
                } else {
                    error_count += 1;
                    CharState::Incorrect
                }
            }
            None if !cursor_placed => {
                cursor_placed = true;
                CharState::Current
            }
            None => CharState::Pending,
        };
        states.push(state);
    }

    Comparison {
        states,
        error_count,
        typed_len,
    }
}

/// Cuts `typed` down to at most `max_chars` characters.
pub fn truncate_chars(typed: &str, max_chars: usize) -> &str {
    match typed.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &typed[..byte_idx],
        None => typed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CharState::*;

    #[test]
    fn test_exact_match() {
        let cmp = classify("cat", "cat");
        assert_eq!(cmp.states, vec![Correct, Correct, Correct]);
        assert_eq!(cmp.error_count, 0);
        assert_eq!(cmp.typed_len, 3);
    }

    #[test]
    fn test_single_mismatch() {
        let cmp = classify("cat", "cwt");
        assert_eq!(cmp.states, vec![Correct, Incorrect, Correct]);
        assert_eq!(cmp.error_count, 1);
        assert_eq!(cmp.correct_count(), 2);
    }

    #[test]
    fn test_empty_input_marks_first_char_current() {
        let cmp = classify("dog", "");
        assert_eq!(cmp.states, vec![Current, Pending, Pending]);
        assert_eq!(cmp.error_count, 0);
        assert_eq!(cmp.typed_len, 0);
    }

    #[test]
    fn test_partial_prefix() {
        let cmp = classify("hello world", "hxl");
        assert_eq!(cmp.states.len(), 11);
        assert_eq!(&cmp.states[..4], &[Correct, Incorrect, Correct, Current]);
        assert!(cmp.states[4..].iter().all(|s| *s == Pending));
        assert_eq!(cmp.error_count, 1);
    }

    #[test]
    fn test_overflow_is_ignored() {
        let cmp = classify("ab", "abzzz");
        assert_eq!(cmp.states, vec![Correct, Correct]);
        assert_eq!(cmp.error_count, 0);
        assert_eq!(cmp.typed_len, 2);
    }

    #[test]
    fn test_whitespace_is_compared() {
        let cmp = classify("a b", "a_b");
        assert_eq!(cmp.states, vec![Correct, Incorrect, Correct]);
    }

    #[test]
    fn test_prefix_property_holds_for_every_length() {
        let reference = "the quick brown fox";
        let typed = "thw quick brovn fox";
        for len in 0..=reference.len() {
            let cmp = classify(reference, &typed[..len]);
            let typed_states = cmp
                .states
                .iter()
                .filter(|s| matches!(s, Correct | Incorrect))
                .count();
            let current = cmp.states.iter().filter(|s| **s == Current).count();
            let expected_errors = reference[..len]
                .chars()
                .zip(typed[..len].chars())
                .filter(|(r, t)| r != t)
                .count();

            assert_eq!(typed_states, len);
            assert_eq!(current, usize::from(len < reference.len()));
            assert_eq!(cmp.error_count, expected_errors);
            assert!(cmp.states[len.min(reference.len())..]
                .iter()
                .skip(1)
                .all(|s| *s == Pending));
        }
    }

    #[test]
    fn test_multibyte_chars_compare_per_char() {
        let cmp = classify("naïve", "naive");
        assert_eq!(cmp.states[2], Incorrect);
        assert_eq!(cmp.error_count, 1);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("catalog", 3), "cat");
        assert_eq!(truncate_chars("ca", 3), "ca");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 0), "");
    }
}

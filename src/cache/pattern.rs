//! Redis-style glob matching for key patterns.
//!
//! Supports `*`, `?`, `[abc]`, `[^abc]`, `[a-z]` and `\` escapes, the same
//! subset `SCAN ... MATCH` understands.

/// Returns true if `key` matches the glob `pattern`.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();
    match_from(&pattern, &key)
}

fn match_from(pattern: &[char], key: &[char]) -> bool {
    match pattern.first() {
        None => key.is_empty(),
        Some('*') => {
            // runs of stars behave like one
            let rest = pattern.iter().position(|&c| c != '*').map_or(&[][..], |i| &pattern[i..]);
            if rest.is_empty() {
                return true;
            }
            (0..=key.len()).any(|i| match_from(rest, &key[i..]))
        }
        Some('?') => !key.is_empty() && match_from(&pattern[1..], &key[1..]),
        Some('[') => {
            let Some((&c, key_rest)) = key.split_first() else {
                return false;
            };
            match class_match(&pattern[1..], c) {
                Some((matched, consumed)) => {
                    matched && match_from(&pattern[1 + consumed..], key_rest)
                }
                // unterminated class, treat the bracket literally
                None => c == '[' && match_from(&pattern[1..], key_rest),
            }
        }
        Some('\\') if pattern.len() > 1 => {
            key.first() == Some(&pattern[1]) && match_from(&pattern[2..], &key[1..])
        }
        Some(&c) => key.first() == Some(&c) && match_from(&pattern[1..], &key[1..]),
    }
}

/// Matches `c` against a bracket class whose body starts at `class`.
///
/// Returns whether it matched and how many chars were consumed including the
/// closing `]`, or None when the class is never closed.
fn class_match(class: &[char], c: char) -> Option<(bool, usize)> {
    let negate = class.first() == Some(&'^');
    let mut i = usize::from(negate);
    let mut matched = false;

    while i < class.len() {
        match class[i] {
            ']' => return Some((matched != negate, i + 1)),
            '\\' if i + 1 < class.len() => {
                matched |= class[i + 1] == c;
                i += 2;
            }
            lo if i + 2 < class.len() && class[i + 1] == '-' && class[i + 2] != ']' => {
                let hi = class[i + 2];
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                matched |= (lo..=hi).contains(&c);
                i += 3;
            }
            other => {
                matched |= other == c;
                i += 1;
            }
        }
    }

    None
}

//! Name matching helpers

use std::cmp;

/// Levenshtein distance between two strings, counted in chars
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != *b_char);
            current[j + 1] = cmp::min(substitution, cmp::min(previous[j + 1], current[j]) + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b_chars.len()]
}

/// Best match for `lookup` among `names`
///
/// A case-insensitive equal name wins; otherwise the closest name within a
/// third of the lookup length (at least 1) is returned. Ties keep the
/// earliest candidate.
pub fn find_best_match_for_name<'a>(
    names: impl Iterator<Item = &'a str>,
    lookup: &str,
) -> Option<&'a str> {
    let max_dist = cmp::max(lookup.chars().count(), 3) / 3;
    let mut best: Option<(&'a str, usize)> = None;

    for name in names {
        if name.eq_ignore_ascii_case(lookup) {
            return Some(name);
        }
        let dist = levenshtein_distance(lookup, name);
        if dist > max_dist {
            continue;
        }
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((name, dist)),
        }
    }
    best.map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("no-var", "no-var"), 0);
        assert_eq!(levenshtein_distance("no-vra", "no-var"), 2);
        assert_eq!(levenshtein_distance("héllo", "hello"), 1);
    }

    #[test]
    fn test_find_best_match() {
        let names = ["no-var", "no-eval", "semi", "eqeqeq"];
        assert_eq!(find_best_match_for_name(names.into_iter(), "no-vra"), Some("no-var"));
        assert_eq!(find_best_match_for_name(names.into_iter(), "SEMI"), Some("semi"));
        assert_eq!(find_best_match_for_name(names.into_iter(), "completely-different"), None);
    }
}

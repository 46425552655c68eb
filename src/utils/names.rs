/// Fuzzy, case-insensitive comparison of a canonical name against free text.
///
/// Succeeds when at most half (rounded down) of the canonical name's words
/// are missing from the candidate, or failing that, when the edit distance
/// between the two strings is below half the length of the shorter one.
pub fn names_match(name: &str, candidate: &str) -> bool {
    let name = name.trim().to_lowercase();
    let candidate = candidate.trim().to_lowercase();
    if name.is_empty() || candidate.is_empty() {
        return false;
    }

    let tokens: Vec<&str> = name.split(' ').collect();
    let missing = tokens
        .iter()
        .filter(|token| !candidate.contains(*token))
        .count();
    if missing <= tokens.len() / 2 {
        return true;
    }

    let name_len = name.chars().count() as f64;
    let candidate_len = candidate.chars().count() as f64;
    let limit = (name_len / 2.0).min(candidate_len / 2.0);
    (levenshtein(&name, &candidate) as f64) < limit
}

/// Returns the first item whose name matches `candidate`.
///
/// Iteration order decides ties: the first good-enough match wins even if a
/// later item would be closer.
pub fn find_best_match<'a, T, I, F>(candidate: &str, items: I, name_of: F) -> Option<&'a T>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> &str,
    T: 'a,
{
    items
        .into_iter()
        .find(|item| names_match(name_of(item), candidate))
}

/// Unit-cost insert/delete/substitute distance, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn test_token_overlap_is_case_insensitive() {
        assert!(names_match("Jane", "JANE"));
        assert!(names_match("Jane Doe", "jane"));
        assert!(names_match("Captain Mira Vance", "Mira Vance"));
        assert!(names_match("Mira Vance", "Dr. Vance, chief engineer"));
    }

    #[test]
    fn test_majority_of_tokens_required() {
        // Two of three words missing exceeds floor(3 / 2).
        assert!(!names_match("Captain Mira Vance", "Captain Holt"));
        assert!(!names_match("Jane", "Bob"));
    }

    #[test]
    fn test_edit_distance_fallback() {
        // A misspelling shares no token but is one edit away.
        assert!(names_match("Theodora", "Teodora"));
        assert!(names_match("Orrin", "Orin"));
        assert!(!names_match("Orrin", "Bex"));
    }

    #[test]
    fn test_empty_inputs_never_match() {
        assert!(!names_match("", "anything"));
        assert!(!names_match("Jane", "   "));
    }

    #[test]
    fn test_find_best_match_prefers_declaration_order() {
        let names = vec!["Mira Vance".to_string(), "Mira".to_string()];
        let found = find_best_match("Mira", &names, |n| n.as_str());
        assert_eq!(found.map(String::as_str), Some("Mira Vance"));

        let missing = find_best_match("Holt", &names, |n| n.as_str());
        assert!(missing.is_none());
    }
}

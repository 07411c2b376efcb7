//! "Did you mean?" suggestions based on edit distance.

/// Suggestions are truncated to this many entries.
pub const MAX_SUGGESTIONS: usize = 3;

/// A candidate ranked by edit distance from the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub value: String,
    pub distance: usize,
}

/// Levenshtein distance over Unicode code points, two-row DP.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}

/// Candidates within the distance threshold, closest first (ties broken
/// lexicographically), at most [`MAX_SUGGESTIONS`]. Exact matches and
/// empty strings are never suggested. The threshold scales with the
/// target length: 1 edit for up to 3 characters, 2 up to 5, 3 beyond.
pub fn suggest_similar<S: AsRef<str>>(target: &str, candidates: &[S]) -> Vec<Suggestion> {
    if target.is_empty() {
        return Vec::new();
    }

    let threshold = match target.chars().count() {
        0..=3 => 1,
        4..=5 => 2,
        _ => 3,
    };

    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| !c.is_empty() && *c != target)
        .filter_map(|c| {
            let distance = levenshtein(target, c);
            (distance <= threshold).then(|| Suggestion {
                value: c.to_string(),
                distance,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| a.distance.cmp(&b.distance).then(a.value.cmp(&b.value)));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// `"Did you mean 'x'?"` for one suggestion, `"Did you mean one of: 'x',
/// 'y'?"` for several, empty for none.
pub fn format_suggestions(suggestions: &[Suggestion]) -> String {
    match suggestions {
        [] => String::new(),
        [one] => format!("Did you mean '{}'?", one.value),
        many => {
            let quoted: Vec<String> = many.iter().map(|s| format!("'{}'", s.value)).collect();
            format!("Did you mean one of: {}?", quoted.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "ab"), 2);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn distance_counts_code_points() {
        assert_eq!(levenshtein("héllo", "hello"), 1);
        assert_eq!(levenshtein("日本語", "日本"), 1);
    }

    #[test]
    fn suggests_closest_first_with_lexicographic_ties() {
        let candidates = ["print", "printf", "println", "sprint", "sprintf"];
        let got = suggest_similar("prin", &candidates);
        assert_eq!(got[0].value, "print");
        assert!(got.len() <= MAX_SUGGESTIONS);
        assert!(got.iter().all(|s| s.distance <= 2));
    }

    #[test]
    fn skips_exact_and_empty() {
        assert!(suggest_similar("", &["anything"]).is_empty());
        let got = suggest_similar("print", &["print", "", "prints"]);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].value, "prints");
    }

    #[test]
    fn threshold_scales_with_length() {
        // 3-char target allows only distance 1
        assert!(suggest_similar("foo", &["fooba"]).is_empty());
        assert_eq!(suggest_similar("foo", &["fo"]).len(), 1);
        // long target allows distance 3
        assert_eq!(suggest_similar("contains", &["contined"]).len(), 1);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_suggestions(&[]), "");
        let one = suggest_similar("prin", &["print"]);
        assert_eq!(format_suggestions(&one), "Did you mean 'print'?");
        let two = suggest_similar("prin", &["print", "prig"]);
        assert_eq!(
            format_suggestions(&two),
            "Did you mean one of: 'prig', 'print'?"
        );
    }
}

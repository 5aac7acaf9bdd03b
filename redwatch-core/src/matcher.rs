use std::borrow::Cow;

/// Tests a text blob against the monitored keyword set.
///
/// Returns the original-case keywords whose normalized form occurs in the
/// normalized text, deduplicated, in keyword-list order. Lowercasing uses
/// `str::to_lowercase`, which is locale-independent. Empty keywords never
/// match: "" is a substring of everything and would otherwise alert on every
/// post.
pub fn find_keywords(text: &str, keywords: &[String], case_sensitive: bool) -> Vec<String> {
    let haystack: Cow<'_, str> = if case_sensitive {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    };

    let mut found: Vec<String> = Vec::new();
    for keyword in keywords {
        if keyword.is_empty() {
            continue;
        }
        let needle: Cow<'_, str> = if case_sensitive {
            Cow::Borrowed(keyword.as_str())
        } else {
            Cow::Owned(keyword.to_lowercase())
        };
        if haystack.contains(needle.as_ref()) && !found.iter().any(|k| k == keyword) {
            found.push(keyword.clone());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn case_insensitive_match() {
        let found = find_keywords("Building a Bot in Go", &keywords(&["bot"]), false);
        assert_eq!(found, vec!["bot"]);
    }

    #[test]
    fn case_sensitive_respects_case() {
        let kw = keywords(&["Bot"]);
        assert!(find_keywords("building a bot", &kw, true).is_empty());
        assert_eq!(find_keywords("Building a Bot", &kw, true), vec!["Bot"]);
    }

    #[test]
    fn returns_original_case_not_normalized() {
        let found = find_keywords("rust and RUST", &keywords(&["RuSt"]), false);
        assert_eq!(found, vec!["RuSt"]);
    }

    #[test]
    fn empty_keyword_never_matches() {
        let found = find_keywords("anything at all", &keywords(&["", "anything"]), false);
        assert_eq!(found, vec!["anything"]);

        assert!(find_keywords("anything", &keywords(&[""]), true).is_empty());
    }

    #[test]
    fn empty_inputs_yield_empty_result() {
        assert!(find_keywords("", &keywords(&["bot"]), false).is_empty());
        assert!(find_keywords("some text", &[], false).is_empty());
    }

    #[test]
    fn duplicates_are_suppressed_in_order() {
        let found = find_keywords(
            "api and bots everywhere",
            &keywords(&["bot", "api", "bot"]),
            false,
        );
        assert_eq!(found, vec!["bot", "api"]);
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let kw = keywords(&["alpha", "beta"]);
        let first = find_keywords("alpha beta gamma", &kw, false);
        let second = find_keywords("alpha beta gamma", &kw, false);
        assert_eq!(first, second);
    }

    #[test]
    fn invariant_under_consistent_lowercasing() {
        let kw = keywords(&["GoLang", "BOT"]);
        let text = "A GOLANG bot appeared";

        let direct = find_keywords(text, &kw, false);
        let lowered_kw: Vec<String> = kw.iter().map(|k| k.to_lowercase()).collect();
        let lowered = find_keywords(&text.to_lowercase(), &lowered_kw, false);

        // Same keywords detected, modulo the original-case reporting.
        let direct_normalized: Vec<String> =
            direct.iter().map(|k| k.to_lowercase()).collect();
        assert_eq!(direct_normalized, lowered);
    }
}

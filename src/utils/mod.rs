pub mod metrics;
pub mod validation;

use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::OnceLock;

fn season_suffix() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| Regex::new(r":.*| - .*|\(.*").expect("season suffix pattern is valid"))
}

/// Base title used to collapse seasons and sequels of one show.
///
/// Drops everything from the first colon, `" - "` separator or opening
/// parenthesis. Falls back to the trimmed title when nothing is left.
pub fn normalize_title(title: &str) -> String {
    let base = season_suffix().replace_all(title, "");
    let base = base.trim();
    if base.is_empty() {
        title.trim().to_string()
    } else {
        base.to_string()
    }
}

pub fn dedup_by_key<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Show: Season 2"), "Show");
        assert_eq!(normalize_title("Gintama - Enchousen"), "Gintama");
        assert_eq!(normalize_title("Clannad (2007)"), "Clannad");
        assert_eq!(normalize_title("Steins;Gate"), "Steins;Gate");
        assert_eq!(normalize_title("  Plain Title  "), "Plain Title");
    }

    #[test]
    fn test_normalize_title_cuts_at_earliest_marker() {
        assert_eq!(normalize_title("A (B): C - D"), "A");
        assert_eq!(normalize_title("Re:Zero kara"), "Re");
        assert_eq!(normalize_title("Movie-Title - Part 1"), "Movie-Title");
    }

    #[test]
    fn test_normalize_title_empty_fallback() {
        assert_eq!(normalize_title(": Only Subtitle "), ": Only Subtitle");
        assert_eq!(normalize_title("(Untitled)"), "(Untitled)");
    }

    #[test]
    fn test_dedup_by_key_keeps_first() {
        let items = vec![("Show", 2), ("Other", 1), ("Show", 1)];
        let kept = dedup_by_key(items, |(name, _)| *name);
        assert_eq!(kept, vec![("Show", 2), ("Other", 1)]);
    }
}

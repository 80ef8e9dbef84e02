//! Comma-joined extra-variation lists (`novas_variacoes`).

use indexmap::IndexSet;

/// Split on commas, trim, upper-case, drop blanks. Order kept.
pub fn parse_variation_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|v| v.trim().to_uppercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Append `additions` to `existing`, skipping values already present.
pub fn merge_variations(existing: &[String], additions: &[String]) -> Vec<String> {
    let mut merged: IndexSet<String> = existing.iter().cloned().collect();
    merged.extend(additions.iter().cloned());
    merged.into_iter().collect()
}

/// Join for storage; `None` when nothing is left.
pub fn join_variations(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(parse_variation_list(" azul , Verde,,  "), vec!["AZUL", "VERDE"]);
        assert!(parse_variation_list("").is_empty());
    }

    #[test]
    fn test_merge_deduplicates_in_order() {
        let existing = vec!["A1".to_string(), "A2".to_string()];
        let added = vec!["A2".to_string(), "B1".to_string(), "B1".to_string()];
        assert_eq!(merge_variations(&existing, &added), vec!["A1", "A2", "B1"]);
    }

    #[test]
    fn test_join() {
        assert_eq!(join_variations(&[]), None);
        assert_eq!(
            join_variations(&["A".to_string(), "B".to_string()]),
            Some("A,B".to_string())
        );
    }
}

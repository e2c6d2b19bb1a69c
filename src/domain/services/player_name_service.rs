//! Player name normalization shared by roster validation and remembered names.

/// Case- and whitespace-insensitive key for a player name
pub fn normalize_player_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Capitalized form: first letter upper case, the rest lower case
pub fn format_display_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Distinct `(normalized, display)` pairs in first-seen order, skipping blanks
pub fn distinct_names<'a, I>(names: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .filter_map(|name| {
            let normalized = normalize_player_name(name);
            if normalized.is_empty() || !seen.insert(normalized.clone()) {
                return None;
            }
            Some((normalized, format_display_name(name)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ignores_case_and_padding() {
        assert_eq!(normalize_player_name("  Amy "), "amy");
        assert_eq!(normalize_player_name("AMY"), normalize_player_name(" amy "));
    }

    #[test]
    fn test_display_name_is_capitalized() {
        assert_eq!(format_display_name("  bOB  "), "Bob");
        assert_eq!(format_display_name("émile"), "Émile");
        assert_eq!(format_display_name("   "), "");
    }

    #[test]
    fn test_distinct_names_keeps_first_spelling() {
        let names = distinct_names(["amy", " AMY", "", "Zoe"]);
        assert_eq!(
            names,
            vec![
                ("amy".to_string(), "Amy".to_string()),
                ("zoe".to_string(), "Zoe".to_string()),
            ]
        );
    }
}

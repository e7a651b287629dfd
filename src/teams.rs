const LOGO_CDN_BASE: &str = "https://a.espncdn.com/i/teamlogos/nba/500";

/// Fallback logo URL for an NBA abbreviation, used when an event carries no
/// logo of its own. The CDN uses city-style slugs for a handful of teams.
pub fn logo_url(abbrev: &str) -> String {
    let upper = abbrev.trim().to_uppercase();
    let slug = match upper.as_str() {
        "GSW" => "gs".to_string(),
        "NYK" => "ny".to_string(),
        "NOP" => "no".to_string(),
        "SAS" => "sa".to_string(),
        "UTA" => "utah".to_string(),
        "WAS" | "WSH" => "wsh".to_string(),
        other => other.to_lowercase(),
    };
    format!("{LOGO_CDN_BASE}/{slug}.png")
}

/// Best-effort abbreviation for a team name when upstream omits one:
/// initials of up to three words, or the first three letters.
pub fn abbreviate(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.len() <= 3 {
        return trimmed.to_uppercase();
    }
    let mut abbr = String::new();
    for part in trimmed.split_whitespace() {
        if let Some(ch) = part.chars().next() {
            abbr.push(ch);
        }
        if abbr.len() >= 3 {
            break;
        }
    }
    if abbr.len() >= 2 {
        return abbr.to_uppercase();
    }
    trimmed.chars().take(3).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_url_regular_slug() {
        assert_eq!(
            logo_url("BOS"),
            "https://a.espncdn.com/i/teamlogos/nba/500/bos.png"
        );
    }

    #[test]
    fn logo_url_irregular_slugs() {
        assert!(logo_url("GSW").ends_with("/gs.png"));
        assert!(logo_url("NOP").ends_with("/no.png"));
        assert!(logo_url("UTA").ends_with("/utah.png"));
        assert!(logo_url("was").ends_with("/wsh.png"));
    }

    #[test]
    fn abbreviate_multiword_name() {
        assert_eq!(abbreviate("New York Knicks"), "NYK");
        assert_eq!(abbreviate("Heat"), "HEA");
    }
}

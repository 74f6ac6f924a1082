//! Best-effort contact details pulled from extracted resume text.

use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
pub(crate) static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}").unwrap()
});
static PHONE_IN_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());

/// Only the top of a resume is searched for the candidate's name.
const NAME_SEARCH_LINES: usize = 3;
const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub fn parse_contact_details(text: &str) -> ContactDetails {
    ContactDetails {
        name: guess_name(text),
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE_RE.find(text).map(|m| m.as_str().trim().to_string()),
    }
}

fn guess_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(NAME_SEARCH_LINES)
        .find(|line| {
            let words = line.split_whitespace().count();
            !line.contains('@')
                && !PHONE_IN_LINE_RE.is_match(line)
                && line.chars().count() < MAX_NAME_LEN
                && (2..=4).contains(&words)
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Q. Doe\njane.doe@example.com | (555) 123-4567\n\nExperience\nSenior Engineer at Acme";

    #[test]
    fn test_parses_all_details() {
        let details = parse_contact_details(RESUME);
        assert_eq!(details.name.as_deref(), Some("Jane Q. Doe"));
        assert_eq!(details.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(details.phone.as_deref(), Some("(555) 123-4567"));
    }

    #[test]
    fn test_name_skips_contact_lines() {
        let text = "jane.doe@example.com\n555-123-4567\nJane Doe\nSkills";
        assert_eq!(guess_name(text).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_name_ignores_single_word_and_long_lines() {
        let text = "RESUME\nA very long opening line that is clearly not anybody's name at all\nSkills";
        assert_eq!(guess_name(text), None);
    }

    #[test]
    fn test_name_only_searches_top_lines() {
        let text = "RESUME\nCURRICULUM\nVITAE\nJane Doe";
        assert_eq!(guess_name(text), None);
    }

    #[test]
    fn test_no_details_in_plain_prose() {
        let details = parse_contact_details("nothing useful here");
        assert_eq!(details.email, None);
        assert_eq!(details.phone, None);
    }
}

//! Client name extraction from the API's `source` markup.
//!
//! The API reports the posting client as an anchor fragment such as
//! `<a href="https://mobile.twitter.com" rel="nofollow">Twitter Web App</a>`.
//! The name is cut out by position: everything after the first `>` up to the
//! last four bytes, which are assumed to be `</a>`. Markup without a `>` is
//! cut from the start. Nothing checks that the tail really is `</a>`.

use crate::app::{Result, TweetstatsError};

/// Length of the closing tag stripped from the end of the markup.
const CLOSING_TAG_LEN: usize = "</a>".len();

pub fn client_name(source: &str) -> Result<&str> {
    let start = source.find('>').map(|idx| idx + 1).unwrap_or(0);
    let end = source
        .len()
        .checked_sub(CLOSING_TAG_LEN)
        .ok_or_else(|| TweetstatsError::MalformedSource(source.to_string()))?;

    if start > end {
        return Err(TweetstatsError::MalformedSource(source.to_string()));
    }

    source
        .get(start..end)
        .ok_or_else(|| TweetstatsError::MalformedSource(source.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_markup() {
        let source = r#"<a href="https://mobile.twitter.com" rel="nofollow">Twitter Web App</a>"#;
        assert_eq!(client_name(source).unwrap(), "Twitter Web App");
    }

    #[test]
    fn test_name_with_non_ascii() {
        let source = r#"<a href="https://example.com">Tweetbot für iOS</a>"#;
        assert_eq!(client_name(source).unwrap(), "Tweetbot für iOS");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(client_name("<a></a>").unwrap(), "");
    }

    #[test]
    fn test_without_markup_cuts_from_start() {
        // No '>' means the cut starts at zero; the last four bytes still go.
        assert_eq!(client_name("Twitter for iPhone").unwrap(), "Twitter for iP");
    }

    #[test]
    fn test_too_short_is_malformed() {
        assert!(matches!(
            client_name("web"),
            Err(TweetstatsError::MalformedSource(_))
        ));
        assert!(matches!(
            client_name(""),
            Err(TweetstatsError::MalformedSource(_))
        ));
    }

    #[test]
    fn test_bracket_inside_closing_tag_is_malformed() {
        // First '>' sits within the last four bytes.
        assert!(matches!(
            client_name("ab>cd"),
            Err(TweetstatsError::MalformedSource(_))
        ));
    }

    #[test]
    fn test_cut_inside_multibyte_char_is_malformed() {
        // "é" is two bytes; len - 4 lands between them.
        assert!(matches!(
            client_name(">xéabc"),
            Err(TweetstatsError::MalformedSource(_))
        ));
    }
}

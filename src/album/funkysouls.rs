use super::{AlbumMeta, ParseError, TitleParser};

/// Origin URL of funkysouls.com entries as reported by feedly.
pub const FUNKYSOULS_ORIGIN: &str = "http://funkysouls.com/";

/// Titles of the form `Artist - Album [year, format, ...]`.
///
/// The artist is everything before the first '-'. The album is the rest,
/// cut at the last '[' to drop trailing annotations (and any '-' separators
/// left dangling in front of them). Release dates are not extracted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunkySouls;

impl TitleParser for FunkySouls {
    fn parse(&self, title: &str) -> Result<AlbumMeta, ParseError> {
        let (artist, rest) = title
            .split_once('-')
            .ok_or_else(|| ParseError::MalformedTitle(title.to_string()))?;

        // Separators left dangling in front of the annotation go with it.
        let rest = match rest.rfind('[') {
            Some(pos) => rest[..pos].trim_end_matches(|c: char| c == '-' || c.is_whitespace()),
            None => rest,
        };

        Ok(AlbumMeta {
            artist: artist.trim().to_string(),
            title: rest.trim().to_string(),
            release_date: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(title: &str) -> Result<AlbumMeta, ParseError> {
        FunkySouls.parse(title)
    }

    fn meta(artist: &str, title: &str) -> AlbumMeta {
        AlbumMeta {
            artist: artist.to_string(),
            title: title.to_string(),
            release_date: None,
        }
    }

    #[test]
    fn test_strips_bracketed_annotation() {
        assert_eq!(
            parse("Artist Name - Some Album [2019, FLAC]").unwrap(),
            meta("Artist Name", "Some Album")
        );
    }

    #[test]
    fn test_splits_on_first_dash_only() {
        assert_eq!(
            parse("Artist - Title - Extra - [tag]").unwrap(),
            meta("Artist", "Title - Extra")
        );
    }

    #[test]
    fn test_repeated_dangling_separators_dropped() {
        assert_eq!(parse("A - Title - - [x]").unwrap(), meta("A", "Title"));
        assert_eq!(parse("A - Title --  -[x]").unwrap(), meta("A", "Title"));
    }

    #[test]
    fn test_no_separator_is_malformed() {
        assert_eq!(
            parse("No Separator Here"),
            Err(ParseError::MalformedTitle("No Separator Here".to_string()))
        );
    }

    #[test]
    fn test_malformed_error_names_title() {
        let err = parse("Just A Title").unwrap_err();
        assert!(err.to_string().contains("Just A Title"));
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            parse("  Artist   -   Title  ").unwrap(),
            meta("Artist", "Title")
        );
    }

    #[test]
    fn test_without_brackets_passes_through() {
        assert_eq!(
            parse("Artist - Live at the Roundhouse (Deluxe)").unwrap(),
            meta("Artist", "Live at the Roundhouse (Deluxe)")
        );
    }

    #[test]
    fn test_cuts_at_last_bracket() {
        assert_eq!(
            parse("Artist - Album [Disc 1] [2020, MP3]").unwrap(),
            meta("Artist", "Album [Disc 1]")
        );
    }

    #[test]
    fn test_dash_at_edges_yields_empty_fields() {
        assert_eq!(parse("-").unwrap(), meta("", ""));
        assert_eq!(parse("Artist -").unwrap(), meta("Artist", ""));
    }

    #[test]
    fn test_inner_dashes_kept_without_brackets() {
        assert_eq!(
            parse("Artist - Title - Extra -").unwrap(),
            meta("Artist", "Title - Extra -")
        );
    }

    #[test]
    fn test_release_date_never_set() {
        assert_eq!(parse("A - B [2019-05-01]").unwrap().release_date, None);
    }
}

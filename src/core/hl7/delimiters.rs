//! HL7v2 delimiter grammar
//!
//! An HL7v2 message describes its own grammar: the `MSH` header carries the field
//! separator as its fourth character, immediately followed by the encoding
//! characters (component, repetition, escape and subcomponent separators).
//! Segments are terminated by a carriage return.

use crate::domain::ConversionError;

/// Name of the segment every message must start with
pub const HEADER_SEGMENT: &str = "MSH";

/// Standard HL7v2 segment terminator
pub const SEGMENT_TERMINATOR: char = '\r';

/// `MSH`, the field separator and the component, repetition and escape characters
pub const MIN_HEADER_LEN: usize = 7;

const DEFAULT_SUBCOMPONENT: char = '&';

/// Delimiters declared by a message header
///
/// # Examples
///
/// ```
/// use hl7bridge::core::hl7::Delimiters;
///
/// let delimiters = Delimiters::detect("MSH|^~\\&|SendingApp\r").unwrap();
/// assert_eq!(delimiters, Delimiters::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub field: char,
    pub component: char,
    pub repetition: char,
    pub escape: char,
    pub subcomponent: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: DEFAULT_SUBCOMPONENT,
        }
    }
}

impl Delimiters {
    /// Reads the delimiters declared by the message header
    ///
    /// Leading segment terminators are skipped. The subcomponent separator is
    /// optional and defaults to `&`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::MalformedMessage`] if the message does not start
    /// with `MSH`, if the header is too short to declare its delimiters, if the
    /// field separator is alphanumeric or whitespace, or if two declared delimiters
    /// are the same character.
    pub fn detect(raw: &str) -> Result<Self, ConversionError> {
        let header = raw.trim_start_matches(is_segment_break);

        if !header.starts_with(HEADER_SEGMENT) {
            let found: String = header.chars().take(HEADER_SEGMENT.len()).collect();
            return Err(ConversionError::MalformedMessage(format!(
                "message must start with a {HEADER_SEGMENT} segment, found '{found}'"
            )));
        }

        let mut rest = header[HEADER_SEGMENT.len()..].chars();
        let field = rest.next().filter(|c| !is_segment_break(*c)).ok_or_else(|| {
            ConversionError::MalformedMessage(format!(
                "{HEADER_SEGMENT} header is shorter than the {MIN_HEADER_LEN} characters needed to declare delimiters"
            ))
        })?;

        let encoding: Vec<char> = rest
            .take_while(|c| *c != field && !is_segment_break(*c))
            .collect();

        if encoding.len() < 3 {
            return Err(ConversionError::MalformedMessage(format!(
                "{HEADER_SEGMENT} header declares {} encoding characters, at least 3 are required",
                encoding.len()
            )));
        }

        let delimiters = Self {
            field,
            component: encoding[0],
            repetition: encoding[1],
            escape: encoding[2],
            subcomponent: encoding.get(3).copied().unwrap_or(DEFAULT_SUBCOMPONENT),
        };

        delimiters.ensure_usable(encoding.len() > 3)?;
        Ok(delimiters)
    }

    /// The encoding characters as they appear in `MSH-2`
    pub fn encoding_characters(&self) -> String {
        [self.component, self.repetition, self.escape, self.subcomponent]
            .iter()
            .collect()
    }

    fn ensure_usable(&self, subcomponent_declared: bool) -> Result<(), ConversionError> {
        if self.field.is_alphanumeric() || self.field.is_whitespace() {
            return Err(ConversionError::MalformedMessage(format!(
                "field separator {:?} must not be alphanumeric or whitespace",
                self.field
            )));
        }

        let mut declared = vec![
            ("field", self.field),
            ("component", self.component),
            ("repetition", self.repetition),
            ("escape", self.escape),
        ];
        if subcomponent_declared {
            declared.push(("subcomponent", self.subcomponent));
        }

        for (i, (name, c)) in declared.iter().enumerate() {
            if let Some((other, _)) = declared[..i].iter().find(|(_, o)| o == c) {
                return Err(ConversionError::MalformedMessage(format!(
                    "{name} separator {c:?} is already used as the {other} separator"
                )));
            }
        }

        Ok(())
    }
}

/// Splits a raw message into segment strings
///
/// Carriage return is the HL7 terminator; bare `\n` and `\r\n` are accepted too.
/// Empty segments, such as the one after a terminal separator, are discarded.
pub fn split_segments(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(is_segment_break)
        .filter(|segment| !segment.trim().is_empty())
}

fn is_segment_break(c: char) -> bool {
    c == SEGMENT_TERMINATOR || c == '\n'
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_detect_standard_delimiters() {
        let delimiters = Delimiters::detect("MSH|^~\\&|App|Facility\rPID|||1\r").unwrap();
        assert_eq!(delimiters, Delimiters::default());
        assert_eq!(delimiters.encoding_characters(), "^~\\&");
    }

    #[test]
    fn test_detect_custom_delimiters() {
        let delimiters = Delimiters::detect("MSH#$*!@#App").unwrap();
        assert_eq!(delimiters.field, '#');
        assert_eq!(delimiters.component, '$');
        assert_eq!(delimiters.repetition, '*');
        assert_eq!(delimiters.escape, '!');
        assert_eq!(delimiters.subcomponent, '@');
    }

    #[test]
    fn test_detect_defaults_subcomponent() {
        let delimiters = Delimiters::detect("MSH|^~\\|App").unwrap();
        assert_eq!(delimiters.subcomponent, '&');
    }

    #[test]
    fn test_detect_accepts_unusual_encoding_characters() {
        let delimiters = Delimiters::detect("MSH|^~ &|App\rPID|||1\r").unwrap();
        assert_eq!(delimiters.escape, ' ');

        let delimiters = Delimiters::detect("MSH|ABCD|App").unwrap();
        assert_eq!(delimiters.component, 'A');
        assert_eq!(delimiters.subcomponent, 'D');
    }

    #[test]
    fn test_detect_skips_leading_blank_lines() {
        assert!(Delimiters::detect("\r\n\rMSH|^~\\&|App").is_ok());
    }

    #[test_case("PID|||1111111111" ; "wrong first segment")]
    #[test_case("" ; "empty input")]
    #[test_case("MS" ; "truncated name")]
    #[test_case("MSH" ; "no field separator")]
    #[test_case("MSH|^~" ; "two encoding characters")]
    #[test_case("MSH|^~|App" ; "encoding field too short")]
    #[test_case("MSH\r|^~\\&" ; "terminator in header")]
    #[test_case("MSHA^~\\&" ; "alphanumeric field separator")]
    #[test_case("MSH|^^\\&|" ; "repeated separator")]
    #[test_case("MSH ^~\\&" ; "whitespace field separator")]
    fn test_detect_rejects_malformed_header(raw: &str) {
        let result = Delimiters::detect(raw);
        assert!(matches!(result, Err(ConversionError::MalformedMessage(_))));
    }

    #[test]
    fn test_split_segments_discards_empty() {
        let segments: Vec<&str> = split_segments("MSH|^~\\&\rPID|1\r\rPV1|1\r").collect();
        assert_eq!(segments, vec!["MSH|^~\\&", "PID|1", "PV1|1"]);
    }

    #[test]
    fn test_split_segments_accepts_line_feeds() {
        let segments: Vec<&str> = split_segments("MSH|^~\\&\r\nPID|1\nPV1|1\n").collect();
        assert_eq!(segments, vec!["MSH|^~\\&", "PID|1", "PV1|1"]);
    }
}

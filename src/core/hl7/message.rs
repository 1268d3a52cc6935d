//! HL7v2 message model and tokenizer
//!
//! A [`Message`] is an ordered list of [`Segment`]s, each an ordered list of
//! [`Field`]s, each an ordered list of components. Positions are 1-based as in
//! the HL7 standard; field 0 of every segment holds the segment name.

use super::address::{self, FieldAddress};
use super::delimiters::{split_segments, Delimiters, HEADER_SEGMENT};
use crate::domain::ConversionError;

/// A single field of a segment
///
/// The raw text is kept verbatim. Components are addressed within the first
/// repetition; every repetition is available through [`Field::repetitions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    raw: String,
    repetitions: Vec<Vec<String>>,
}

impl Field {
    fn parse(raw: &str, delimiters: &Delimiters) -> Self {
        let repetitions = raw
            .split(delimiters.repetition)
            .map(|repetition| {
                repetition
                    .split(delimiters.component)
                    .map(str::to_string)
                    .collect()
            })
            .collect();

        Self {
            raw: raw.to_string(),
            repetitions,
        }
    }

    /// A field that must not be split, such as a segment name or `MSH-2`
    fn verbatim(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            repetitions: vec![vec![raw.to_string()]],
        }
    }

    /// Raw field text, delimiters included
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Components of the first repetition
    pub fn components(&self) -> &[String] {
        self.repetitions.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Component at a 1-based position of the first repetition
    pub fn component(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.components().get(index))
            .map(String::as_str)
    }

    pub fn repetitions(&self) -> &[Vec<String>] {
        &self.repetitions
    }
}

/// A named segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    fields: Vec<Field>,
}

impl Segment {
    fn parse(line: &str, delimiters: &Delimiters) -> Self {
        let mut pieces = line.split(delimiters.field);
        let name = pieces.next().unwrap_or_default();
        let mut fields = vec![Field::verbatim(name)];

        // MSH-1 is the field separator itself and MSH-2 holds the encoding
        // characters, which would be mangled by a component split.
        if name == HEADER_SEGMENT {
            fields.push(Field::verbatim(&delimiters.field.to_string()));
            if let Some(encoding) = pieces.next() {
                fields.push(Field::verbatim(encoding));
            }
        }

        fields.extend(pieces.map(|piece| Field::parse(piece, delimiters)));
        Self { fields }
    }

    pub fn name(&self) -> &str {
        self.fields[0].as_str()
    }

    /// Field at a 1-based position; position 0 is the segment name
    pub fn field(&self, position: usize) -> Option<&Field> {
        self.fields.get(position)
    }

    /// Number of fields after the segment name
    pub fn field_count(&self) -> usize {
        self.fields.len() - 1
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields[1..]
    }
}

/// A tokenized HL7v2 message
///
/// # Examples
///
/// ```
/// use hl7bridge::core::hl7::tokenize;
///
/// let message = tokenize("MSH|^~\\&|App\rPID|||123^^^NHS||Doe^John\r").unwrap();
/// assert_eq!(message.component("PID", 3, 1), Some("123"));
/// assert_eq!(message.component("PID", 5, 2), Some("John"));
/// assert_eq!(message.field("PID", 9), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    delimiters: Delimiters,
    segments: Vec<Segment>,
}

impl Message {
    /// Tokenizes a raw message using the delimiters its header declares
    ///
    /// # Errors
    ///
    /// Fails only when the header cannot be identified; short or missing fields
    /// in the body never cause an error.
    pub fn parse(raw: &str) -> Result<Self, ConversionError> {
        let delimiters = Delimiters::detect(raw)?;
        let segments = split_segments(raw)
            .map(|line| Segment::parse(line, &delimiters))
            .collect();

        Ok(Self {
            delimiters,
            segments,
        })
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// All segments in message order, repeated names included
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment with the given name
    ///
    /// Later segments sharing the name are not visible through the field
    /// accessors; use [`Message::segments`] to reach them.
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.name() == name)
    }

    /// Field at a 1-based position of the first segment named `segment`
    pub fn field(&self, segment: &str, position: usize) -> Option<&Field> {
        self.segment(segment)?.field(position)
    }

    /// Component at 1-based field and component positions
    pub fn component(&self, segment: &str, field: usize, component: usize) -> Option<&str> {
        self.field(segment, field)?.component(component)
    }

    /// Reads the value an address points to
    ///
    /// Field addresses yield the raw field text, component addresses the single
    /// component.
    pub fn value_at(&self, address: FieldAddress) -> Option<&str> {
        match address.component {
            Some(component) => self.component(address.segment, address.field, component),
            None => self
                .field(address.segment, address.field)
                .map(Field::as_str),
        }
    }

    /// `MSH-9`, e.g. `ADT^A01`
    pub fn message_type(&self) -> Option<&str> {
        self.value_at(address::MESSAGE_TYPE)
            .filter(|value| !value.is_empty())
    }

    /// `MSH-10`
    pub fn control_id(&self) -> Option<&str> {
        self.value_at(address::MESSAGE_CONTROL_ID)
            .filter(|value| !value.is_empty())
    }

    /// `MSH-12`
    pub fn version(&self) -> Option<&str> {
        self.value_at(address::VERSION_ID)
            .filter(|value| !value.is_empty())
    }
}

/// Tokenizes a raw HL7v2 message into a [`Message`]
pub fn tokenize(raw: &str) -> Result<Message, ConversionError> {
    Message::parse(raw)
}

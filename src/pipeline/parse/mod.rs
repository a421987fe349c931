mod gpx;

use crate::error::ParseError;
use crate::types::document::GpxDocument;

pub use gpx::GpxParser;

pub trait Parser {
    fn parse(&self, bytes: &[u8]) -> Result<GpxDocument, ParseError>;
}

pub fn parse(bytes: &[u8]) -> Result<GpxDocument, ParseError> {
    GpxParser.parse(bytes)
}

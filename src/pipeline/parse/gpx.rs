use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::document::{GpxDocument, PointExtensions, RawPoint, Segment, Track};

pub struct GpxParser;

/// Parser state while walking the event stream. Elements are matched by
/// local name, so `gpxtpx:hr` and `ns3:hr` both land in `hr`. `stack` holds
/// the local names of the currently open elements, innermost last.
#[derive(Default)]
struct Builder {
    document: GpxDocument,
    track: Option<Track>,
    segment: Option<Segment>,
    point: Option<RawPoint>,
    stack: Vec<String>,
}

impl Builder {
    fn open(&mut self, e: &BytesStart<'_>, self_closing: bool) -> Result<(), ParseError> {
        let name = local_name(e.local_name().into_inner())?;

        match name {
            "trk" => {
                self.track = Some(Track::default());
                if self_closing {
                    self.finish("trk");
                }
            }
            "trkseg" if self.track.is_some() => {
                self.segment = Some(Segment::default());
                if self_closing {
                    self.finish("trkseg");
                }
            }
            "trkpt" if self.segment.is_some() => {
                let mut point = RawPoint::default();
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                    let value = attr
                        .unescape_value()
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                    match local_name(attr.key.local_name().into_inner())? {
                        "lat" => point.lat = Some(value.trim().to_string()),
                        "lon" => point.lon = Some(value.trim().to_string()),
                        _ => {}
                    }
                }
                self.point = Some(point);
                if self_closing {
                    self.finish("trkpt");
                }
            }
            _ => {}
        }

        if !self_closing {
            self.stack.push(name.to_string());
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let (current, parent) = innermost(&self.stack);
        if let Some(point) = self.point.as_mut() {
            let value = Some(text.to_string());
            match current {
                "ele" => point.elevation = value,
                "time" => point.time = value,
                "hr" => point.extensions.get_or_insert_with(PointExtensions::default).heart_rate = value,
                "cad" => point.extensions.get_or_insert_with(PointExtensions::default).cadence = value,
                _ => {}
            }
        } else if parent == "trk" {
            // Only direct children of <trk>; <link><type> and friends are ignored.
            if let Some(track) = self.track.as_mut() {
                match current {
                    "name" => track.name = Some(text.to_string()),
                    "type" => track.category = Some(text.to_string()),
                    _ => {}
                }
            }
        }
    }

    fn close(&mut self, name: &str) {
        self.stack.pop();
        self.finish(name);
    }

    fn finish(&mut self, name: &str) {
        match name {
            "trkpt" => {
                if let (Some(point), Some(segment)) = (self.point.take(), self.segment.as_mut()) {
                    segment.points.push(point);
                }
            }
            "trkseg" => {
                if let (Some(segment), Some(track)) = (self.segment.take(), self.track.as_mut()) {
                    track.segments.push(segment);
                }
            }
            "trk" => {
                if let Some(track) = self.track.take() {
                    self.document.tracks.push(track);
                }
            }
            _ => {}
        }
    }
}

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<GpxDocument, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut builder = Builder::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => builder.open(&e, false)?,
                Ok(Event::Empty(e)) => builder.open(&e, true)?,
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                    builder.text(text.trim());
                }
                Ok(Event::CData(e)) => {
                    let text = std::str::from_utf8(&e)
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                    builder.text(text.trim());
                }
                Ok(Event::End(e)) => {
                    let name = local_name(e.local_name().into_inner())?.to_string();
                    builder.close(&name);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ParseError::InvalidGpx(format!(
                        "{} at byte {}",
                        e,
                        reader.buffer_position()
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        let document = builder.document;
        match document.tracks.first() {
            Some(track) if !track.segments.is_empty() => Ok(document),
            _ => Err(ParseError::MissingTrackSegments),
        }
    }
}

/// The innermost open element and its parent, empty when absent.
fn innermost(stack: &[String]) -> (&str, &str) {
    match stack {
        [.., parent, current] => (current.as_str(), parent.as_str()),
        [current] => (current.as_str(), ""),
        [] => ("", ""),
    }
}

fn local_name(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidGpx(e.to_string()))
}

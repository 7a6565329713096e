// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io;
use std::str::from_utf8;

use quick_xml::events::{BytesStart, Event};

use super::model;
use crate::VertexId;

/// Parser is a trait for objects which can parse XML.
///
/// This trait only exists to fix the mismatch of
/// [quick_xml::Reader::read_event] when working on buffered data
/// and [quick_xml::Reader::read_event_into] when working on IO.
pub(super) trait Parser {
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<Event<'a>>;
}

/// IoParser implements [Parser] over an [std::io::BufRead].
pub(super) struct IoParser<R: io::BufRead>(quick_xml::Reader<R>, Vec<u8>);

impl<R: io::BufRead> IoParser<R> {
    #[inline]
    fn new(reader: R) -> Self {
        Self(quick_xml::Reader::from_reader(reader), Vec::default())
    }
}

impl<R: io::BufRead> Parser for IoParser<R> {
    #[inline]
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<Event<'a>> {
        self.1.clear();
        self.0.read_event_into(&mut self.1)
    }
}

/// BufParser implements [Parser] over a slice of bytes (`&[u8]`).
pub(super) struct BufParser<'a>(quick_xml::Reader<&'a [u8]>);

impl<'a> BufParser<'a> {
    #[inline]
    fn new(data: &'a [u8]) -> Self {
        Self(quick_xml::Reader::from_reader(data))
    }
}

impl<'a> Parser for BufParser<'a> {
    #[inline]
    fn read_event<'b>(&'b mut self) -> quick_xml::Result<Event<'b>> {
        self.0.read_event()
    }
}

/// Reader reads osm [Features](model::Feature) from an XML file.
pub(super) struct Reader<P: Parser> {
    parser: P,
    eof: bool,
}

impl<P: Parser> Reader<P> {
    #[inline]
    fn new(parser: P) -> Self {
        Self { parser, eof: false }
    }
}

impl<P: Parser> Iterator for Reader<P> {
    type Item = Result<model::Feature, quick_xml::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut f: Option<model::Feature> = None;

        while !self.eof {
            let event = match self.parser.read_event() {
                Ok(e) => e,
                Err(e) => return Some(Err(e)),
            };

            match event {
                Event::Empty(start) => match start.local_name().as_ref() {
                    b"node" => {
                        if let Some(n) = parse_node(&start) {
                            return Some(Ok(model::Feature::Node(n)));
                        }
                    }
                    // "way" can't be self-closing
                    b"tag" => {
                        if let Some(tags) = feature_tags(&mut f) {
                            if let Some((k, v)) = parse_tag(&start) {
                                tags.insert(k, v);
                            }
                        }
                    }
                    b"nd" => {
                        if let Some(model::Feature::Way(ref mut w)) = f {
                            w.nodes.push(parse_nd(&start));
                        }
                    }
                    _ => {}
                },

                Event::Start(start) => match start.local_name().as_ref() {
                    b"node" => f = parse_node(&start).map(model::Feature::Node),
                    b"way" => f = parse_way(&start).map(model::Feature::Way),
                    // "tag" and "nd" must be self-closing, relations are skipped
                    _ => {}
                },

                Event::End(end) => match end.local_name().as_ref() {
                    b"node" | b"way" => {
                        if let Some(f) = f.take() {
                            return Some(Ok(f));
                        }
                    }
                    _ => {}
                },

                Event::Eof => {
                    self.eof = true;
                }

                _ => {}
            }
        }

        f.map(Ok)
    }
}

impl<'a> Reader<BufParser<'a>> {
    #[inline]
    pub(super) fn from_buffer(data: &'a [u8]) -> Self {
        Self::new(BufParser::new(data))
    }
}

impl<R: io::BufRead> Reader<IoParser<R>> {
    #[inline]
    pub(super) fn from_io(reader: R) -> Self {
        Self::new(IoParser::new(reader))
    }
}

/// Parses an attribute value as a number, logging (and returning `None`) on failure.
fn parse_number<T: std::str::FromStr>(element: &str, key: &str, value: &[u8]) -> Option<T> {
    let parsed = from_utf8(value).ok().and_then(|s| s.parse().ok());
    if parsed.is_none() {
        log::debug!(
            "{element}: invalid {key}={:?} - skipping",
            String::from_utf8_lossy(value)
        );
    }
    parsed
}

fn parse_node(start: &BytesStart<'_>) -> Option<model::Node> {
    let mut id: Option<u64> = None;
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"id" => id = Some(parse_number("node", "id", &attr.value)?),
            b"lat" => lat = Some(parse_number("node", "lat", &attr.value)?),
            b"lon" => lon = Some(parse_number("node", "lon", &attr.value)?),
            _ => {}
        }
    }

    match (id, lat, lon) {
        (Some(id), Some(lat), Some(lon)) if id != 0 => Some(model::Node {
            id,
            lat,
            lon,
            tags: HashMap::default(),
        }),
        _ => {
            log::debug!("node {id:?}: missing id or position - skipping");
            None
        }
    }
}

fn parse_way(start: &BytesStart<'_>) -> Option<model::Way> {
    let mut id: u64 = 0;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"id" {
            id = parse_number("way", "id", &attr.value)?;
        }
    }

    if id != 0 {
        Some(model::Way {
            id,
            nodes: Vec::default(),
            tags: HashMap::default(),
        })
    } else {
        None
    }
}

fn parse_tag(start: &BytesStart<'_>) -> Option<(String, String)> {
    let mut k = None;
    let mut v = None;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"k" => k = attr.unescape_value().ok().map(|s| s.into_owned()),
            b"v" => v = attr.unescape_value().ok().map(|s| s.into_owned()),
            _ => {}
        }
    }

    k.map(|k| (k, v.unwrap_or_default()))
}

fn parse_nd(start: &BytesStart<'_>) -> Option<VertexId> {
    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"ref" {
            return parse_number::<VertexId>("nd", "ref", &attr.value).filter(|&id| id != 0);
        }
    }
    log::debug!("nd: missing ref");
    None
}

fn feature_tags(f: &mut Option<model::Feature>) -> Option<&mut HashMap<String, String>> {
    match f {
        None => None,
        Some(model::Feature::Node(ref mut n)) => Some(&mut n.tags),
        Some(model::Feature::Way(ref mut w)) => Some(&mut w.tags),
    }
}

#[cfg(test)]
mod tests {
    use super::model::{Feature, Node, Way};
    use super::*;

    macro_rules! tags {
        {} => { HashMap::default() };
        {$( $k:literal : $v:literal ),+} => {
            HashMap::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    const DATA: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="37.85" lon="-122.27"/>
  <node id="2" lat="37.86" lon="-122.28">
    <tag k="name" v="Shattuck &amp; Rose"/>
  </node>
  <node id="3" lat="north" lon="-122.28"/>
  <node id="-4" lat="37.86" lon="-122.28"/>
  <way id="10">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="residential"/>
  </way>
  <way id="11">
    <nd ref="1"/>
    <nd ref="-5"/>
    <nd ref="2"/>
    <tag k="highway" v="service"/>
  </way>
  <relation id="20">
    <member type="way" ref="10" role="from"/>
    <tag k="type" v="restriction"/>
  </relation>
</osm>
"#;

    fn expected() -> Vec<Feature> {
        vec![
            Feature::Node(Node {
                id: 1,
                lat: 37.85,
                lon: -122.27,
                tags: tags! {},
            }),
            Feature::Node(Node {
                id: 2,
                lat: 37.86,
                lon: -122.28,
                tags: tags! {"name": "Shattuck & Rose"},
            }),
            Feature::Way(Way {
                id: 10,
                nodes: vec![Some(1), Some(2)],
                tags: tags! {"highway": "residential"},
            }),
            Feature::Way(Way {
                id: 11,
                nodes: vec![Some(1), None, Some(2)],
                tags: tags! {"highway": "service"},
            }),
        ]
    }

    #[test]
    fn parse_from_buf() -> Result<(), quick_xml::Error> {
        let features = Reader::from_buffer(DATA).collect::<Result<Vec<_>, _>>()?;
        assert_eq!(features, expected());
        Ok(())
    }

    #[test]
    fn parse_from_io() -> Result<(), quick_xml::Error> {
        let features =
            Reader::from_io(io::Cursor::new(DATA)).collect::<Result<Vec<_>, _>>()?;
        assert_eq!(features, expected());
        Ok(())
    }

    #[test]
    fn syntax_error() {
        let data: &[u8] = b"<osm><node id=\"1\" lat=\"1\" lon=\"1\"></way></osm>";
        assert!(Reader::from_buffer(data).any(|f| f.is_err()));
    }
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use graph_builder::GraphBuilder;

use crate::osm::Profile;
use crate::RoadGraph;

mod graph_builder;
mod model;
mod xml;

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

/// Additional controls for interpreting OSM data as a [RoadGraph].
#[derive(Debug)]
pub struct Options<'a> {
    /// Which OSM ways should be converted into roads.
    pub profile: &'a Profile<'a>,

    /// Format of the input data.
    pub file_format: FileFormat,

    /// Filter nodes by a specific bounding box. In order: left (min lon), bottom (min lat),
    /// right (max lon), top (max lat). Ignored if all values are set to zero, or at least one
    /// of them is not finite.
    pub bbox: [f64; 4],
}

/// Error which can occur when loading OSM data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Guesses the format of OSM data by looking at its first bytes, without consuming them.
fn detect_format<R: BufRead>(reader: &mut R) -> io::Result<FileFormat> {
    let head = reader.fill_buf()?;
    let format = if head.starts_with(&[0x1f, 0x8b]) {
        FileFormat::XmlGz
    } else if head.starts_with(b"BZh") {
        FileFormat::XmlBz2
    } else {
        FileFormat::Xml
    };
    log::debug!("detected file format: {format:?}");
    Ok(format)
}

/// Parse OSM features from a reader into a [RoadGraph] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
/// Disconnected vertices are not removed - this is done by the [Router](crate::Router).
pub fn add_features_from_io<'a, R: io::Read>(
    g: &'a mut RoadGraph,
    options: &'a Options<'a>,
    reader: R,
) -> Result<(), Error> {
    let mut b = io::BufReader::new(reader);
    let format = match options.file_format {
        FileFormat::Unknown => detect_format(&mut b)?,
        format => format,
    };

    match format {
        FileFormat::Unknown | FileFormat::Xml => {
            let r = xml::Reader::from_io(b);
            GraphBuilder::new(g, options).add_features(r)?;
        }

        FileFormat::XmlGz => {
            let d = flate2::bufread::MultiGzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            GraphBuilder::new(g, options).add_features(r)?;
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::bufread::MultiBzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            GraphBuilder::new(g, options).add_features(r)?;
        }
    }

    Ok(())
}

/// Parse OSM features from a file at the provided path into a [RoadGraph] as per the provided [Options].
pub fn add_features_from_file<'a, P: AsRef<Path>>(
    g: &'a mut RoadGraph,
    options: &'a Options<'a>,
    path: P,
) -> Result<(), Error> {
    let f = File::open(path)?;
    add_features_from_io(g, options, f)
}

/// Parse OSM features from a static buffer into a [RoadGraph] as per the provided [Options].
pub fn add_features_from_buffer<'a>(
    g: &'a mut RoadGraph,
    options: &'a Options<'a>,
    data: &[u8],
) -> Result<(), Error> {
    let format = match options.file_format {
        FileFormat::Unknown => detect_format(&mut &data[..])?,
        format => format,
    };

    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        let r = xml::Reader::from_buffer(data);
        GraphBuilder::new(g, options).add_features(r)?;
        Ok(())
    } else {
        // Wrap the buffer in a cursor and use the IO path
        let cursor = io::Cursor::new(data);
        let options = Options {
            file_format: format,
            ..*options
        };
        add_features_from_io(g, &options, cursor)
    }
}

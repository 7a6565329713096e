// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use snaproute::{osm, RoadGraph, Route, RouteOutcome, Router, RouterOptions};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] osm::Error);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Unknown,
    Xml,
    XmlGz,
    XmlBz2,
}

impl From<Format> for osm::FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Unknown => osm::FileFormat::Unknown,
            Format::Xml => osm::FileFormat::Xml,
            Format::XmlGz => osm::FileFormat::XmlGz,
            Format::XmlBz2 => osm::FileFormat::XmlBz2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileName {
    Car,
    Foot,
}

impl ProfileName {
    fn profile(self) -> &'static osm::Profile<'static> {
        match self {
            ProfileName::Car => &osm::CAR_PROFILE,
            ProfileName::Foot => &osm::FOOT_PROFILE,
        }
    }
}

/// Snaps two positions onto an OSM road network and prints the shortest route between them as GeoJSON.
#[derive(Parser)]
struct Cli {
    /// Format of the OSM file
    #[arg(long, value_enum, default_value_t = Format::Unknown)]
    format: Format,

    /// Which ways are routable
    #[arg(long, value_enum, default_value_t = ProfileName::Car)]
    profile: ProfileName,

    /// Maximum number of vertices expanded by the search
    #[arg(long, default_value_t = snaproute::DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Only load nodes within "min_lon,min_lat,max_lon,max_lat"
    #[arg(long, value_delimiter = ',', num_args = 4, allow_negative_numbers = true)]
    bbox: Option<Vec<f64>>,

    /// The path to the OSM file
    osm_file: PathBuf,

    /// Longitude of the start point
    #[arg(allow_negative_numbers = true)]
    start_lon: f64,

    /// Latitude of the start point
    #[arg(allow_negative_numbers = true)]
    start_lat: f64,

    /// Longitude of the end point
    #[arg(allow_negative_numbers = true)]
    end_lon: f64,

    /// Latitude of the end point
    #[arg(allow_negative_numbers = true)]
    end_lat: f64,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let bbox = match cli.bbox.as_deref() {
        Some(&[left, bottom, right, top]) => [left, bottom, right, top],
        _ => [0.0; 4],
    };
    let options = osm::Options {
        profile: cli.profile.profile(),
        file_format: cli.format.into(),
        bbox,
    };
    let g = load_graph(&cli.osm_file, &options)?;

    let router = Router::new(
        g,
        RouterOptions {
            step_limit: Some(cli.step_limit),
            ..RouterOptions::default()
        },
    );

    let outcome = router.shortest_path(cli.start_lon, cli.start_lat, cli.end_lon, cli.end_lat)?;
    match outcome {
        RouteOutcome::Found(route) => {
            log::info!(
                "found route through {} vertices, {:.3} miles long",
                route.vertices.len(),
                route.cost
            );
            print_route(router.graph(), &route);
        }
        RouteOutcome::NoPath => {
            log::warn!("no route between the provided positions");
            println!("{{\"type\": \"FeatureCollection\", \"features\": []}}");
        }
    }

    Ok(())
}

fn load_graph<P: AsRef<Path>>(path: P, options: &osm::Options) -> Result<RoadGraph, GraphLoadError> {
    let mut g = RoadGraph::default();
    match osm::add_features_from_file(&mut g, options, path.as_ref()) {
        Ok(()) => Ok(g),
        Err(e) => Err(GraphLoadError(PathBuf::from(path.as_ref()), e)),
    }
}

fn print_route(g: &RoadGraph, route: &Route) {
    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!("      \"properties\": {{");
    println!("        \"cost_miles\": {},", route.cost);
    println!("        \"vertices\": {}", route.vertices.len());
    println!("      }},");

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut vertices = route
        .vertices
        .iter()
        .filter_map(|&id| g.get_vertex(id))
        .peekable();
    while let Some(v) = vertices.next() {
        let suffix = if vertices.peek().is_some() { "," } else { "" };
        println!("          [{}, {}]{}", v.lon, v.lat, suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");
}

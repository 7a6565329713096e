// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::RoadGraph;

use super::{model, Options};

/// Helper object used for storing state related to converting [OSM features](super::model::Feature)
/// into a [RoadGraph].
///
/// Nodes become vertices and consecutive nodes of routable ways become roads.
/// Disconnected vertices are left in the graph, to be pruned once all data is loaded.
pub(super) struct GraphBuilder<'a> {
    g: &'a mut RoadGraph,
    options: &'a Options<'a>,
    ignore_bbox: bool,
    nodes: usize,
    ways: usize,
    skipped_ways: usize,
}

impl<'a> GraphBuilder<'a> {
    /// Create a new graph builder.
    pub(super) fn new(g: &'a mut RoadGraph, options: &'a Options<'a>) -> Self {
        let ignore_bbox =
            options.bbox.iter().all(|&x| x == 0.0) || options.bbox.iter().any(|x| !x.is_finite());

        if ignore_bbox && options.bbox.iter().any(|x| !x.is_finite()) {
            log::warn!("ignoring invalid bounding box {:?}", options.bbox);
        }

        Self {
            g,
            options,
            ignore_bbox,
            nodes: 0,
            ways: 0,
            skipped_ways: 0,
        }
    }

    /// Add all features from the provided iterator.
    pub(super) fn add_features<I>(&mut self, features: I) -> Result<(), quick_xml::Error>
    where
        I: IntoIterator<Item = Result<model::Feature, quick_xml::Error>>,
    {
        for f in features {
            self.add_feature(f?);
        }

        log::info!(
            "loaded {} nodes and {} ways with {} profile ({} ways not routable)",
            self.nodes,
            self.ways,
            self.options.profile.name,
            self.skipped_ways,
        );
        Ok(())
    }

    fn add_feature(&mut self, f: model::Feature) {
        match f {
            model::Feature::Node(n) => self.add_node(n),
            model::Feature::Way(w) => self.add_way(w),
        }
    }

    fn add_node(&mut self, n: model::Node) {
        if !self.is_in_bbox(n.lat, n.lon) {
            return;
        }

        if self.g.add_vertex(n.id, n.lat, n.lon) {
            self.nodes += 1;
            if let Some(name) = n.tags.get("name") {
                self.g.set_name(n.id, Some(name.clone()));
            }
        }
    }

    fn is_in_bbox(&self, lat: f64, lon: f64) -> bool {
        if self.ignore_bbox {
            return true;
        }
        let [min_lon, min_lat, max_lon, max_lat] = self.options.bbox;
        lat >= min_lat && lat <= max_lat && lon >= min_lon && lon <= max_lon
    }

    fn add_way(&mut self, w: model::Way) {
        if !self.options.profile.is_routable(&w.tags) {
            self.skipped_ways += 1;
            return;
        }

        if w.nodes.len() < 2 {
            log::debug!("way {}: less than 2 nodes - skipping", w.id);
            self.skipped_ways += 1;
            return;
        }

        self.ways += 1;
        for pair in w.nodes.windows(2) {
            match (pair[0], pair[1]) {
                (Some(u), Some(v)) => {
                    self.g.add_edge(u, v);
                }
                _ => log::debug!("way {}: invalid node reference - splitting", w.id),
            }
        }
    }
}

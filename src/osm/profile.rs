// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Describes which OSM ways are converted into roads of a [RoadGraph](crate::RoadGraph).
///
/// All roads are undirected and weighted by their length only, thus a profile merely
/// selects which ways are routable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile<'a> {
    /// Human readable name of the routing profile.
    pub name: &'a str,

    /// Values of the [highway](https://wiki.openstreetmap.org/wiki/Key:highway) tag
    /// of ways which can be used for routing.
    pub highways: &'a [&'a str],

    /// Array of OSM [access tags](https://wiki.openstreetmap.org/wiki/Key:access#Land-based_transportation)
    /// (in order from least to most specific) to consider when checking for road prohibitions.
    pub access: &'a [&'a str],
}

impl<'a> Profile<'a> {
    /// Checks if a way with the given tags can be used for routing: it must have
    /// one of the [Profile::highways], and must not be prohibited by the access tags.
    pub fn is_routable(&self, tags: &HashMap<String, String>) -> bool {
        let highway = tags.get("highway").map(|v| v.as_str()).unwrap_or("");
        self.highways.iter().any(|&h| h == highway) && self.is_allowed(tags)
    }

    /// Checks the most specific access tag present on a way.
    pub fn is_allowed(&self, tags: &HashMap<String, String>) -> bool {
        !matches!(
            self.access
                .iter()
                .rev()
                .find_map(|&mode| tags.get(mode).map(|v| v.as_str())),
            Some("no") | Some("private")
        )
    }
}

/// Drivable roads, excluding service roads.
pub const CAR_PROFILE: Profile<'static> = Profile {
    name: "motorcar",
    highways: &[
        "motorway",
        "trunk",
        "primary",
        "secondary",
        "tertiary",
        "unclassified",
        "residential",
        "living_street",
        "motorway_link",
        "trunk_link",
        "primary_link",
        "secondary_link",
        "tertiary_link",
    ],
    access: &["access", "vehicle", "motor_vehicle", "motorcar"],
};

/// Walkable roads: everything routable by car except motorways and trunks,
/// plus pedestrian ways.
pub const FOOT_PROFILE: Profile<'static> = Profile {
    name: "foot",
    highways: &[
        "primary",
        "secondary",
        "tertiary",
        "unclassified",
        "residential",
        "living_street",
        "primary_link",
        "secondary_link",
        "tertiary_link",
        "service",
        "pedestrian",
        "footway",
        "path",
        "steps",
    ],
    access: &["access", "foot"],
};

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! tags {
        {$( $k:literal : $v:literal ),+} => {
            HashMap::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    #[test]
    fn highway_filter() {
        assert!(CAR_PROFILE.is_routable(&tags! {"highway": "residential"}));
        assert!(!CAR_PROFILE.is_routable(&tags! {"highway": "footway"}));
        assert!(!CAR_PROFILE.is_routable(&tags! {"highway": "service"}));
        assert!(!CAR_PROFILE.is_routable(&tags! {"railway": "rail"}));

        assert!(FOOT_PROFILE.is_routable(&tags! {"highway": "footway"}));
        assert!(!FOOT_PROFILE.is_routable(&tags! {"highway": "motorway"}));
    }

    #[test]
    fn access_tags() {
        assert!(!CAR_PROFILE.is_routable(&tags! {"highway": "primary", "access": "private"}));
        assert!(!CAR_PROFILE.is_routable(&tags! {"highway": "primary", "motor_vehicle": "no"}));
        assert!(CAR_PROFILE.is_routable(&tags! {"highway": "primary", "access": "no", "motorcar": "yes"}));
        assert!(FOOT_PROFILE.is_routable(&tags! {"highway": "primary", "motor_vehicle": "no"}));
        assert!(!FOOT_PROFILE.is_routable(&tags! {"highway": "footway", "foot": "no"}));
    }
}

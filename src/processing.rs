use crate::types::{Dataset, Marker};
use std::collections::HashSet;

/// One marker per origin name, in order of first appearance. The first row
/// seen for a name supplies its coordinates.
pub fn distinct_origins(dataset: &Dataset) -> Vec<Marker> {
    let mut seen = HashSet::new();
    dataset
        .routes()
        .iter()
        .filter(|route| seen.insert(route.origin_name.as_str()))
        .map(|route| route.origin_marker())
        .collect()
}

/// Destinations reachable from `origin_name`, exact match, in dataset row order.
/// An unknown origin yields an empty set.
pub fn destinations_from(dataset: &Dataset, origin_name: &str) -> Vec<Marker> {
    dataset
        .routes()
        .iter()
        .filter(|route| route.origin_name == origin_name)
        .map(|route| route.destination_marker())
        .collect()
}

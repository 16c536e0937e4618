use crate::types::Marker;
use geo::{HaversineDistance, Point};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::Serialize;

// Wrapper for RTree indexing. Positions live on the unit sphere so chord
// length orders candidates the same way great-circle distance does.
struct OriginEntry {
    index: usize,
    position: [f64; 3],
}

impl RTreeObject for OriginEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for OriginEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

fn unit_vector(lat: f64, lon: f64) -> [f64; 3] {
    let (lat, lon) = (lat.to_radians(), lon.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestOrigin {
    pub origin: Marker,
    pub distance_km: f64,
}

pub struct OriginIndex {
    origins: Vec<Marker>,
    tree: RTree<OriginEntry>,
}

impl OriginIndex {
    pub fn build(origins: &[Marker]) -> Self {
        let entries: Vec<OriginEntry> = origins
            .iter()
            .enumerate()
            .map(|(index, m)| OriginEntry { index, position: unit_vector(m.lat, m.lon) })
            .collect();

        Self {
            origins: origins.to_vec(),
            tree: RTree::bulk_load(entries),
        }
    }

    /// Closest origin on the sphere, with its great-circle distance.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<NearestOrigin> {
        let entry = self.tree.nearest_neighbor(&unit_vector(lat, lon))?;
        let origin = self.origins.get(entry.index)?.clone();
        let distance_m = Point::new(lon, lat).haversine_distance(&origin.point());
        Some(NearestOrigin {
            origin,
            distance_km: distance_m / 1000.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origins() -> Vec<Marker> {
        vec![
            Marker { lat: 51.47, lon: -0.45, text: "London".to_string() },
            Marker { lat: 35.55, lon: 139.78, text: "Tokyo".to_string() },
        ]
    }

    #[test]
    fn finds_closest_origin() {
        let index = OriginIndex::build(&origins());

        let near_paris = index.nearest(48.8, 2.3).unwrap();
        assert_eq!(near_paris.origin.text, "London");
        assert!(near_paris.distance_km > 300.0 && near_paris.distance_km < 400.0);

        assert_eq!(index.nearest(34.7, 135.4).unwrap().origin.text, "Tokyo");
    }

    #[test]
    fn exact_hit_is_zero_distance() {
        let index = OriginIndex::build(&origins());
        let hit = index.nearest(51.47, -0.45).unwrap();
        assert!(hit.distance_km.abs() < 1e-9);
    }

    #[test]
    fn nearest_wraps_across_antimeridian() {
        let index = OriginIndex::build(&[
            Marker { lat: -14.0, lon: -179.9, text: "Apia".to_string() },
            Marker { lat: -14.0, lon: 170.0, text: "Port Vila".to_string() },
        ]);

        let hit = index.nearest(-14.0, 179.9).unwrap();
        assert_eq!(hit.origin.text, "Apia");
        assert!(hit.distance_km < 30.0, "{}", hit.distance_km);
    }

    #[test]
    fn nearest_near_the_pole() {
        let index = OriginIndex::build(&[
            Marker { lat: 89.0, lon: 0.0, text: "Polar".to_string() },
            Marker { lat: 80.0, lon: 175.0, text: "Far".to_string() },
        ]);
        assert_eq!(index.nearest(89.0, 179.0).unwrap().origin.text, "Polar");
    }

    #[test]
    fn empty_index_has_no_nearest() {
        assert!(OriginIndex::build(&[]).nearest(0.0, 0.0).is_none());
    }
}

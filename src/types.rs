use geo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Route {
    #[serde(rename = "OrigName")]
    pub origin_name: String,
    #[serde(rename = "OrigLat")]
    pub origin_lat: f64,
    #[serde(rename = "OrigLon")]
    pub origin_lon: f64,
    #[serde(rename = "DestName")]
    pub dest_name: String,
    #[serde(rename = "DestLat")]
    pub dest_lat: f64,
    #[serde(rename = "DestLon")]
    pub dest_lon: f64,
}

impl Route {
    pub fn origin_marker(&self) -> Marker {
        Marker {
            lat: self.origin_lat,
            lon: self.origin_lon,
            text: self.origin_name.clone(),
        }
    }

    pub fn destination_marker(&self) -> Marker {
        Marker {
            lat: self.dest_lat,
            lon: self.dest_lon,
            text: self.dest_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub text: String,
}

impl Marker {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

// Never mutated after load
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    routes: Vec<Route>,
}

impl Dataset {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

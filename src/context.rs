use crate::processing::distinct_origins;
use crate::render::{globe_figure, Figure};
use crate::spatial::{NearestOrigin, OriginIndex};
use crate::types::{Dataset, Marker};

/// Everything the handlers read: the loaded routes plus what is derived from
/// them once at startup. Shared read-only across sessions.
pub struct AppContext {
    dataset: Dataset,
    origins: Vec<Marker>,
    globe: Figure,
    index: OriginIndex,
}

impl AppContext {
    pub fn new(dataset: Dataset) -> Self {
        let origins = distinct_origins(&dataset);
        let globe = globe_figure(&origins);
        let index = OriginIndex::build(&origins);
        Self {
            dataset,
            origins,
            globe,
            index,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn origins(&self) -> &[Marker] {
        &self.origins
    }

    pub fn globe(&self) -> &Figure {
        &self.globe
    }

    pub fn nearest_origin(&self, lat: f64, lon: f64) -> Option<NearestOrigin> {
        self.index.nearest(lat, lon)
    }
}

use crate::config::RoutesSource;
use crate::types::{Dataset, Route};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use tracing::info;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "OrigName", "OrigLat", "OrigLon", "DestName", "DestLat", "DestLon",
];

// Any failure here is fatal for the caller
pub async fn load_dataset(source: &RoutesSource) -> Result<Dataset> {
    info!("Loading routes from {}", source);

    let dataset = match source {
        RoutesSource::Local(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open routes CSV: {:?}", path))?;
            parse_routes(file)?
        }
        RoutesSource::Remote(url) => {
            let body = fetch_remote(url).await?;
            parse_routes(body.as_slice())?
        }
    };

    info!("Loaded {} routes", dataset.len());
    Ok(dataset)
}

async fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to fetch routes CSV: {}", url))?
        .error_for_status()
        .with_context(|| format!("Routes CSV request failed: {}", url))?;
    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read routes CSV body: {}", url))?;
    Ok(bytes.to_vec())
}

// Rows keep their file order; extra columns are ignored
pub fn parse_routes<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers().context("Failed to read CSV header row")?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(anyhow!("Required column '{}' not found in routes CSV", column));
        }
    }

    let mut routes = Vec::new();
    for (row, result) in rdr.deserialize::<Route>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let route = result.with_context(|| format!("Failed to parse route on line {}", row + 2))?;
        routes.push(route);
    }

    Ok(Dataset::new(routes))
}

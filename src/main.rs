use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::{info, warn};

use kerfline::{init_logging, EngineConfig, ShapeDocument, Stitcher, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("kerfline {} (built {})", VERSION, BUILD_DATE);

    let mut args = std::env::args().skip(1);
    let Some(document_path) = args.next().map(PathBuf::from) else {
        bail!("usage: kerfline <document.json> [config.(json|toml)]");
    };

    let config = match args.next().map(PathBuf::from) {
        Some(path) => EngineConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let document = ShapeDocument::load_from_file(&document_path)
        .with_context(|| format!("Failed to load document {}", document_path.display()))?;
    let name = document.metadata.name.clone();
    let mut store = document
        .into_store(config.clone())
        .context("Document contains invalid shapes")?;

    let stitcher = Stitcher::from_config(&config);
    let mut subpaths = 0;
    let mut polylines = Vec::new();
    for id in store.ids().to_vec() {
        subpaths += store.path(id)?.subpaths().len();
        polylines.extend(store.flatten(id)?);
    }
    let stitched = stitcher.stitch(&polylines);
    let closed = stitched.iter().filter(|p| p.closed).count();
    let cut_length: f64 = stitched.iter().map(|p| p.length()).sum();

    let toolpath_ids: Vec<_> = store.toolpaths().map(|t| t.id()).collect();
    let mut toolpath_length = 0.0;
    for id in &toolpath_ids {
        let path = store.toolpath_path(*id)?;
        if path.is_empty() {
            warn!("Toolpath {} produced no output", id);
        }
        toolpath_length += kerfline::flatten(path, 1.0, config.tolerance)
            .iter()
            .map(|p| p.length())
            .sum::<f64>();
    }

    info!(
        "'{}': {} shapes, {} subpaths, {} polylines ({} closed), cut length {:.3}",
        name,
        store.len(),
        subpaths,
        stitched.len(),
        closed,
        cut_length
    );
    info!(
        "{} toolpaths, total length {:.3}",
        toolpath_ids.len(),
        toolpath_length
    );

    Ok(())
}

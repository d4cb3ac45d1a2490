mod bootstrap;
mod report;

use anyhow::{Context, Result};
use tracker_core::settings::Settings;
use tracker_core::TrackerError;
use tracker_data::reader::LoadOptions;
use tracker_runtime::data_manager::DatasetManager;
use tracker_runtime::session::TrackerSession;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Franchise Tracker v{} starting", env!("CARGO_PKG_VERSION"));

    let dataset_path = bootstrap::discover_dataset_path(settings.dataset.as_deref())
        .ok_or(TrackerError::NoDatasetSelected)?;
    tracing::info!("Dataset: {}", dataset_path.display());

    let manager = DatasetManager::new(
        dataset_path,
        LoadOptions {
            strict: settings.strict,
        },
    );
    let mut session = TrackerSession::new(manager);

    if settings.list_cities {
        let dataset = session.dataset()?;
        print!("{}", report::render_cities(&dataset.cities()));
        return Ok(());
    }

    let request = settings.to_request()?;
    tracing::info!(
        "City: {}, Category: {}, Threshold: {}",
        request.city,
        request.category,
        request.threshold
    );

    let result = session.submit(request)?;

    match settings.format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(result).context("serializing result")?;
            println!("{json}");
        }
        _ => print!("{}", report::render_text(result)),
    }

    Ok(())
}

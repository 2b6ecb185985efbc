//! Avatar viewer.
//!
//! ```text
//! avatar_viewer [config.json]
//! ```
//!
//! Space / R   cross-fade to a random clip
//! Right / N   next model
//! Left / P    previous model
//! Escape      quit

use stage::app::winit::Viewer;
use stage::config::StageConfig;

fn main() -> stage::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            StageConfig::from_json_file(&path)?
        }
        None => StageConfig::default(),
    };

    Viewer::new(config).run()
}

use anyhow::{anyhow, Context, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use tracing::{debug, info};

use super::Settings;

const ENV_PREFIX: &str = "DATAVIEW";

/// Loads settings from `path` (optional) overlaid with `DATAVIEW_*` variables,
/// e.g. `DATAVIEW_API__BASE_URL=http://backend:5000`.
pub fn load_settings(path: &str) -> Result<Settings> {
    let builder = config::Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let settings = finish(builder).with_context(|| format!("loading configuration from {}", path))?;
    info!("Configuration loaded (backend: {})", settings.api.base_url);
    Ok(settings)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings
        .validate()
        .map_err(|errors| anyhow!("invalid configuration: {}", errors.join(", ")))?;
    debug!("Effective configuration: {:?}", settings);
    Ok(settings)
}

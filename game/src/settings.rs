use collide2d::{PhysicsSettings, SettingsError};
use dirs_next::config_dir;
use std::path::{Path, PathBuf};

/// Retrieves the path to the user physics settings file.
pub fn user_settings_path() -> Result<PathBuf, SettingsError> {
    let config_dir = config_dir().ok_or(SettingsError::ConfigDirNotFound)?;
    Ok(config_dir.join("collide2d").join("physics.toml"))
}

/// Loads settings from `override_path` if given, otherwise from the user
/// config directory, falling back to defaults on any error.
pub fn load_user_settings(override_path: Option<&Path>) -> PhysicsSettings {
    let result = match override_path {
        Some(path) => PhysicsSettings::load_from_file(path),
        None => initialize_settings(),
    };
    match result {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Error initializing settings: {}", e);
            PhysicsSettings::default()
        }
    }
}

/// Loads the user settings file, writing defaults there if it does not exist.
fn initialize_settings() -> Result<PhysicsSettings, SettingsError> {
    let user_settings_path = user_settings_path()?;
    load_or_create(&user_settings_path)
}

fn load_or_create(path: &Path) -> Result<PhysicsSettings, SettingsError> {
    if path.exists() {
        match PhysicsSettings::load_from_file(path) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::warn!("Failed to load user settings: {}. Using defaults.", e);
                Ok(PhysicsSettings::default())
            }
        }
    } else {
        log::info!("User settings not found. Saving defaults to {}", path.display());
        let settings = PhysicsSettings::default();
        settings.save_to_file(path)?;
        Ok(settings)
    }
}

use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "times-drill").map(|pd| pd.config_dir().join("config.json"))
    }

    /// Default target for the mistake CSV export
    pub fn export_path() -> PathBuf {
        ProjectDirs::from("", "", "times-drill")
            .map(|pd| pd.data_local_dir().join("multiplication_errors.csv"))
            .unwrap_or_else(|| PathBuf::from("multiplication_errors.csv"))
    }
}

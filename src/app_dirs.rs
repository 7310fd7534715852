use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/wordflow/wordflow.log`, or the platform data dir
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("wordflow");
            Some(state_dir.join("wordflow.log"))
        } else {
            ProjectDirs::from("", "", "wordflow")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("wordflow.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_names_the_app() {
        if let Some(path) = AppDirs::log_path() {
            assert!(path.ends_with("wordflow/wordflow.log"));
        }
    }
}

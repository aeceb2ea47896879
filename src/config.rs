use std::{fs, path::PathBuf};

use directories::ProjectDirs;
use log::{debug, info};
use which::which;

use crate::{NotesError, Result};

/// Environment variable overriding the data directory, mainly for tests.
pub const DATA_DIR_ENV: &str = "CALNOTES_DATA_DIR";

/// Environment variable overriding the editor command.
pub const EDITOR_ENV: &str = "CALNOTES_EDITOR";

/// Runtime configuration: where the note collection lives and how to open
/// an editor for content entry.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where notes.json and settings.json are stored
    pub data_dir: PathBuf,

    /// Editor command override
    pub editor_command: Option<String>,
}

impl Config {
    /// Resolves the configuration from the command line flag, the
    /// environment, or the platform data directory, in that order.
    pub fn resolve(data_dir_flag: Option<PathBuf>) -> Result<Config> {
        let data_dir = match data_dir_flag {
            Some(dir) => dir,
            None => match std::env::var(DATA_DIR_ENV) {
                Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
                _ => ProjectDirs::from("", "", "calnotes")
                    .map(|dirs| dirs.data_dir().to_path_buf())
                    .ok_or_else(|| NotesError::ConfigError {
                        message: "could not determine a data directory for this platform"
                            .to_string(),
                    })?,
            },
        };
        debug!("Resolved data directory: {}", data_dir.display());

        Ok(Config {
            data_dir,
            editor_command: std::env::var(EDITOR_ENV).ok(),
        })
    }

    /// Builds a configuration rooted at an explicit directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Config {
        Config {
            data_dir,
            editor_command: None,
        }
    }

    /// Creates the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(|_| NotesError::DirectoryError {
                path: self.data_dir.clone(),
            })?;
            info!("Created data directory: {}", self.data_dir.display());
        }
        Ok(())
    }

    /// Path of the note collection blob.
    pub fn notes_file(&self) -> PathBuf {
        self.data_dir.join("notes.json")
    }

    /// Path of the settings blob.
    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        // First try the configured editor
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        // Then try environment variable
        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        // Fall back to platform defaults
        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -t".to_string()
        } else {
            // Try common Linux editors
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}

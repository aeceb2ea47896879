use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;
use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{Config, Note, NoteDraft, NotePatch, NotesError, Result};

/// Owns the note collection and its persistence.
///
/// The whole collection lives in memory, most recent first, and every
/// mutation rewrites the backing file before returning. The rewrite goes
/// through a temporary file in the same directory so a crash can never
/// leave a half-written collection behind.
pub struct NoteStore {
    /// Application configuration
    config: Config,

    /// All notes, newest first
    notes: Vec<Note>,
}

impl NoteStore {
    /// Opens the store rooted at the configured data directory.
    ///
    /// A missing collection file is a valid first run. An unreadable or
    /// unparseable one is logged and treated as empty rather than failing
    /// startup.
    pub fn load(config: Config) -> Result<Self> {
        config.ensure_data_dir()?;

        let file_path = config.notes_file();
        let notes = if file_path.exists() {
            match fs::read_to_string(&file_path) {
                Ok(payload) => match serde_json::from_str::<Vec<Note>>(&payload) {
                    Ok(notes) => {
                        info!("Loaded {} notes from {}", notes.len(), file_path.display());
                        notes
                    }
                    Err(e) => {
                        warn!(
                            "Ignoring unreadable note collection {}: {}",
                            file_path.display(),
                            e
                        );
                        Vec::new()
                    }
                },
                Err(e) => {
                    warn!("Failed to read {}: {}", file_path.display(), e);
                    Vec::new()
                }
            }
        } else {
            debug!(
                "No note collection at {}, starting empty",
                file_path.display()
            );
            Vec::new()
        };

        Ok(Self { config, notes })
    }

    /// All notes, newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Retrieves a note by its ID.
    pub fn get(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Validates a draft, assigns identity and prepends the new note.
    pub fn add(&mut self, draft: NoteDraft) -> Result<Note> {
        draft.validate()?;

        let mut note = Note::new(draft);
        // Ids come from the clock; a second add in the same millisecond
        // bumps until free so identity stays unique for the session.
        while self.notes.iter().any(|existing| existing.id == note.id) {
            note.id += 1;
        }

        info!("Adding note: {}", note.id);
        self.notes.insert(0, note.clone());
        self.persist()?;

        Ok(note)
    }

    /// Applies a partial update to an existing note.
    ///
    /// Identity, creation metadata, the pin flag and the attached image are
    /// not editable and keep their current values.
    pub fn update(&mut self, id: i64, patch: NotePatch) -> Result<Note> {
        info!("Updating note: {}", id);

        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(NotesError::ValidationFailed {
                    message: "title must not be empty".to_string(),
                });
            }
        }
        if let Some(content) = &patch.content {
            if content.trim().is_empty() {
                return Err(NotesError::ValidationFailed {
                    message: "content must not be empty".to_string(),
                });
            }
        }

        let position = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or_else(|| {
                error!("Cannot update note {}: not found", id);
                NotesError::NoteNotFound { id }
            })?;

        {
            let note = &mut self.notes[position];
            if let Some(title) = patch.title {
                note.title = title.trim().to_string();
            }
            if let Some(content) = patch.content {
                note.content = content.trim().to_string();
            }
            if let Some(category) = patch.category {
                note.category = category;
            }
            if let Some(priority) = patch.priority {
                note.priority = priority;
            }
            if let Some(time) = patch.time {
                note.time = time;
            }
            if let Some(date) = patch.date {
                note.date = date;
            }
            if let Some(tags) = patch.tags {
                note.tags = tags;
            }
        }

        self.persist()?;
        Ok(self.notes[position].clone())
    }

    /// Flips the pin flag of a note and returns the new state.
    pub fn toggle_pin(&mut self, id: i64) -> Result<bool> {
        let note = self
            .notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(NotesError::NoteNotFound { id })?;

        note.pinned = !note.pinned;
        let pinned = note.pinned;
        debug!("Note {} pinned flag is now {}", id, pinned);

        self.persist()?;
        Ok(pinned)
    }

    /// Removes a note and returns it.
    pub fn remove(&mut self, id: i64) -> Result<Note> {
        info!("Deleting note: {}", id);

        let position = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or_else(|| {
                error!("Cannot delete note {}: not found", id);
                NotesError::NoteNotFound { id }
            })?;

        let removed = self.notes.remove(position);
        self.persist()?;

        info!("Note {} deleted", removed.id);
        Ok(removed)
    }

    /// Replaces the whole collection, discarding whatever was there.
    pub fn replace_all(&mut self, notes: Vec<Note>) -> Result<usize> {
        info!(
            "Replacing note collection: {} incoming, {} discarded",
            notes.len(),
            self.notes.len()
        );

        self.notes = notes;
        self.persist()?;

        Ok(self.notes.len())
    }

    /// Writes the collection to disk using atomic operations to prevent
    /// data corruption.
    pub fn persist(&self) -> Result<()> {
        let file_path = self.config.notes_file();
        debug!(
            "Persisting {} notes to {}",
            self.notes.len(),
            file_path.display()
        );

        // Ensure the parent directory exists
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                debug!("Creating parent directory: {}", parent.display());
                fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create directory {}: {}", parent.display(), e);
                    NotesError::Io(e)
                })?;
            }
        }

        // Create a temporary file in the same directory (for atomic operation)
        let dir = file_path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            NotesError::Io(e)
        })?;

        // Serialize the collection to JSON
        trace!("Serializing note collection to JSON");
        let json = serde_json::to_string_pretty(&self.notes).map_err(|e| {
            error!("Failed to serialize note collection: {}", e);
            NotesError::Serialization(e)
        })?;

        // Write to the temporary file
        temp_file.write_all(json.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            NotesError::Io(e)
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            NotesError::Io(e)
        })?;

        // Atomically move the temporary file to the target location
        temp_file.persist(&file_path).map_err(|e| {
            error!(
                "Failed to persist file {}: {}",
                file_path.display(),
                e.error
            );
            NotesError::Io(e.error)
        })?;

        trace!("Note collection persisted");
        Ok(())
    }

    /// Writes the collection as pretty JSON to an export file and returns
    /// the number of notes written.
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        info!("Exporting {} notes to {}", self.notes.len(), path.display());

        let json = serde_json::to_string_pretty(&self.notes)?;
        fs::write(path, json).map_err(|e| {
            error!("Failed to write export file {}: {}", path.display(), e);
            NotesError::Io(e)
        })?;

        Ok(self.notes.len())
    }
}

/// The default export filename for the current day, e.g.
/// `calnotes-2024-03-10.json`.
pub fn default_export_filename() -> PathBuf {
    PathBuf::from(format!(
        "calnotes-{}.json",
        Local::now().format("%Y-%m-%d")
    ))
}

/// Parses an import payload into a note collection.
///
/// The payload must be a JSON array of note records; anything else is an
/// import failure and the current store must be left untouched by the
/// caller.
pub fn parse_import(payload: &[u8]) -> Result<Vec<Note>> {
    let notes: Vec<Note> = serde_json::from_slice(payload).map_err(|e| {
        error!("Import payload is not a note collection: {}", e);
        NotesError::ImportFailed {
            message: format!("not a valid note collection: {}", e),
        }
    })?;

    debug!("Parsed import payload with {} notes", notes.len());
    Ok(notes)
}

/// User preferences persisted next to the note collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Whether output uses the palette for dark terminals
    #[serde(default)]
    pub dark_mode: bool,

    /// Reminder notification decision; None means the user was never asked
    #[serde(default)]
    pub notifications: Option<bool>,
}

impl Settings {
    /// Loads the settings, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(config: &Config) -> Settings {
        let file_path = config.settings_file();
        if !file_path.exists() {
            return Settings::default();
        }

        match fs::read_to_string(&file_path) {
            Ok(payload) => match serde_json::from_str(&payload) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Ignoring unreadable settings {}: {}", file_path.display(), e);
                    Settings::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings {}: {}", file_path.display(), e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.ensure_data_dir()?;

        let file_path = config.settings_file();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&file_path, json).map_err(|e| {
            error!("Failed to write settings {}: {}", file_path.display(), e);
            NotesError::Io(e)
        })?;

        debug!("Settings saved to {}", file_path.display());
        Ok(())
    }
}

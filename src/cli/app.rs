//! Command dispatch and terminal presentation for the calnotes CLI.
use std::{
    fs,
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::Command,
    sync::Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Datelike, Local, NaiveDate};
use console::{style, StyledObject};
use log::{debug, info, warn};
use shell_words::split;
use tempfile::Builder;

use crate::{
    compute_stats, default_export_filename, helper, month_grid, parse_import, parse_tags,
    run_query, Category, Commands, DayCell, Filter, MonthGrid, Note, NoteDraft, NotePatch,
    NoteQuery, NoteStore, NotesError, Notifier, Priority, ReminderScheduler, Result, Settings,
    SilentNotifier, SortKey, TerminalNotifier,
};

/// Main application struct that wires the note store, persisted settings and
/// terminal presentation together.
pub struct App {
    store: NoteStore,
    settings: Settings,
    verbose: bool,
}

impl App {
    pub fn new(store: NoteStore, settings: Settings, verbose: bool) -> Self {
        App {
            store,
            settings,
            verbose,
        }
    }

    /// Runs a single CLI command to completion.
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Add {
                title,
                content,
                edit,
                category,
                priority,
                time,
                tags,
                date,
                image,
            } => {
                self.handle_add(title, content, edit, category, priority, time, tags, date, image)
                    .await
            }
            Commands::View { id, json } => self.handle_view(id, json),
            Commands::List {
                filter,
                search,
                sort,
                limit,
                json,
            } => self.handle_list(filter, search, sort, limit, json),
            Commands::Edit {
                id,
                title,
                content,
                edit,
                category,
                priority,
                time,
                clear_time,
                date,
                tags,
            } => self.handle_edit(
                id, title, content, edit, category, priority, time, clear_time, date, tags,
            ),
            Commands::Pin { id } => self.handle_pin(id),
            Commands::Delete { id, force } => self.handle_delete(id, force),
            Commands::Calendar { month, select } => self.handle_calendar(month, select),
            Commands::Stats => self.handle_stats(),
            Commands::Export { output } => self.handle_export(output),
            Commands::Import { file, force } => self.handle_import(file, force).await,
            Commands::Watch => self.handle_watch().await,
            Commands::DarkMode => self.handle_dark_mode(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn handle_add(
        &mut self,
        title: String,
        content: Option<String>,
        edit: bool,
        category: String,
        priority: String,
        time: Option<String>,
        tags: Option<String>,
        date: Option<String>,
        image: Option<PathBuf>,
    ) -> Result<()> {
        let category = Category::parse(&category)?;
        let priority = Priority::parse(&priority)?;

        let time = match time {
            Some(value) => Some(helper::parse_time(&value)?),
            None => None,
        };

        let date = match date {
            Some(value) => helper::parse_date(&value)?,
            None => Local::now().date_naive(),
        };

        // Without --content the editor is the only way to provide a body, so
        // it opens even when --edit was not given.
        let content = match content {
            Some(content) if !edit => content,
            other => self.open_editor_for_content(&title, other.as_deref().unwrap_or(""))?,
        };

        let image = match image {
            Some(path) => Some(self.read_image_attachment(&path).await?),
            None => None,
        };

        let draft = NoteDraft {
            title,
            content,
            category,
            priority,
            time,
            tags: parse_tags(tags),
            date,
            image,
        };

        let note = self.store.add(draft)?;
        println!("Note created with ID: {}", note.id);
        Ok(())
    }

    fn handle_view(&self, id: i64, json: bool) -> Result<()> {
        let note = self
            .store
            .get(id)
            .ok_or(NotesError::NoteNotFound { id })?;

        if json {
            println!("{}", serde_json::to_string_pretty(note)?);
        } else {
            self.display_note(note, true);
        }
        Ok(())
    }

    fn handle_list(
        &self,
        filter: String,
        search: Option<String>,
        sort: String,
        limit: Option<usize>,
        json: bool,
    ) -> Result<()> {
        let query = NoteQuery {
            search: search.unwrap_or_default(),
            filter: Filter::parse(&filter)?,
            sort: SortKey::parse(&sort)?,
        };

        let mut results = run_query(self.store.notes(), &query, Local::now().date_naive());
        if let Some(limit) = limit {
            results.truncate(limit);
        }
        debug!("Query returned {} notes", results.len());

        if json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            return Ok(());
        }

        if results.is_empty() {
            println!("No notes found matching the criteria.");
            return Ok(());
        }

        self.display_notes_text(&results);
        println!(
            "\nFound {} note{}",
            results.len(),
            if results.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_edit(
        &mut self,
        id: i64,
        title: Option<String>,
        content: Option<String>,
        edit: bool,
        category: Option<String>,
        priority: Option<String>,
        time: Option<String>,
        clear_time: bool,
        date: Option<String>,
        tags: Option<String>,
    ) -> Result<()> {
        if content.is_some() && edit {
            return Err(NotesError::ApplicationError {
                message: "Cannot specify both --content and --edit options".to_string(),
            });
        }
        if time.is_some() && clear_time {
            return Err(NotesError::ApplicationError {
                message: "Cannot specify both --time and --clear-time options".to_string(),
            });
        }

        let content = if edit {
            let (current_title, current_content) = {
                let note = self
                    .store
                    .get(id)
                    .ok_or(NotesError::NoteNotFound { id })?;
                (note.title.clone(), note.content.clone())
            };
            Some(self.open_editor_for_content(&current_title, &current_content)?)
        } else {
            content
        };

        let patch = NotePatch {
            title,
            content,
            category: category.as_deref().map(Category::parse).transpose()?,
            priority: priority.as_deref().map(Priority::parse).transpose()?,
            time: if clear_time {
                Some(None)
            } else {
                match time {
                    Some(value) => Some(Some(helper::parse_time(&value)?)),
                    None => None,
                }
            },
            date: date.as_deref().map(helper::parse_date).transpose()?,
            tags: tags.map(|list| parse_tags(Some(list))),
        };

        if patch.is_empty() {
            println!("Nothing to change for note {}", id);
            return Ok(());
        }

        let note = self.store.update(id, patch)?;
        println!("Note {} updated successfully", note.id);
        Ok(())
    }

    fn handle_pin(&mut self, id: i64) -> Result<()> {
        let pinned = self.store.toggle_pin(id)?;
        if pinned {
            println!("Note {} pinned 📌", id);
        } else {
            println!("Note {} unpinned", id);
        }
        Ok(())
    }

    fn handle_delete(&mut self, id: i64, force: bool) -> Result<()> {
        let note = match self.store.get(id) {
            Some(note) => note.clone(),
            None => return Err(NotesError::NoteNotFound { id }),
        };

        if !force {
            println!("You are about to delete the following note:");
            println!("ID:       {}", note.id);
            println!("Title:    {}", note.title);
            println!(
                "Category: {} {}",
                note.category.emoji(),
                note.category.as_str()
            );
            if !note.tags.is_empty() {
                println!("Tags:     {}", note.tags.join(", "));
            }
            println!("Created:  {}", note.created);

            if !note.content.is_empty() {
                let preview: Vec<&str> = note.content.lines().take(2).collect();
                println!("\nContent preview:");
                println!(
                    "{}{}",
                    preview.join("\n"),
                    if note.content.lines().count() > 2 {
                        "..."
                    } else {
                        ""
                    }
                );
            }

            println!("\nThis action cannot be undone!");
            if !confirm("Are you sure you want to delete this note?")? {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        self.store.remove(id)?;
        println!(
            "Note '{}' ({}) has been permanently deleted.",
            note.title, note.id
        );
        Ok(())
    }

    fn handle_calendar(&self, month: Option<String>, select: Option<u32>) -> Result<()> {
        let today = Local::now().date_naive();
        let (year, month) = match month {
            Some(value) => helper::parse_month(&value)?,
            None => (today.year(), today.month()),
        };

        let selected = match select {
            Some(day) => Some(NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                NotesError::InvalidFormat {
                    message: format!("{}-{:02} has no day {}", year, month, day),
                }
            })?),
            None => None,
        };

        let grid = month_grid(year, month, self.store.notes(), selected, today);
        self.display_calendar(&grid);

        if let Some(date) = selected {
            self.display_day_notes(date);
        }
        Ok(())
    }

    fn handle_stats(&self) -> Result<()> {
        let stats = compute_stats(self.store.notes(), Local::now().date_naive());

        println!("{}", style("Statistics").bold());
        println!("Total notes: {}", stats.total);
        println!("Pinned:      {}", stats.pinned);
        println!("This week:   {}", stats.this_week);
        println!("This month:  {}", stats.this_month);

        if !stats.by_category.is_empty() {
            println!("\nBy category:");
            for (category, count) in &stats.by_category {
                println!("  {} {:<12} {}", category.emoji(), category.as_str(), count);
            }
        }
        Ok(())
    }

    fn handle_export(&self, output: Option<PathBuf>) -> Result<()> {
        let path = output.unwrap_or_else(default_export_filename);
        let count = self.store.export_to(&path)?;
        println!(
            "Exported {} note{} to {}",
            count,
            if count == 1 { "" } else { "s" },
            path.display()
        );
        Ok(())
    }

    async fn handle_import(&mut self, file: PathBuf, force: bool) -> Result<()> {
        if !file.exists() {
            return Err(NotesError::FileNotFound {
                file_path: file.display().to_string(),
            });
        }

        let payload = tokio::fs::read(&file).await?;
        let incoming = parse_import(&payload)?;

        if !force {
            println!(
                "{} note{} will be imported, replacing the current {}.",
                incoming.len(),
                if incoming.len() == 1 { "" } else { "s" },
                self.store.len()
            );
            if !confirm("Continue?")? {
                println!("Import cancelled.");
                return Ok(());
            }
        }

        let count = self.store.replace_all(incoming)?;
        println!(
            "Imported {} note{} from {}",
            count,
            if count == 1 { "" } else { "s" },
            file.display()
        );
        Ok(())
    }

    async fn handle_watch(&mut self) -> Result<()> {
        let granted = self.resolve_notification_permission()?;

        // A declined permission keeps the scan running but drops deliveries,
        // the same soft state the browser grant model has.
        let notifier: Arc<dyn Notifier> = if granted {
            Arc::new(TerminalNotifier)
        } else {
            info!("Notification permission declined, reminders will not be delivered");
            Arc::new(SilentNotifier)
        };

        let mut scheduler = ReminderScheduler::new(self.store.config().clone(), notifier);
        scheduler.start()?;
        println!("Watching for reminders every minute. Press Ctrl+C to stop.");

        tokio::signal::ctrl_c().await?;
        println!();
        scheduler.stop().await
    }

    fn handle_dark_mode(&mut self) -> Result<()> {
        self.settings.dark_mode = !self.settings.dark_mode;
        self.settings.save(self.store.config())?;
        println!(
            "Dark mode {}",
            if self.settings.dark_mode {
                "on 🌙"
            } else {
                "off ☀️"
            }
        );
        Ok(())
    }

    /// Returns the stored notification decision, prompting for one first if
    /// it was never made.
    fn resolve_notification_permission(&mut self) -> Result<bool> {
        if let Some(decision) = self.settings.notifications {
            return Ok(decision);
        }

        let granted = confirm("Allow reminder notifications in this terminal?")?;
        self.settings.notifications = Some(granted);
        self.settings.save(self.store.config())?;
        Ok(granted)
    }

    async fn read_image_attachment(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(NotesError::FileNotFound {
                file_path: path.display().to_string(),
            });
        }

        let bytes = tokio::fs::read(path).await?;
        let mime = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        };
        debug!("Attached image {} ({} bytes)", path.display(), bytes.len());

        Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
    }

    fn open_editor_for_content(&self, title: &str, seed: &str) -> Result<String> {
        // The handle must stay alive until the content has been read back,
        // the file is removed on drop.
        let temp_file = Builder::new()
            .prefix("calnotes-")
            .suffix(".txt")
            .tempfile()?;
        let temp_path = temp_file.path().to_owned();

        if !seed.is_empty() {
            fs::write(&temp_path, seed)?;
        }

        let editor_cmd = self.store.config().get_editor_command();

        info!("Opening editor ({}) for '{}'...", editor_cmd, title);
        println!("Opening editor for note content. Save and close the editor when done.");

        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = fs::read_to_string(&temp_path)?;
        if content.trim().is_empty() {
            warn!("No content was added in the editor");
        }

        Ok(content.trim_end().to_string())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let path_str = file_path.to_string_lossy();

        // Handle shell-like command parsing, e.g. EDITOR="code --wait"
        let args = split(editor_cmd).map_err(|e| NotesError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        if args.is_empty() {
            return Err(NotesError::EditorError {
                message: "Empty editor command".to_string(),
            });
        }

        let mut command = Command::new(&args[0]);
        if args.len() > 1 {
            command.args(&args[1..]);
        }
        command.arg(path_str.as_ref());

        let status = command.status()?;
        if !status.success() {
            return Err(NotesError::EditorError {
                message: format!("Editor exited with status {}", status),
            });
        }

        Ok(())
    }

    fn display_notes_text(&self, notes: &[&Note]) {
        let term_width = terminal_size::terminal_size()
            .map(|(width, _)| width.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }
            self.display_note(note, self.verbose);
        }
    }

    fn display_note(&self, note: &Note, detailed: bool) {
        let pin = if note.pinned { "📌 " } else { "" };
        println!("{}ID: {} | Created: {}", pin, note.id, note.created);
        println!("Title: {}", style(&note.title).bold());
        println!(
            "Category: {} {} | Priority: {} | Date: {}{}",
            note.category.emoji(),
            note.category.as_str(),
            self.priority_style(note.priority),
            note.date,
            note.time
                .as_deref()
                .map(|time| format!(" | Time: {}", time))
                .unwrap_or_default()
        );

        if !note.tags.is_empty() {
            let tags = note
                .tags
                .iter()
                .map(|tag| format!("#{}", tag))
                .collect::<Vec<_>>()
                .join(" ");
            println!("Tags: {}", self.accent_style(tags));
        }

        if detailed {
            println!("\n{}", note.content);
        } else {
            let preview = content_preview(&note.content, 100);
            if !preview.is_empty() {
                println!("\n{}", preview);
            }
        }

        if note.image.is_some() {
            println!("{}", style("📷 image attached").dim());
        }
    }

    fn display_calendar(&self, grid: &MonthGrid) {
        println!("\n      {}", style(&grid.title).bold());
        println!(" Pzt  Sal  Çar  Per  Cum  Cmt  Paz");

        let mut cells: Vec<String> = Vec::with_capacity(grid.cell_count());
        for day in &grid.leading {
            cells.push(self.filler_cell(*day));
        }
        for cell in &grid.days {
            cells.push(self.format_day_cell(cell));
        }
        for day in &grid.trailing {
            cells.push(self.filler_cell(*day));
        }

        for week in cells.chunks(7) {
            println!("{}", week.join(""));
        }
        println!();
    }

    fn filler_cell(&self, day: u32) -> String {
        let text = format!("{:>4} ", day);
        if self.settings.dark_mode {
            format!("{}", style(text).black().bright())
        } else {
            format!("{}", style(text).dim())
        }
    }

    fn format_day_cell(&self, cell: &DayCell) -> String {
        let marker = if cell.shows_badge() {
            if cell.note_count > 9 {
                "+".to_string()
            } else {
                cell.note_count.to_string()
            }
        } else if cell.has_notes() {
            "•".to_string()
        } else {
            " ".to_string()
        };

        let text = format!("{:>4}", cell.day);
        let styled = if cell.is_selected {
            style(text).yellow().underlined()
        } else if cell.is_today {
            style(text).cyan().bold()
        } else {
            style(text)
        };

        format!("{}{}", styled, marker)
    }

    fn display_day_notes(&self, date: NaiveDate) {
        let day_notes: Vec<&Note> = self
            .store
            .notes()
            .iter()
            .filter(|note| note.date == date)
            .collect();

        if day_notes.is_empty() {
            println!("No notes on {}. Add one with --date {}.", date, date);
            return;
        }

        println!(
            "{} note{} on {}:",
            day_notes.len(),
            if day_notes.len() == 1 { "" } else { "s" },
            date
        );
        self.display_notes_text(&day_notes);
    }

    fn priority_style(&self, priority: Priority) -> StyledObject<&'static str> {
        let styled = style(priority.as_str());
        match priority {
            Priority::High => styled.red(),
            Priority::Medium => styled.yellow(),
            Priority::Low => styled.green(),
        }
    }

    fn accent_style(&self, text: String) -> StyledObject<String> {
        if self.settings.dark_mode {
            style(text).cyan().bright()
        } else {
            style(text).cyan()
        }
    }
}

/// Asks a yes/no question on stdout and reads the answer from stdin. Anything
/// other than `y` or `yes` counts as no.
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question);
    stdout().flush()?;

    let mut input = String::new();
    stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// First non-empty line of the content, truncated for list views.
fn content_preview(content: &str, max_chars: usize) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let truncated: String = first_line.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

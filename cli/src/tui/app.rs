use chrono::Utc;
use ratatui::widgets::TableState;
use taskboard_core::{
    expand_key, parse_args, parse_human_date, BoardStore, FileBoardRepository, OverdueMonitor,
    Stage, TaskId, TaskPatch,
};

const KNOWN_KEYS: [&str; 2] = ["due", "description"];

pub enum InputMode {
    Normal,
    Adding,
    Editing,
    SettingDue,
}

pub struct App {
    pub store: BoardStore<FileBoardRepository>,
    pub monitor: OverdueMonitor,
    pub active_column: usize,
    pub column_states: [TableState; 3],
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
}

impl App {
    pub fn new(store: BoardStore<FileBoardRepository>) -> App {
        let mut app = App {
            store,
            monitor: OverdueMonitor::new(),
            active_column: 0,
            column_states: [
                TableState::default(),
                TableState::default(),
                TableState::default(),
            ],
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
        };
        // First scan happens right away, not a minute in.
        app.monitor.poll(app.store.tasks(), Utc::now());
        app.clamp_selection();
        app
    }

    pub fn tick(&mut self) {
        let now = Utc::now();
        for id in self.store.expired_toast_ids(now) {
            self.store.remove_toast(id);
        }
        self.monitor.poll(self.store.tasks(), now);
    }

    fn tasks_changed(&mut self) {
        self.monitor.rescan(self.store.tasks(), Utc::now());
        self.clamp_selection();
    }

    pub fn column_stage(&self) -> Stage {
        Stage::ALL[self.active_column]
    }

    fn column_len(&self, column: usize) -> usize {
        self.store.tasks_in_stage(Stage::ALL[column]).len()
    }

    fn clamp_selection(&mut self) {
        for column in 0..Stage::ALL.len() {
            let len = self.column_len(column);
            let state = &mut self.column_states[column];
            match state.selected() {
                _ if len == 0 => state.select(None),
                None => state.select(Some(0)),
                Some(i) if i >= len => state.select(Some(len - 1)),
                Some(_) => {}
            }
        }
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        let row = self.column_states[self.active_column].selected()?;
        self.store
            .tasks_in_stage(self.column_stage())
            .get(row)
            .map(|t| t.id)
    }

    pub fn next_row(&mut self) {
        let len = self.column_len(self.active_column);
        if len == 0 {
            return;
        }
        let state = &mut self.column_states[self.active_column];
        let i = match state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.column_len(self.active_column);
        if len == 0 {
            return;
        }
        let state = &mut self.column_states[self.active_column];
        let i = match state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn next_column(&mut self) {
        self.active_column = (self.active_column + 1) % Stage::ALL.len();
        self.clamp_selection();
    }

    pub fn previous_column(&mut self) {
        self.active_column = (self.active_column + Stage::ALL.len() - 1) % Stage::ALL.len();
        self.clamp_selection();
    }

    pub fn move_selected(&mut self, stage: Stage) {
        if let Some(id) = self.selected_task_id() {
            self.store.move_task(id, stage);
            self.tasks_changed();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.store.delete_task(id);
            self.tasks_changed();
        }
    }

    pub fn dismiss_top_alert(&mut self) {
        if let Some(&id) = self.monitor.alerts().first() {
            self.monitor.dismiss(id);
        }
    }

    pub fn clear_toasts(&mut self) {
        self.store.clear_toasts();
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn enter_edit_mode(&mut self) {
        if self.selected_task_id().is_some() {
            self.input_mode = InputMode::Editing;
            self.input.clear();
            self.cursor_position = 0;
        }
    }

    pub fn enter_due_mode(&mut self) {
        if self.selected_task_id().is_some() {
            self.input_mode = InputMode::SettingDue;
            self.input.clear();
            self.cursor_position = 0;
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self
            .input
            .chars()
            .take(self.cursor_position)
            .map(|c| c.len_utf8())
            .sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self
                .input
                .chars()
                .take(self.cursor_position - 1)
                .map(|c| c.len_utf8())
                .sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_input(&mut self) {
        if self.input.trim().is_empty() {
            self.exit_input_mode();
            return;
        }

        match self.input_mode {
            InputMode::Adding => self.submit_add(),
            InputMode::Editing => self.submit_edit(),
            InputMode::SettingDue => self.submit_due(),
            InputMode::Normal => {}
        }

        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }

    fn submit_add(&mut self) {
        let args: Vec<String> = self
            .input
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();
        let parsed = parse_args(&args);

        // Empty or whitespace-only titles never reach the store.
        if parsed.title.trim().is_empty() {
            return;
        }

        let mut due = None;
        let mut description = String::new();
        for (key, value) in parsed.metadata {
            if let Ok(full_key) = expand_key(&key, &KNOWN_KEYS) {
                match full_key.as_str() {
                    "due" => due = parse_human_date(&value).ok(),
                    "description" => description = value,
                    _ => {}
                }
            }
        }

        self.store.add_task(parsed.title, description, due);
        self.tasks_changed();
        // The new task sits on top of the New column.
        self.column_states[0].select(Some(0));
    }

    fn submit_edit(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };

        let args: Vec<String> = self
            .input
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();
        let parsed = parse_args(&args);

        let mut patch = TaskPatch::default();
        if !parsed.title.trim().is_empty() {
            patch.title = Some(parsed.title);
        }
        for (key, value) in parsed.metadata {
            if let Ok(full_key) = expand_key(&key, &KNOWN_KEYS) {
                match full_key.as_str() {
                    "due" => {
                        patch.due_date = if value.is_empty() {
                            // `due:` with no value clears the date.
                            Some(None)
                        } else {
                            parse_human_date(&value).ok().map(Some)
                        };
                    }
                    "description" => patch.description = Some(value),
                    _ => {}
                }
            }
        }

        self.store.update_task(id, patch);
        self.tasks_changed();
    }

    fn submit_due(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if let Ok(due) = parse_human_date(self.input.trim()) {
            self.store.set_due_date(id, due);
            self.tasks_changed();
        }
    }
}

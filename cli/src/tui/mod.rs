pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use taskboard_core::{BoardStore, FileBoardRepository, Stage};

use crate::tui::app::{App, InputMode};

pub fn run(store: BoardStore<FileBoardRepository>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        // One callback at a time: the tick sweeps expired toasts and lets
        // the overdue monitor decide whether a minute has passed.
        app.tick();

        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => app.next_row(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
                        KeyCode::Left | KeyCode::Char('h') => app.previous_column(),
                        KeyCode::Right | KeyCode::Char('l') => app.next_column(),
                        KeyCode::Char('a') => app.enter_add_mode(),
                        KeyCode::Char('e') => app.enter_edit_mode(),
                        KeyCode::Char('u') => app.enter_due_mode(),
                        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                        KeyCode::Char('1') => app.move_selected(Stage::New),
                        KeyCode::Char('2') => app.move_selected(Stage::Ongoing),
                        KeyCode::Char('3') => app.move_selected(Stage::Done),
                        KeyCode::Char('o') => app.dismiss_top_alert(),
                        KeyCode::Char('c') => app.clear_toasts(),
                        _ => {}
                    },
                    InputMode::Adding | InputMode::Editing | InputMode::SettingDue => {
                        match key.code {
                            KeyCode::Enter => app.submit_input(),
                            KeyCode::Esc => app.exit_input_mode(),
                            KeyCode::Char(c) => app.input_char(c),
                            KeyCode::Backspace => app.delete_char(),
                            KeyCode::Left => app.move_cursor_left(),
                            KeyCode::Right => app.move_cursor_right(),
                            _ => {}
                        }
                    }
                }
            }
        }
    }
}

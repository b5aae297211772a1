//! Sheet picker - tui-sheet demo
//!
//! Opens a share sheet over a placeholder document:
//! - Event -> ActionSheetView.handle_event() -> Actions
//! - Actions applied to the sheet the app owns (tap, dismiss)
//! - The selection action reports back through the action channel
//!
//! Keys: j/k or arrows to move, Enter to tap, Esc/q to cancel,
//! r to reopen after dismissal, q to quit. Mouse clicks tap rows.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p sheet-picker
//! cargo run -p sheet-picker -- --popover --log /tmp/sheet.log
//! cargo run -p sheet-picker -- --appearance appearance.json --keymap keys.json
//! ```

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tui_sheet::appearance;
use tui_sheet::prelude::*;

/// Action sheet demo
#[derive(Parser, Debug)]
#[command(name = "sheet-picker")]
#[command(about = "Present a tui-sheet action sheet in the terminal")]
struct Args {
    /// Present as a centered popover instead of a bottom sheet
    #[arg(long)]
    popover: bool,

    /// JSON file with appearance overrides
    #[arg(long)]
    appearance: Option<PathBuf>,

    /// JSON file with key bindings, merged onto the defaults
    #[arg(long)]
    keymap: Option<PathBuf>,

    /// Write logs to this file (RUST_LOG filters, default "debug")
    #[arg(long)]
    log: Option<PathBuf>,
}

// ============================================================================
// Actions - What can happen
// ============================================================================

#[derive(Clone, Debug)]
enum AppAction {
    SheetHighlight(RowPosition),
    SheetTap(RowPosition),
    SheetClose,
    SheetReopen,
    SheetDidSelect(String),
    Render,
    Quit,
}

// ============================================================================
// State - What the app knows
// ============================================================================

struct AppState {
    sheet: ActionSheet,
    highlighted: Option<RowPosition>,
    keymap: Keymap,
    popover: bool,
    history: Vec<String>,
    action_tx: mpsc::UnboundedSender<AppAction>,
}

impl AppState {
    fn new(
        keymap: Keymap,
        popover: bool,
        action_tx: mpsc::UnboundedSender<AppAction>,
    ) -> tui_sheet::Result<Self> {
        let sheet = build_sheet(popover, action_tx.clone())?;
        Ok(Self {
            sheet,
            highlighted: None,
            keymap,
            popover,
            history: Vec::new(),
            action_tx,
        })
    }

    fn props(&self) -> ActionSheetViewProps<'_, AppAction> {
        ActionSheetViewProps {
            sheet: &self.sheet,
            highlighted: self.highlighted,
            keymap: &self.keymap,
            is_focused: !self.sheet.is_dismissed(),
            on_highlight: AppAction::SheetHighlight,
            on_tap: AppAction::SheetTap,
            on_cancel: || AppAction::SheetClose,
        }
    }

    /// Apply an action, returning whether to re-render
    fn apply(&mut self, action: AppAction) -> tui_sheet::Result<bool> {
        match action {
            AppAction::SheetHighlight(position) => {
                self.highlighted = Some(position);
            }
            AppAction::SheetTap(position) => {
                let outcome = self.sheet.tap(position)?;
                debug!(?position, ?outcome, "Applied tap");
                if outcome == TapOutcome::Dismissed {
                    self.highlighted = None;
                }
            }
            AppAction::SheetClose => {
                self.sheet.dismiss();
                self.highlighted = None;
            }
            AppAction::SheetReopen => {
                self.sheet = build_sheet(self.popover, self.action_tx.clone())?;
            }
            AppAction::SheetDidSelect(summary) => {
                self.history.push(summary);
            }
            AppAction::Render | AppAction::Quit => {}
        }
        Ok(true)
    }
}

fn sample_rows() -> Vec<Row> {
    vec![
        Row::title("Share \"notes.md\""),
        Row::item("Copy link"),
        Row::item("Send by email to the whole project team"),
        Row::toggle("Include comments", false),
        Row::toggle("Read-only", true),
        Row::section_margin(),
        Row::section_title("Export"),
        Row::item("PDF").with_value(serde_json::json!({ "format": "pdf" })),
        Row::item("Markdown").with_value(serde_json::json!({ "format": "md" })),
        Row::ok_button("Share"),
        Row::cancel_button("Cancel"),
    ]
}

fn build_sheet(
    popover: bool,
    action_tx: mpsc::UnboundedSender<AppAction>,
) -> tui_sheet::Result<ActionSheet> {
    let builder = ActionSheet::builder(sample_rows())
        .row_heights(TerminalHeights)
        .header(TextHeader::new(["Anyone with the link can view"]))
        .on_select(move |_sheet, row| {
            let summary = match (row.is_toggled(), row.value()) {
                (Some(on), _) => format!("{}: {}", row.title_text(), if on { "on" } else { "off" }),
                (None, Some(value)) => format!("{} {}", row.title_text(), value),
                (None, None) => row.title_text().to_string(),
            };
            action_tx.send(AppAction::SheetDidSelect(summary))?;
            Ok(())
        });
    let builder = if popover {
        builder.presenter(PopoverPresenter::new())
    } else {
        builder.presenter(ModalPresenter::new())
    };
    builder.build()
}

// ============================================================================
// Configuration
// ============================================================================

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> io::Result<Keymap> {
    if let Some(path) = &args.appearance {
        let loaded = Appearance::from_json(&fs::read_to_string(path)?).map_err(io::Error::other)?;
        appearance::standard()
            .update(|standard| {
                *standard = loaded;
                Ok(())
            })
            .map_err(io::Error::other)?;
        info!(path = %path.display(), "Loaded appearance");
    }

    let keymap = match &args.keymap {
        Some(path) => {
            let user = Keymap::from_json(&fs::read_to_string(path)?).map_err(io::Error::other)?;
            info!(path = %path.display(), "Loaded keymap");
            Keymap::merge(Keymap::default(), user)
        }
        None => Keymap::default(),
    };
    Ok(keymap)
}

// ============================================================================
// Main - Setup terminal, run event loop, cleanup
// ============================================================================

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log {
        init_logging(path)?;
    }
    let keymap = match load_config(&args) {
        Ok(keymap) => keymap,
        Err(e) => {
            eprintln!("Error: could not load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, keymap, args.popover).await;

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    keymap: Keymap,
    popover: bool,
) -> io::Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let mut state = AppState::new(keymap, popover, action_tx.clone()).map_err(io::Error::other)?;
    let mut view = ActionSheetView::new();
    let modal = ModalStyle::with_bg(Color::Rgb(30, 30, 40));

    // Event poller
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
    let cancel_token = CancellationToken::new();
    let _handle = spawn_event_poller(
        event_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel_token.clone(),
    );

    let mut should_render = true;

    loop {
        if should_render {
            if !state.sheet.is_dismissed() {
                let width = terminal.size()?.width;
                if !state.popover {
                    state
                        .sheet
                        .set_content_width(f32::from(width))
                        .map_err(io::Error::other)?;
                }
                state.sheet.host_will_layout().map_err(io::Error::other)?;
            }

            terminal.draw(|frame| {
                let area = frame.area();
                let [body, help_area] =
                    Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

                let mut lines = vec!["Selections:".to_string()];
                lines.extend(state.history.iter().map(|s| format!("  {}", s)));
                let body_text = Paragraph::new(lines.join("\n"))
                    .wrap(Wrap { trim: false })
                    .block(Block::default().title(" notes.md ").borders(Borders::ALL));
                frame.render_widget(body_text, body);

                let help = if state.sheet.is_dismissed() {
                    "r: reopen sheet  q: quit".to_string()
                } else {
                    let hint = |command| state.keymap.hint(command).unwrap_or_default();
                    format!(
                        "{}/{}: move  {}: tap  {}: cancel",
                        hint(SheetCommand::Next),
                        hint(SheetCommand::Previous),
                        hint(SheetCommand::Select),
                        hint(SheetCommand::Cancel),
                    )
                };
                frame.render_widget(
                    Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
                    help_area,
                );

                if !state.sheet.is_dismissed() {
                    view.present(frame, state.props(), &modal);
                }
            })?;
            should_render = false;
        }

        tokio::select! {
            Some(raw_event) = event_rx.recv() => {
                let Some(event) = process_raw_event(raw_event) else {
                    continue;
                };
                if event.is_global() {
                    let action = match event {
                        EventKind::Resize(..) => AppAction::Render,
                        _ => AppAction::Quit,
                    };
                    let _ = action_tx.send(action);
                    continue;
                }
                if state.sheet.is_dismissed() {
                    if let EventKind::Key(key) = event {
                        let action = match key.code {
                            KeyCode::Char('r') => Some(AppAction::SheetReopen),
                            KeyCode::Char('q') | KeyCode::Esc => Some(AppAction::Quit),
                            _ => None,
                        };
                        if let Some(a) = action {
                            let _ = action_tx.send(a);
                        }
                    }
                    continue;
                }
                for action in view.handle_event(&event, state.props()) {
                    let _ = action_tx.send(action);
                }
            }
            Some(action) = action_rx.recv() => {
                if matches!(action, AppAction::Quit) {
                    break;
                }
                match state.apply(action) {
                    Ok(render) => should_render = render,
                    Err(e) => {
                        warn!(error = %e, "Action failed");
                        should_render = true;
                    }
                }
            }
        }
    }

    cancel_token.cancel();
    info!(selections = state.history.len(), "Exiting");
    Ok(())
}

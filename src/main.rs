//! A terminal document reader with site-style navigation chrome.
//!
//! Scroll past the threshold and a "↑ Top" trigger appears; click it (or
//! press `t`) to glide back to the top.  Narrow terminals fold the section
//! nav into a menu button; `c` opens the table of contents.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stdout, Stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Frame, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    frames, handler,
    state::{ActiveView, AppState},
};
use crate::core::{animator::ScrollTarget, document::Document, scheduler::SchedulingStrategy};
use crate::ui::{
    contents::ContentsPanel,
    header::HeaderWidget,
    page::PageWidget,
    popup::{NavDropdown, SettingsPopup},
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal reader with smooth back-to-top")]
struct Cli {
    /// Document to open (`-` reads stdin).
    #[arg(default_value = "-")]
    path: PathBuf,

    /// Rows scrolled before the back-to-top trigger appears.
    #[arg(long)]
    offset: Option<u32>,

    /// Scroll-to-top animation length in milliseconds.
    #[arg(long)]
    duration: Option<u64>,

    /// Frame pacing: frame, interval or immediate.
    #[arg(long)]
    strategy: Option<SchedulingStrategy>,

    /// Disable the back-to-top trigger.
    #[arg(long = "no-backtop")]
    no_backtop: bool,
}

// ───────────────────────────────────────── drawing ──────────

fn draw(frame: &mut Frame, state: &AppState) {
    let layout = handler::layout(state);
    let sections = handler::section_titles(state);

    frame.render_widget(
        HeaderWidget {
            title: state.document.title(),
            sections: &sections,
            current_section: handler::current_section(state),
            collapsible: state.menu.is_collapsible(),
            menu_active: state.menu.is_active(),
            contents_open: state.contents.is_open(),
        },
        layout.header_area,
    );

    let max = state.viewport.max_offset();
    let pct = if max > 0.0 {
        (state.viewport.scroll_offset() / max * 100.0).round() as u16
    } else {
        100
    };
    let trigger = handler::trigger_visible(state)
        .then(|| layout.trigger_rect())
        .flatten();
    frame.render_widget(
        PageWidget::new(&state.document, state.viewport.top_row())
            .trigger(trigger)
            .scroll_percent(pct),
        layout.page_area,
    );

    if let Some(area) = layout.contents_area {
        frame.render_widget(
            ContentsPanel {
                headings: state.document.headings(),
                current: state.current_heading(),
            },
            area,
        );
    }

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Reader => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::SettingsMenu => "",
    };
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    if let Some(area) = handler::nav_dropdown(state) {
        frame.render_widget(
            NavDropdown {
                sections: &sections,
                selected: state.nav_selected,
            },
            area,
        );
    }

    if state.active_view == ActiveView::SettingsMenu {
        frame.render_widget(SettingsPopup { state }, frame.area());
    }
}

// ───────────────────────────────────────── event loop ───────

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut AppState,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, state))?;

        // Frames are due on the queue's clock; sleep until the next one
        // unless input arrives first.
        let deadline = state
            .frames
            .next_deadline()
            .map(|d| tokio::time::Instant::from_std(state.epoch + d));

        tokio::select! {
            biased;

            event = events.recv() => match event {
                Some(AppEvent::Key(k)) => handler::handle_key(state, k),
                Some(AppEvent::Mouse(m)) => handler::handle_mouse(state, m),
                Some(AppEvent::Resize(w, h)) => handler::handle_resize(state, w, h),
                None => break,
            },

            _ = tokio::time::sleep_until(deadline.unwrap_or_else(tokio::time::Instant::now)),
                if deadline.is_some() =>
            {
                let now = state.now();
                frames::run_due_frames(state, now);
            }
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut user_config = config::AppConfig::load();
    if let Some(offset) = cli.offset {
        user_config.backtop_offset = offset;
    }
    if let Some(ms) = cli.duration {
        user_config.scroll_duration_ms = ms;
    }
    if let Some(strategy) = cli.strategy {
        user_config.strategy = strategy;
        user_config.strategy = user_config.scheduling();
    }
    if cli.no_backtop {
        user_config.backtop = false;
    }

    let document = Document::load(&cli.path)
        .with_context(|| format!("cannot open {}", cli.path.display()))?;
    tracing::debug!(
        lines = document.line_count(),
        headings = document.headings().len(),
        "document loaded"
    );
    let mut state = AppState::new(document, user_config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    handler::handle_resize(&mut state, size.width, size.height);

    let mut events = spawn_event_reader();
    let result = run(&mut terminal, &mut state, &mut events).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

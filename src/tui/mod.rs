pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::app::{AppContext, Result};
use crate::comments::{self, CommentsRequest};
use crate::domain::FeedKind;
use crate::feed::{self, PageRequest};
use crate::format::{now_millis, today};

use self::app::{InputMode, PicksState, TuiApp};
use self::event::{Action, AppEvent, EventHandler, TaskResult};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let invalid = ctx.config.keybindings.invalid_bindings();
    if !invalid.is_empty() {
        warn!("ignoring invalid keybindings: {}", invalid.join(", "));
    }

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs request tasks and posts their results back to the event loop.
///
/// When the loop exits the receiver is dropped and late results are lost.
struct Tasks {
    ctx: Arc<AppContext>,
    tx: UnboundedSender<TaskResult>,
}

impl Tasks {
    fn page(&self, request: PageRequest) {
        let client = self.ctx.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let response = feed::execute(&client, request).await;
            let _ = tx.send(TaskResult::Page(response));
        });
    }

    fn maybe_page(&self, request: Option<PageRequest>) {
        if let Some(request) = request {
            self.page(request);
        }
    }

    fn comments(&self, request: CommentsRequest) {
        let client = self.ctx.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let response = comments::execute(&client, request).await;
            let _ = tx.send(TaskResult::Comments(response));
        });
    }

    fn picks(&self) {
        let client = self.ctx.client.clone();
        let tx = self.tx.clone();
        let count = self.ctx.config.feed.best_picks;
        tokio::spawn(async move {
            let result = client.best_picks(count).await.map_err(|e| e.to_string());
            let _ = tx.send(TaskResult::Picks(result));
        });
    }
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let mut tui_app = TuiApp::new(FeedKind::Top, today(), now_millis(), &ctx.config.feed);
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let tasks = Tasks {
        ctx: ctx.clone(),
        tx,
    };

    info!("starting TUI against {}", ctx.config.api.base_url);
    tasks.page(tui_app.view.start());
    tasks.picks();

    loop {
        drain_results(&mut tui_app, &tasks, &mut rx);
        tui_app.sync();
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &ctx.config.colors))?;

        // The list offset is only known after a render.
        if !tui_app.comments.is_open() && !tui_app.rules_open {
            tasks.maybe_page(tui_app.check_sentinel());
        }

        match event_handler.next()? {
            AppEvent::Key(key) => {
                if tui_app.input_mode == InputMode::Search {
                    handle_search_key(&mut tui_app, key);
                } else {
                    let action = ctx.config.keybindings.get_action(&key);
                    if tui_app.comments.is_open() {
                        handle_dialog_action(&mut tui_app, action);
                    } else if tui_app.rules_open {
                        handle_rules_action(&mut tui_app, action);
                    } else {
                        handle_action(&mut tui_app, &tasks, action);
                    }
                }
            }
            AppEvent::Tick => {
                tui_app.view.set_now(now_millis());
            }
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

fn drain_results(tui_app: &mut TuiApp, tasks: &Tasks, rx: &mut UnboundedReceiver<TaskResult>) {
    while let Ok(result) = rx.try_recv() {
        match result {
            TaskResult::Page(response) => {
                let next = tui_app.view.apply(response);
                tasks.maybe_page(next);
            }
            TaskResult::Comments(response) => tui_app.comments.apply(response),
            TaskResult::Picks(result) => {
                tui_app.picks = match result {
                    Ok(stories) => PicksState::Loaded(stories),
                    Err(e) => {
                        warn!("best picks failed: {}", e);
                        PicksState::Failed(e)
                    }
                };
            }
        }
    }
}

fn handle_search_key(tui_app: &mut TuiApp, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            tui_app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            tui_app.search_input.clear();
            tui_app.view.set_search("");
            tui_app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            tui_app.search_input.pop();
            tui_app.view.set_search(tui_app.search_input.clone());
        }
        KeyCode::Char(c) => {
            tui_app.search_input.push(c);
            tui_app.view.set_search(tui_app.search_input.clone());
        }
        _ => {}
    }
    tui_app.reset_selection();
}

fn handle_dialog_action(tui_app: &mut TuiApp, action: Action) {
    match action {
        Action::CloseDialog | Action::Quit => tui_app.comments.close(),
        Action::MoveUp => tui_app.comments.scroll_up(),
        Action::MoveDown => tui_app.comments.scroll_down(),
        Action::OpenInBrowser => {
            if let Some(story) = tui_app.comments.story() {
                let link = app::story_link(story);
                open_link(tui_app, &link);
            }
        }
        _ => {}
    }
}

fn handle_rules_action(tui_app: &mut TuiApp, action: Action) {
    match action {
        Action::CloseDialog | Action::Quit | Action::ShowRules => tui_app.close_rules(),
        Action::OpenInBrowser => open_link(tui_app, app::SHOW_HN_RULES_URL),
        _ => {}
    }
}

fn handle_action(tui_app: &mut TuiApp, tasks: &Tasks, action: Action) {
    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::MoveUp => tui_app.move_up(),
        Action::MoveDown => tui_app.move_down(),
        Action::NextPage => tui_app.next_page(),
        Action::PrevPage => tui_app.prev_page(),
        Action::NextFeed => {
            let kind = tui_app.view.kind().next();
            switch_feed(tui_app, tasks, kind);
        }
        Action::PrevFeed => {
            let kind = tui_app.view.kind().prev();
            switch_feed(tui_app, tasks, kind);
        }
        Action::SelectFeed(kind) => switch_feed(tui_app, tasks, kind),
        Action::OpenComments => {
            if let Some(story) = tui_app.selected_story().cloned() {
                debug!("opening comments for story {}", story.id);
                if let Some(request) = tui_app.comments.open_for(story) {
                    tasks.comments(request);
                }
            }
        }
        Action::CloseDialog => {
            tui_app.clear_status();
        }
        Action::OpenInBrowser => {
            if let Some(link) = tui_app.selected_link() {
                open_link(tui_app, &link);
            }
        }
        Action::Search => {
            tui_app.search_input = tui_app.view.filter().search.clone();
            tui_app.input_mode = InputMode::Search;
        }
        Action::PrevDay | Action::NextDay | Action::Today => {
            if !tui_app.view.kind().uses_date_filter() {
                tui_app.set_status("The date filter applies to Top only".to_string());
                return;
            }
            let today = today();
            let changed = match action {
                Action::PrevDay => tui_app.dates.prev(),
                Action::NextDay => tui_app.dates.next(today),
                _ => tui_app.dates.today(today),
            };
            if changed {
                tui_app.clear_status();
                tui_app.reset_selection();
                tasks.maybe_page(tui_app.view.set_date(tui_app.dates.selected()));
            }
        }
        Action::CycleRange => {
            let range = tui_app.view.cycle_range();
            tui_app.reset_selection();
            tui_app.set_status(format!(
                "Range: {}",
                range.map(|r| r.as_str()).unwrap_or("all")
            ));
        }
        Action::ToggleSort => {
            if tui_app.view.toggle_sort() {
                tui_app.reset_selection();
                tui_app.set_status(format!("Sort: {}", tui_app.view.filter().sort.label()));
            } else {
                tui_app.set_status("Sorting applies to Show, Ask and Jobs".to_string());
            }
        }
        Action::Refresh => {
            info!("refreshing {}", tui_app.view.kind());
            tasks.ctx.client.invalidate_all();
            tui_app.picks = PicksState::Loading;
            tui_app.reset_selection();
            tasks.page(tui_app.view.start());
            tasks.picks();
        }
        Action::ShowRules => {
            if !tui_app.open_rules() {
                tui_app.set_status("Rules are shown on the Show tab".to_string());
            }
        }
        Action::None => {}
    }
}

fn switch_feed(tui_app: &mut TuiApp, tasks: &Tasks, kind: FeedKind) {
    if let Some(request) = tui_app.view.set_kind(kind) {
        tui_app.reset_selection();
        tui_app.clear_status();
        tasks.page(request);
    }
}

fn open_link(tui_app: &mut TuiApp, link: &str) {
    if let Err(e) = open::that(link) {
        tui_app.set_status(format!("Failed to open browser: {}", e));
    }
}

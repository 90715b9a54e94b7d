mod providers;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use tokio::sync::mpsc;

use fwlens_core::browse::{BrowseSnapshot, Browsable, Browser, RefreshPolicy};
use fwlens_core::config::{ConfigError, FwlensConfig};
use fwlens_core::model::{LogEntry, LogKind, NatRule, RemoteUser, SecurityRule, Session};
use fwlens_core::provider::{
    Provider, ProviderCommand, Refresh, RefreshEvent, ViewKind, run_refresh_loop,
};

use providers::{FakeProvider, ReplayProvider, format_bytes, format_epoch};
use ui::styles;

#[derive(Parser)]
#[command(name = "fwlens")]
#[command(about = "Browse live firewall state from the terminal", long_about = None)]
struct Cli {
    /// Config file path (default: search for fwlens.yaml upward)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the refresh interval in milliseconds
    #[arg(long, global = true)]
    refresh_ms: Option<u64>,

    /// Theme override: dark or light
    #[arg(long, global = true)]
    theme: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the built-in simulated appliance (default)
    Demo {
        /// Seed for the simulated data
        #[arg(long, default_value_t = 7)]
        seed: u64,

        /// Fail every Nth sessions fetch, to exercise the error banner
        #[arg(long)]
        fail_every: Option<u64>,
    },
    /// Browse a captured JSON snapshot instead of a live appliance
    Replay { file: PathBuf },
    /// Validate a config file and exit
    CheckConfig { path: Option<PathBuf> },
}

fn load_config(cli: &Cli) -> Result<FwlensConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => FwlensConfig::load(path)?,
        None => match std::env::current_dir() {
            Ok(dir) => match FwlensConfig::discover(&dir) {
                Ok((_, config)) => config,
                Err(ConfigError::NotFound { .. }) => FwlensConfig::default(),
                Err(e) => return Err(e),
            },
            Err(_) => FwlensConfig::default(),
        },
    };
    if let Some(refresh_ms) = cli.refresh_ms {
        config.refresh_interval_ms = refresh_ms;
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::CheckConfig { path }) = &cli.command {
        let result = match path {
            Some(path) => FwlensConfig::load(path).map(|c| (path.clone(), c)),
            None => std::env::current_dir()
                .map_err(ConfigError::Io)
                .and_then(|dir| FwlensConfig::discover(&dir)),
        };
        match result {
            Ok((path, _)) => {
                println!("{}: ok", path.display());
                return Ok(());
            }
            Err(e) => {
                eprintln!("fwlens: {}", e);
                std::process::exit(1);
            }
        }
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("fwlens: {}", e);
            std::process::exit(1);
        }
    };
    ui::theme::init(&config.theme);

    let provider: Box<dyn Provider> = match cli.command {
        Some(Commands::Replay { file }) => match ReplayProvider::load(&file) {
            Ok(provider) => Box::new(provider),
            Err(e) => {
                eprintln!("fwlens: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Demo { seed, fail_every }) => {
            let mut provider = FakeProvider::new(seed, config.log_page_size);
            if let Some(every) = fail_every {
                provider = provider.with_failure_cadence(every);
            }
            Box::new(provider)
        }
        None => Box::new(FakeProvider::new(7, config.log_page_size)),
        Some(Commands::CheckConfig { .. }) => unreachable!("handled above"),
    };

    run_tui(provider, config).await
}

async fn run_tui(provider: Box<dyn Provider>, config: FwlensConfig) -> io::Result<()> {
    let provider_name = provider.name();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::channel(64);
    let refresh_task = tokio::spawn(run_refresh_loop(
        provider,
        Duration::from_millis(config.refresh_interval_ms),
        cmd_rx,
        event_tx,
    ));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(provider_name);
    let result = event_loop(&mut terminal, &mut app, &mut event_rx, cmd_tx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    refresh_task.abort();
    result
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum View {
    Sessions,
    Policies,
    Nat,
    Logs,
    Users,
}

impl View {
    fn all() -> [Self; 5] {
        [Self::Sessions, Self::Policies, Self::Nat, Self::Logs, Self::Users]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::Policies => "policies",
            Self::Nat => "nat",
            Self::Logs => "logs",
            Self::Users => "users",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Sessions => Self::Policies,
            Self::Policies => Self::Nat,
            Self::Nat => Self::Logs,
            Self::Logs => Self::Users,
            Self::Users => Self::Sessions,
        }
    }
}

/// Status-line fields common to every view.
struct StatusMeta {
    filtered: usize,
    raw: usize,
    sort_label: &'static str,
    ascending: bool,
    query: String,
    pending: Option<String>,
    has_error: bool,
}

struct App {
    sessions: Browser<Session>,
    rules: Browser<SecurityRule>,
    nat: Browser<NatRule>,
    log_system: Browser<LogEntry>,
    log_traffic: Browser<LogEntry>,
    log_threat: Browser<LogEntry>,
    users: Browser<RemoteUser>,
    view: View,
    log_kind: LogKind,
    help_open: bool,
    last_refresh: Option<Instant>,
    provider_name: &'static str,
}

impl App {
    fn new(provider_name: &'static str) -> Self {
        Self {
            sessions: Browser::new(RefreshPolicy::PreserveCursor),
            rules: Browser::new(RefreshPolicy::PreserveCursor),
            nat: Browser::new(RefreshPolicy::PreserveCursor),
            // Logs churn every cycle; position is meaningless across
            // refreshes, so those views jump back to the top.
            log_system: Browser::new(RefreshPolicy::ResetCursor),
            log_traffic: Browser::new(RefreshPolicy::ResetCursor),
            log_threat: Browser::new(RefreshPolicy::ResetCursor),
            users: Browser::new(RefreshPolicy::PreserveCursor),
            view: View::Sessions,
            log_kind: LogKind::Traffic,
            help_open: false,
            last_refresh: None,
            provider_name,
        }
    }

    fn log_browser(&self, kind: LogKind) -> &Browser<LogEntry> {
        match kind {
            LogKind::System => &self.log_system,
            LogKind::Traffic => &self.log_traffic,
            LogKind::Threat => &self.log_threat,
        }
    }

    fn log_browser_mut(&mut self, kind: LogKind) -> &mut Browser<LogEntry> {
        match kind {
            LogKind::System => &mut self.log_system,
            LogKind::Traffic => &mut self.log_traffic,
            LogKind::Threat => &mut self.log_threat,
        }
    }

    fn view_kind(&self) -> ViewKind {
        match self.view {
            View::Sessions => ViewKind::Sessions,
            View::Policies => ViewKind::Rules,
            View::Nat => ViewKind::Nat,
            View::Logs => ViewKind::Logs(self.log_kind),
            View::Users => ViewKind::Users,
        }
    }

    fn apply_refresh(&mut self, event: RefreshEvent) {
        match event.payload {
            Refresh::Sessions(result) => {
                let (items, err) = split(result);
                self.sessions.set_items(items, err);
                self.last_refresh = Some(Instant::now());
            }
            Refresh::Rules(result) => {
                let (items, err) = split(result);
                self.rules.set_items(items, err);
            }
            Refresh::Nat(result) => {
                let (items, err) = split(result);
                self.nat.set_items(items, err);
            }
            Refresh::Logs(kind, result) => {
                let (items, err) = split(result);
                self.log_browser_mut(kind).set_items(items, err);
            }
            Refresh::Users(result) => {
                let (items, err) = split(result);
                self.users.set_items(items, err);
            }
            Refresh::Detail { view, id, result } => match view {
                ViewKind::Sessions => deliver_detail(&mut self.sessions, &id, result),
                ViewKind::Rules => deliver_detail(&mut self.rules, &id, result),
                ViewKind::Nat => deliver_detail(&mut self.nat, &id, result),
                ViewKind::Logs(kind) => deliver_detail(self.log_browser_mut(kind), &id, result),
                ViewKind::Users => deliver_detail(&mut self.users, &id, result),
            },
        }
    }

    fn in_filter_edit(&self) -> bool {
        match self.view {
            View::Sessions => self.sessions.in_filter_edit(),
            View::Policies => self.rules.in_filter_edit(),
            View::Nat => self.nat.in_filter_edit(),
            View::Logs => self.log_browser(self.log_kind).in_filter_edit(),
            View::Users => self.users.in_filter_edit(),
        }
    }

    fn expanded(&self) -> bool {
        match self.view {
            View::Sessions => self.sessions.is_expanded(),
            View::Policies => self.rules.is_expanded(),
            View::Nat => self.nat.is_expanded(),
            View::Logs => self.log_browser(self.log_kind).is_expanded(),
            View::Users => self.users.is_expanded(),
        }
    }

    fn handle_key(&mut self, name: &str) -> bool {
        match self.view {
            View::Sessions => self.sessions.handle_key(name),
            View::Policies => self.rules.handle_key(name),
            View::Nat => self.nat.handle_key(name),
            View::Logs => {
                let kind = self.log_kind;
                self.log_browser_mut(kind).handle_key(name)
            }
            View::Users => self.users.handle_key(name),
        }
    }

    fn request_detail(&mut self) -> Option<(ViewKind, String)> {
        let kind = self.view_kind();
        let id = match self.view {
            View::Sessions => self.sessions.request_detail(),
            View::Policies => self.rules.request_detail(),
            View::Nat => self.nat.request_detail(),
            View::Logs => {
                let log_kind = self.log_kind;
                self.log_browser_mut(log_kind).request_detail()
            }
            View::Users => self.users.request_detail(),
        }?;
        Some((kind, id))
    }

    fn set_sizes(&mut self, width: u16, rows: u16) {
        self.sessions.set_size(width, rows);
        self.rules.set_size(width, rows);
        self.nat.set_size(width, rows);
        self.log_system.set_size(width, rows);
        self.log_traffic.set_size(width, rows);
        self.log_threat.set_size(width, rows);
        self.users.set_size(width, rows);
    }

    fn status_meta(&self) -> StatusMeta {
        fn meta<T: Browsable>(snap: &BrowseSnapshot<'_, T>) -> StatusMeta {
            StatusMeta {
                filtered: snap.filtered_len,
                raw: snap.raw_len,
                sort_label: snap.sort_label,
                ascending: snap.sort_ascending,
                query: snap.query.to_string(),
                pending: snap.pending_query.map(str::to_string),
                has_error: snap.error.is_some(),
            }
        }
        match self.view {
            View::Sessions => meta(&self.sessions.snapshot()),
            View::Policies => meta(&self.rules.snapshot()),
            View::Nat => meta(&self.nat.snapshot()),
            View::Logs => meta(&self.log_browser(self.log_kind).snapshot()),
            View::Users => meta(&self.users.snapshot()),
        }
    }
}

fn split<T>(result: Result<Vec<T>, fwlens_core::provider::ProviderError>) -> (Vec<T>, Option<String>) {
    match result {
        Ok(items) => (items, None),
        Err(e) => (Vec::new(), Some(e.to_string())),
    }
}

fn deliver_detail<T: Browsable>(
    browser: &mut Browser<T>,
    id: &str,
    result: Result<fwlens_core::browse::Detail, fwlens_core::provider::ProviderError>,
) {
    match result {
        Ok(detail) => browser.detail_arrived(id, detail),
        Err(_) => browser.detail_failed(id),
    }
}

/// Decode a crossterm key event into the symbolic names the core expects.
fn key_name(code: KeyCode, modifiers: KeyModifiers) -> Option<String> {
    match (code, modifiers) {
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Some("ctrl+d".into()),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some("ctrl+u".into()),
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => Some(c.to_string()),
        (KeyCode::Down, _) => Some("down".into()),
        (KeyCode::Up, _) => Some("up".into()),
        (KeyCode::Home, _) => Some("home".into()),
        (KeyCode::End, _) => Some("end".into()),
        (KeyCode::PageDown, _) => Some("page-down".into()),
        (KeyCode::PageUp, _) => Some("page-up".into()),
        (KeyCode::Enter, _) => Some("enter".into()),
        (KeyCode::Esc, _) => Some("esc".into()),
        (KeyCode::Backspace, _) => Some("backspace".into()),
        (KeyCode::Tab, _) => Some("tab".into()),
        _ => None,
    }
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<RefreshEvent>,
    cmd_tx: mpsc::Sender<ProviderCommand>,
) -> io::Result<()> {
    loop {
        while let Ok(refresh) = event_rx.try_recv() {
            app.apply_refresh(refresh);
        }

        let size = terminal.size()?;
        // tabs(1) + status(1) + table borders(2) + header(1)
        app.set_sizes(size.width, size.height.saturating_sub(5));

        terminal.draw(|f| draw(f, app))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = event::read()?;
        let CEvent::Key(KeyEvent { code, modifiers, kind, .. }) = ev else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }

        if app.help_open {
            match code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.help_open = false,
                _ => {}
            }
            continue;
        }

        let Some(name) = key_name(code, modifiers) else {
            continue;
        };

        // While the filter prompt is open, every key belongs to the edit
        // buffer, including 'q' and the view digits.
        if app.in_filter_edit() {
            app.handle_key(&name);
            continue;
        }

        match name.as_str() {
            "q" => return Ok(()),
            "?" => {
                app.help_open = true;
                continue;
            }
            "tab" => {
                app.view = app.view.next();
                continue;
            }
            "1" => {
                app.view = View::Sessions;
                continue;
            }
            "2" => {
                app.view = View::Policies;
                continue;
            }
            "3" => {
                app.view = View::Nat;
                continue;
            }
            "4" => {
                app.view = View::Logs;
                continue;
            }
            "5" => {
                app.view = View::Users;
                continue;
            }
            "t" if app.view == View::Logs => {
                app.log_kind = app.log_kind.next();
                continue;
            }
            _ => {}
        }

        let was_expanded = app.expanded();
        app.handle_key(&name);
        if name == "enter" && !was_expanded && app.expanded() {
            if let Some((view, id)) = app.request_detail() {
                let _ = cmd_tx.try_send(ProviderCommand::FetchDetail { view, id });
            }
        }
    }
}

// ---------- rendering ----------

struct TableSpec {
    title: &'static str,
    header: &'static [&'static str],
    widths: &'static [Constraint],
}

const SESSIONS_SPEC: TableSpec = TableSpec {
    title: " Sessions ",
    header: &["ID", "APPLICATION", "ADDRESSES", "ZONES", "RULE", "BYTES", "START"],
    widths: &[
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Min(30),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(9),
    ],
};

const POLICIES_SPEC: TableSpec = TableSpec {
    title: " Security Policies ",
    header: &["POS", "NAME", "FROM", "TO", "APPLICATION", "ACTION", "HITS", "LAST HIT"],
    widths: &[
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(9),
    ],
};

const NAT_SPEC: TableSpec = TableSpec {
    title: " NAT Rules ",
    header: &["POS", "NAME", "ZONES", "ORIGINAL", "TRANSLATED", "SERVICE", "HITS"],
    widths: &[
        Constraint::Length(4),
        Constraint::Min(14),
        Constraint::Length(14),
        Constraint::Length(22),
        Constraint::Length(22),
        Constraint::Length(14),
        Constraint::Length(8),
    ],
};

const LOGS_SPEC: TableSpec = TableSpec {
    title: " Logs ",
    header: &["TIME", "SEVERITY", "EVENT", "DETAILS"],
    widths: &[
        Constraint::Length(9),
        Constraint::Length(13),
        Constraint::Length(24),
        Constraint::Min(30),
    ],
};

const USERS_SPEC: TableSpec = TableSpec {
    title: " Remote Users ",
    header: &["USER", "CLIENT IP", "GATEWAY", "TUNNEL", "LOGIN"],
    widths: &[
        Constraint::Min(12),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(9),
    ],
};

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    draw_tabs(f, chunks[0], app);
    draw_body(f, chunks[1], app);
    draw_status(f, chunks[2], app);

    if app.help_open {
        draw_help(f);
    }
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = vec![Span::styled(" fwlens ", styles::title())];
    for (i, view) in View::all().iter().enumerate() {
        let label = if *view == View::Logs {
            format!(" {}:{}[{}] ", i + 1, view.label(), app.log_kind.label())
        } else {
            format!(" {}:{} ", i + 1, view.label())
        };
        spans.push(Span::styled(label, styles::tab(*view == app.view)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
    match app.view {
        View::Sessions => {
            let snap = app.sessions.snapshot();
            draw_view(f, area, &snap, &SESSIONS_SPEC, &session_row, &session_fields);
        }
        View::Policies => {
            let snap = app.rules.snapshot();
            draw_view(f, area, &snap, &POLICIES_SPEC, &rule_row, &rule_fields);
        }
        View::Nat => {
            let snap = app.nat.snapshot();
            draw_view(f, area, &snap, &NAT_SPEC, &nat_row, &nat_fields);
        }
        View::Logs => {
            let snap = app.log_browser(app.log_kind).snapshot();
            draw_view(f, area, &snap, &LOGS_SPEC, &log_row, &log_fields);
        }
        View::Users => {
            let snap = app.users.snapshot();
            draw_view(f, area, &snap, &USERS_SPEC, &user_row, &user_fields);
        }
    }
}

fn draw_view<T: Browsable>(
    f: &mut Frame,
    area: Rect,
    snap: &BrowseSnapshot<'_, T>,
    spec: &TableSpec,
    mk_row: &dyn Fn(&T) -> Row<'static>,
    mk_fields: &dyn Fn(&T) -> Vec<(String, String)>,
) {
    let (table_area, detail_area) = if snap.expanded {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(spec.title, styles::title()));

    if let Some(err) = snap.error {
        // A fetch error takes rendering precedence over the table; the
        // last-good data comes back on the next successful refresh.
        let lines = vec![
            Line::from(Span::styled("fetch failed", styles::error())),
            Line::from(""),
            Line::from(Span::styled(err.to_string(), styles::text())),
            Line::from(""),
            Line::from(Span::styled(
                "waiting for the next refresh cycle",
                styles::text_muted(),
            )),
        ];
        f.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            table_area,
        );
    } else if snap.loading && snap.raw_len == 0 {
        f.render_widget(
            Paragraph::new("loading…").style(styles::text_dim()).block(block),
            table_area,
        );
    } else if snap.filtered_len == 0 {
        let text = if snap.raw_len == 0 {
            "nothing to show".to_string()
        } else {
            format!("no results for '{}'", snap.query)
        };
        f.render_widget(
            Paragraph::new(text).style(styles::text_dim()).block(block),
            table_area,
        );
    } else {
        let header = Row::new(
            spec.header.iter().map(|h| Cell::from(*h)).collect::<Vec<_>>(),
        )
        .style(styles::text_muted());
        let rows: Vec<Row> = snap
            .window
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let row = mk_row(item);
                if i == snap.cursor_in_window {
                    row.style(styles::selection())
                } else {
                    row
                }
            })
            .collect();
        let table = Table::new(rows, spec.widths.to_vec()).header(header).block(block);
        f.render_widget(table, table_area);
    }

    if let Some(detail_area) = detail_area {
        draw_detail(f, detail_area, snap, mk_fields);
    }
}

fn draw_detail<T: Browsable>(
    f: &mut Frame,
    area: Rect,
    snap: &BrowseSnapshot<'_, T>,
    mk_fields: &dyn Fn(&T) -> Vec<(String, String)>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(" Detail ", styles::title()));

    let mut lines: Vec<Line> = Vec::new();
    match snap.selected {
        None => lines.push(Line::from(Span::styled("nothing selected", styles::text_muted()))),
        Some(item) => {
            for (name, value) in mk_fields(item) {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:>14}  ", name), styles::text_muted()),
                    Span::styled(value, styles::text()),
                ]));
            }
            if snap.detail_loading {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "fetching extended info…",
                    styles::text_dim(),
                )));
            } else if let Some(detail) = snap.detail {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("extended", styles::accent())));
                for (name, value) in &detail.fields {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{:>14}  ", name), styles::text_muted()),
                        Span::styled(value.clone(), styles::text()),
                    ]));
                }
            }
        }
    }
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let meta = app.status_meta();
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        format!(" {} {}/{} ", app.view.label(), meta.filtered, meta.raw),
        styles::text(),
    ));
    let arrow = if meta.ascending { "↑" } else { "↓" };
    spans.push(Span::styled(
        format!(" sort:{}{} ", meta.sort_label, arrow),
        styles::text_dim(),
    ));

    match &meta.pending {
        Some(pending) => {
            spans.push(Span::styled(" /", styles::accent()));
            spans.push(Span::styled(pending.clone(), styles::accent()));
            spans.push(Span::styled("▏", styles::accent()));
        }
        None if !meta.query.is_empty() => {
            spans.push(Span::styled(
                format!(" filter:'{}' ", meta.query),
                styles::accent(),
            ));
        }
        None => {}
    }

    if meta.has_error {
        spans.push(Span::styled(" FETCH ERROR ", styles::error()));
    }

    if let Some(at) = app.last_refresh {
        spans.push(Span::styled(
            format!(" refreshed {}s ago ", at.elapsed().as_secs()),
            styles::text_muted(),
        ));
    }
    spans.push(Span::styled(format!(" [{}] ", app.provider_name), styles::text_muted()));
    spans.push(Span::styled(" ?:help q:quit ", styles::key_hint()));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(52, 70, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(" Help ", styles::title()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", keys), styles::key_hint()),
            Span::styled(what, styles::text()),
        ])
    };
    let lines = vec![
        entry("j/k ↓/↑", "Move the cursor"),
        entry("g/G", "Jump to top / bottom"),
        entry("ctrl+d/u", "Page down / up"),
        entry("enter", "Toggle the detail panel"),
        entry("/", "Filter the table (enter commits, esc cancels)"),
        entry("esc", "Clear a committed filter"),
        entry("s", "Cycle the sort column"),
        entry("S", "Flip the sort direction"),
        entry("1-5, tab", "Switch view"),
        entry("t", "Cycle log type (in logs view)"),
        entry("?", "Toggle this help"),
        entry("q", "Quit fwlens"),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn centered_rect(pct_x: u16, pct_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

// ---------- per-view rows and detail fields ----------

fn session_row(s: &Session) -> Row<'static> {
    Row::new(vec![
        Cell::from(s.id.to_string()),
        Cell::from(s.application.clone()),
        Cell::from(format!("{} → {}", s.src_ip, s.dst_ip)),
        Cell::from(format!("{} → {}", s.src_zone, s.dst_zone)),
        Cell::from(s.rule.clone()),
        Cell::from(format_bytes(s.bytes)),
        Cell::from(format_epoch(s.start_epoch)),
    ])
}

fn session_fields(s: &Session) -> Vec<(String, String)> {
    vec![
        ("application".into(), s.application.clone()),
        ("protocol".into(), s.protocol.clone()),
        ("source".into(), format!("{} ({})", s.src_ip, s.src_zone)),
        ("destination".into(), format!("{} ({})", s.dst_ip, s.dst_zone)),
        ("rule".into(), s.rule.clone()),
        ("user".into(), s.user.clone().unwrap_or_else(|| "-".into())),
        ("bytes".into(), format_bytes(s.bytes)),
        ("started".into(), format_epoch(s.start_epoch)),
    ]
}

fn rule_row(r: &SecurityRule) -> Row<'static> {
    let name = if r.disabled { format!("{} (disabled)", r.name) } else { r.name.clone() };
    Row::new(vec![
        Cell::from(r.position.to_string()),
        Cell::from(name),
        Cell::from(r.src_zones.join(",")),
        Cell::from(r.dst_zones.join(",")),
        Cell::from(r.application.clone()),
        Cell::from(Span::styled(r.action.label(), styles::action(r.action))),
        Cell::from(r.hit_count.to_string()),
        Cell::from(r.last_hit_epoch.map(format_epoch).unwrap_or_else(|| "never".into())),
    ])
}

fn rule_fields(r: &SecurityRule) -> Vec<(String, String)> {
    vec![
        ("position".into(), r.position.to_string()),
        ("from".into(), r.src_zones.join(", ")),
        ("to".into(), r.dst_zones.join(", ")),
        ("source".into(), r.src_addrs.join(", ")),
        ("destination".into(), r.dst_addrs.join(", ")),
        ("application".into(), r.application.clone()),
        ("service".into(), r.service.clone()),
        ("action".into(), r.action.label().to_string()),
        ("state".into(), if r.disabled { "disabled" } else { "enabled" }.to_string()),
        ("hits".into(), r.hit_count.to_string()),
    ]
}

fn nat_row(n: &NatRule) -> Row<'static> {
    Row::new(vec![
        Cell::from(n.position.to_string()),
        Cell::from(n.name.clone()),
        Cell::from(format!("{}→{}", n.src_zones.join(","), n.dst_zone)),
        Cell::from(format!("{} / {}", n.original_src, n.original_dst)),
        Cell::from(match &n.translated_dst {
            Some(dst) => format!("{} / {}", n.translated_src, dst),
            None => n.translated_src.clone(),
        }),
        Cell::from(n.service.clone()),
        Cell::from(n.hit_count.to_string()),
    ])
}

fn nat_fields(n: &NatRule) -> Vec<(String, String)> {
    vec![
        ("position".into(), n.position.to_string()),
        ("from".into(), n.src_zones.join(", ")),
        ("to".into(), n.dst_zone.clone()),
        ("original src".into(), n.original_src.clone()),
        ("original dst".into(), n.original_dst.clone()),
        ("translated src".into(), n.translated_src.clone()),
        (
            "translated dst".into(),
            n.translated_dst.clone().unwrap_or_else(|| "-".into()),
        ),
        ("service".into(), n.service.clone()),
        ("hits".into(), n.hit_count.to_string()),
    ]
}

fn log_row(entry: &LogEntry) -> Row<'static> {
    match entry {
        LogEntry::System { at_epoch, event_type, description, severity, .. } => Row::new(vec![
            Cell::from(format_epoch(*at_epoch)),
            Cell::from(Span::styled(severity.label(), styles::severity(*severity))),
            Cell::from(event_type.clone()),
            Cell::from(description.clone()),
        ]),
        LogEntry::Traffic { at_epoch, src_ip, dst_ip, application, action, .. } => Row::new(vec![
            Cell::from(format_epoch(*at_epoch)),
            Cell::from("-"),
            Cell::from(application.clone()),
            Cell::from(format!("{} → {} ({})", src_ip, dst_ip, action)),
        ]),
        LogEntry::Threat { at_epoch, threat_name, category, severity, action, .. } => {
            Row::new(vec![
                Cell::from(format_epoch(*at_epoch)),
                Cell::from(Span::styled(severity.label(), styles::severity(*severity))),
                Cell::from(threat_name.clone()),
                Cell::from(format!("{} ({})", category, action)),
            ])
        }
    }
}

fn log_fields(entry: &LogEntry) -> Vec<(String, String)> {
    match entry {
        LogEntry::System { at_epoch, event_type, description, severity, object } => vec![
            ("time".into(), format_epoch(*at_epoch)),
            ("type".into(), event_type.clone()),
            ("severity".into(), severity.label().to_string()),
            ("description".into(), description.clone()),
            ("object".into(), object.clone().unwrap_or_else(|| "-".into())),
        ],
        LogEntry::Traffic { at_epoch, src_ip, dst_ip, application, rule, action, user, bytes } => {
            vec![
                ("time".into(), format_epoch(*at_epoch)),
                ("source".into(), src_ip.clone()),
                ("destination".into(), dst_ip.clone()),
                ("application".into(), application.clone()),
                ("rule".into(), rule.clone()),
                ("action".into(), action.clone()),
                ("user".into(), user.clone().unwrap_or_else(|| "-".into())),
                ("bytes".into(), format_bytes(*bytes)),
            ]
        }
        LogEntry::Threat { at_epoch, threat_name, category, severity, action, src_ip, dst_ip } => {
            vec![
                ("time".into(), format_epoch(*at_epoch)),
                ("threat".into(), threat_name.clone()),
                ("category".into(), category.clone()),
                ("severity".into(), severity.label().to_string()),
                ("action".into(), action.clone()),
                ("source".into(), src_ip.clone()),
                ("destination".into(), dst_ip.clone()),
            ]
        }
    }
}

fn user_row(u: &RemoteUser) -> Row<'static> {
    Row::new(vec![
        Cell::from(u.username.clone()),
        Cell::from(u.client_ip.clone()),
        Cell::from(u.gateway.clone()),
        Cell::from(u.tunnel_type.clone().unwrap_or_else(|| "-".into())),
        Cell::from(format_epoch(u.login_epoch)),
    ])
}

fn user_fields(u: &RemoteUser) -> Vec<(String, String)> {
    vec![
        ("username".into(), u.username.clone()),
        ("client ip".into(), u.client_ip.clone()),
        ("gateway".into(), u.gateway.clone()),
        ("tunnel".into(), u.tunnel_type.clone().unwrap_or_else(|| "-".into())),
        ("logged in".into(), format_epoch(u.login_epoch)),
    ]
}

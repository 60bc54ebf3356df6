//! Interactive console state and event loop.

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use mealboard_client::{MealboardClient, ModerationDecision, QueuedAlias, QueuedReview};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::events::{AppEvent, FetchPayload, QueueKind};
use crate::notify::Notice;
use crate::table::{QueueRow, QueueTable};
use crate::ui;

pub struct App {
    client: MealboardClient,
    pub active: QueueKind,
    pub reviews: QueueTable<QueuedReview>,
    pub aliases: QueueTable<QueuedAlias>,
    pub notices: Vec<Notice>,
    should_quit: bool,
}

impl App {
    pub fn new(client: MealboardClient) -> Self {
        Self {
            client,
            active: QueueKind::Reviews,
            reviews: QueueTable::default(),
            aliases: QueueTable::default(),
            notices: Vec::new(),
            should_quit: false,
        }
    }

    pub async fn run(mut self, mut notice_rx: UnboundedReceiver<Notice>) -> Result<()> {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let mut terminal = ratatui::init();

        self.refresh(QueueKind::Reviews, &events_tx);
        self.refresh(QueueKind::Aliases, &events_tx);

        let mut input = EventStream::new();
        let result = loop {
            if let Err(err) = terminal.draw(|frame| ui::draw(frame, &self)) {
                break Err(err.into());
            }
            if self.should_quit {
                break Ok(());
            }

            let event = tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => LoopEvent::Key(key),
                    Some(Ok(_)) => LoopEvent::Redraw,
                    Some(Err(err)) => break Err(err.into()),
                    None => break Ok(()),
                },
                Some(notice) = notice_rx.recv() => LoopEvent::Notice(notice),
                Some(event) = events_rx.recv() => LoopEvent::App(event),
            };

            match event {
                LoopEvent::Key(key) => self.handle_key(key, &events_tx),
                LoopEvent::Notice(notice) => self.notices.push(notice),
                LoopEvent::App(event) => self.handle_event(event, &events_tx),
                LoopEvent::Redraw => {}
            }
        };

        ratatui::restore();
        result
    }

    fn handle_key(&mut self, key: KeyEvent, events_tx: &UnboundedSender<AppEvent>) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => self.switch_tab(),
            KeyCode::Down | KeyCode::Char('j') => match self.active {
                QueueKind::Reviews => self.reviews.select_next(),
                QueueKind::Aliases => self.aliases.select_next(),
            },
            KeyCode::Up | KeyCode::Char('k') => match self.active {
                QueueKind::Reviews => self.reviews.select_prev(),
                QueueKind::Aliases => self.aliases.select_prev(),
            },
            KeyCode::Char('a') => self.dispatch(true, events_tx),
            KeyCode::Char('r') => self.dispatch(false, events_tx),
            KeyCode::Char('R') => self.refresh(self.active, events_tx),
            _ => {}
        }
    }

    fn switch_tab(&mut self) {
        self.active = match self.active {
            QueueKind::Reviews => QueueKind::Aliases,
            QueueKind::Aliases => QueueKind::Reviews,
        };
    }

    /// Claim the selected row and put the decision on the wire. A row that
    /// is already in flight or not awaiting review is silently skipped.
    fn dispatch(&mut self, approved: bool, events_tx: &UnboundedSender<AppEvent>) {
        match self.active {
            QueueKind::Reviews => {
                if let Some(row) = self.reviews.begin_dispatch() {
                    self.spawn_review_decision(row, approved, events_tx);
                }
            }
            QueueKind::Aliases => {
                if let Some(row) = self.aliases.begin_dispatch() {
                    self.spawn_alias_decision(row, approved, events_tx);
                }
            }
        }
    }

    fn spawn_review_decision(
        &self,
        row: QueuedReview,
        approved: bool,
        events_tx: &UnboundedSender<AppEvent>,
    ) {
        let Ok(decision) = ModerationDecision::new(Some(row.id), Some(approved)) else {
            return;
        };
        let decision = decision.with_subject(row.subject());
        let client = self.client.clone();
        let tx = events_tx.clone();
        tokio::spawn(async move {
            let ok = client.moderate_review(decision).await.is_ok();
            let _ = tx.send(AppEvent::Settled {
                kind: QueueKind::Reviews,
                id: row.id,
                ok,
            });
        });
    }

    fn spawn_alias_decision(
        &self,
        row: QueuedAlias,
        approved: bool,
        events_tx: &UnboundedSender<AppEvent>,
    ) {
        let Ok(decision) = ModerationDecision::new(Some(row.id), Some(approved)) else {
            return;
        };
        let decision = decision.with_subject(row.subject());
        let client = self.client.clone();
        let tx = events_tx.clone();
        tokio::spawn(async move {
            let ok = client.moderate_alias(decision).await.is_ok();
            let _ = tx.send(AppEvent::Settled {
                kind: QueueKind::Aliases,
                id: row.id,
                ok,
            });
        });
    }

    fn refresh(&self, kind: QueueKind, events_tx: &UnboundedSender<AppEvent>) {
        let client = self.client.clone();
        let tx = events_tx.clone();
        tokio::spawn(async move {
            let payload = match kind {
                QueueKind::Reviews => match client.fetch_review_queue().await {
                    Ok(rows) => FetchPayload::Reviews(rows),
                    Err(_) => FetchPayload::Failed,
                },
                QueueKind::Aliases => match client.fetch_alias_queue().await {
                    Ok(rows) => FetchPayload::Aliases(rows),
                    Err(_) => FetchPayload::Failed,
                },
            };
            let _ = tx.send(AppEvent::Fetched { kind, payload });
        });
    }

    fn handle_event(&mut self, event: AppEvent, events_tx: &UnboundedSender<AppEvent>) {
        match event {
            AppEvent::Settled { kind, id, ok } => {
                match kind {
                    QueueKind::Reviews => self.reviews.settle(id),
                    QueueKind::Aliases => self.aliases.settle(id),
                }
                // The cache key was invalidated, so this goes to the server
                // and the decided row disappears.
                if ok {
                    self.refresh(kind, events_tx);
                }
            }
            AppEvent::Fetched { payload, .. } => match payload {
                FetchPayload::Reviews(rows) => self.reviews.set_rows(rows),
                FetchPayload::Aliases(rows) => self.aliases.set_rows(rows),
                // Keep whatever the moderator last saw; the failure was
                // already surfaced as a notice.
                FetchPayload::Failed => {}
            },
        }
    }
}

/// Normalized loop event so the `select!` arms stay borrow-free.
enum LoopEvent {
    Key(KeyEvent),
    Notice(Notice),
    App(AppEvent),
    Redraw,
}

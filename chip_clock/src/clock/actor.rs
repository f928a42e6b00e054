//! Clock actor: one task owning the session, its ticker and subscribers.

use super::{
    errors::{ClockError, ClockResult},
    messages::{ClockEvent, ClockMessage, ClockResponse, SubscriberId},
    view::ClockView,
};
use crate::{
    app::AppState,
    history::SavedTournament,
    persistence::PersistenceHandle,
    players::PlayerId,
    settings::AppSettings,
    stats::StatsResult,
    tournament::{
        COUNTDOWN_THRESHOLD_SECS, Level, SettingsUpdate, TickOutcome, TournamentError,
    },
};
use chrono::Utc;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::{
    sync::{mpsc, oneshot},
    time::{Duration, Instant, Interval, MissedTickBehavior, interval_at},
};

const INBOX_CAPACITY: usize = 100;
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Clock actor handle for sending messages
#[derive(Clone)]
pub struct ClockHandle {
    sender: mpsc::Sender<ClockMessage>,
    next_subscriber: Arc<AtomicU64>,
}

impl ClockHandle {
    fn new(sender: mpsc::Sender<ClockMessage>) -> Self {
        Self {
            sender,
            next_subscriber: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Send a message to the clock
    pub async fn send(&self, message: ClockMessage) -> ClockResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| ClockError::Closed)
    }

    /// Send a message built around a fresh responder and wait for the reply
    pub async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ClockMessage,
    ) -> ClockResult<T> {
        let (response, reply) = oneshot::channel();
        self.send(build(response)).await?;
        reply.await.map_err(|_| ClockError::Closed)
    }

    pub async fn start(&self) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::Start { response }).await
    }

    pub async fn pause(&self) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::Pause { response }).await
    }

    pub async fn resume(&self) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::Resume { response }).await
    }

    pub async fn reset(&self) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::Reset { response }).await
    }

    pub async fn next_level(&self) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::NextLevel { response })
            .await
    }

    pub async fn previous_level(&self) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::PreviousLevel { response })
            .await
    }

    pub async fn update_settings(&self, update: SettingsUpdate) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::UpdateSettings { update, response })
            .await
    }

    pub async fn update_blinds_structure(&self, levels: Vec<Level>) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::UpdateBlindsStructure { levels, response })
            .await
    }

    /// Append a level escalated from the last one, returning its id
    pub async fn add_level(&self) -> ClockResult<u32> {
        self.request(|response| ClockMessage::AddLevel { response })
            .await
    }

    pub async fn update_level(&self, level: Level) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::UpdateLevel { level, response })
            .await
    }

    pub async fn add_player(&self, name: String, entries: u32) -> ClockResult<PlayerId> {
        self.request(|response| ClockMessage::AddPlayer {
            name,
            entries,
            response,
        })
        .await
    }

    pub async fn rebuy(&self, player_id: PlayerId) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::Rebuy {
            player_id,
            response,
        })
        .await
    }

    pub async fn eliminate(&self, player_id: PlayerId) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::Eliminate {
            player_id,
            response,
        })
        .await
    }

    pub async fn update_player_chips(
        &self,
        player_id: PlayerId,
        chips: u64,
    ) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::UpdatePlayerChips {
            player_id,
            chips,
            response,
        })
        .await
    }

    pub async fn remove_player(&self, player_id: PlayerId) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::RemovePlayer {
            player_id,
            response,
        })
        .await
    }

    pub async fn set_final_chips(
        &self,
        player_id: PlayerId,
        chips: u64,
    ) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::SetFinalChips {
            player_id,
            chips,
            response,
        })
        .await
    }

    pub async fn save_tournament(&self) -> ClockResult<StatsResult<SavedTournament>> {
        self.request(|response| ClockMessage::SaveTournament { response })
            .await
    }

    pub async fn delete_tournament(&self, id: String) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::DeleteTournament { id, response })
            .await
    }

    pub async fn import_history(
        &self,
        records: Vec<SavedTournament>,
        replace: bool,
    ) -> ClockResult<usize> {
        self.request(|response| ClockMessage::ImportHistory {
            records,
            replace,
            response,
        })
        .await
    }

    pub async fn toggle_sound(&self) -> ClockResult<bool> {
        self.request(|response| ClockMessage::ToggleSound { response })
            .await
    }

    pub async fn update_app_settings(&self, settings: AppSettings) -> ClockResult<ClockResponse> {
        self.request(|response| ClockMessage::UpdateAppSettings { settings, response })
            .await
    }

    pub async fn view(&self) -> ClockResult<ClockView> {
        self.request(|response| ClockMessage::GetView { response })
            .await
    }

    pub async fn state(&self) -> ClockResult<AppState> {
        self.request(|response| ClockMessage::GetState { response })
            .await
    }

    /// Subscribe to clock events through a channel of `buffer` slots
    pub async fn subscribe(
        &self,
        buffer: usize,
    ) -> ClockResult<(SubscriberId, mpsc::Receiver<ClockEvent>)> {
        let subscriber_id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(buffer);
        self.send(ClockMessage::Subscribe {
            subscriber_id,
            sender,
        })
        .await?;
        Ok((subscriber_id, receiver))
    }

    pub async fn unsubscribe(&self, subscriber_id: SubscriberId) -> ClockResult<()> {
        self.send(ClockMessage::Unsubscribe { subscriber_id }).await
    }

    /// Stop the actor and wait for it to acknowledge
    pub async fn shutdown(&self) -> ClockResult<()> {
        self.request(|response| ClockMessage::Shutdown { response })
            .await
    }
}

/// Wait for the next tick, or forever when the clock is not ticking
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Clock actor owning the live session
pub struct ClockActor {
    /// Session state
    app: AppState,

    /// Message inbox
    inbox: mpsc::Receiver<ClockMessage>,

    /// Snapshots go here after every change
    persistence: Option<PersistenceHandle>,

    /// Event subscribers
    subscribers: HashMap<SubscriberId, mpsc::Sender<ClockEvent>>,

    /// One-second ticker, present only while the clock runs
    ticker: Option<Interval>,

    is_closed: bool,
}

impl ClockActor {
    /// Create a new clock actor
    ///
    /// # Arguments
    ///
    /// * `app` - Session to own, usually restored from storage
    /// * `persistence` - Writer for snapshots; `None` keeps state in memory
    ///
    /// # Returns
    ///
    /// * `(ClockActor, ClockHandle)` - Actor and handle for sending messages
    pub fn new(app: AppState, persistence: Option<PersistenceHandle>) -> (Self, ClockHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);

        let actor = Self {
            app,
            inbox,
            persistence,
            subscribers: HashMap::new(),
            ticker: None,
            is_closed: false,
        };

        (actor, ClockHandle::new(sender))
    }

    /// Run the clock actor event loop
    pub async fn run(mut self) {
        log::info!(
            "Clock for '{}' starting at level {} ({})",
            self.app.tournament.settings().name,
            self.app.tournament.state().current_level,
            self.app.tournament.phase()
        );

        // a session restored mid-level resumes ticking
        self.sync_ticker();

        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(message) => {
                        self.handle_message(message);
                        if self.is_closed {
                            break;
                        }
                    }
                    None => break,
                },

                _ = next_tick(&mut self.ticker) => {
                    self.tick();
                }
            }
        }

        log::info!("Clock stopped");
    }

    /// Create or drop the ticker to match the Running phase
    fn sync_ticker(&mut self) {
        let ticking = self.app.tournament.state().is_ticking();
        match (ticking, self.ticker.is_some()) {
            (true, false) => {
                let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(ticker);
                log::debug!("Ticker started");
            }
            (false, true) => {
                self.ticker = None;
                log::debug!("Ticker stopped");
            }
            _ => {}
        }
    }

    fn tick(&mut self) {
        let level = self.app.tournament.state().current_level;
        let sound = self.app.settings.sound_enabled;

        match self.app.tournament.tick() {
            TickOutcome::Idle => {
                self.sync_ticker();
                return;
            }
            TickOutcome::LevelAdvanced { level: next } => {
                let blinds = self.app.tournament.current_level().map(|l| l.blinds);
                log::info!("Level {} expired, now playing level {}", level, next);
                self.notify(ClockEvent::LevelAdvanced {
                    level: next,
                    blinds,
                    sound,
                });
            }
            TickOutcome::Countdown { level } => {
                self.notify(ClockEvent::Countdown {
                    level,
                    seconds: COUNTDOWN_THRESHOLD_SECS,
                    sound,
                });
            }
            TickOutcome::FinalLevelExpired { level } => {
                self.notify(ClockEvent::FinalLevelExpired { level, sound });
            }
            TickOutcome::Ticked | TickOutcome::Frozen => {}
        }

        self.notify(ClockEvent::StateChanged);
        self.persist();
    }

    /// Handle a clock message
    fn handle_message(&mut self, message: ClockMessage) {
        match message {
            ClockMessage::Start { response } => {
                let result = match self.app.tournament.start() {
                    Ok(()) => {
                        log::info!("Tournament '{}' started", self.app.tournament.settings().name);
                        ClockResponse::Success
                    }
                    Err(e) => ClockResponse::Error(e.to_string()),
                };
                self.respond(response, result);
            }

            ClockMessage::Pause { response } => {
                let result = ClockResponse::from_changed(self.app.tournament.pause());
                self.respond(response, result);
            }

            ClockMessage::Resume { response } => {
                let result = ClockResponse::from_changed(self.app.tournament.resume());
                self.respond(response, result);
            }

            ClockMessage::Reset { response } => {
                self.app.reset();
                log::info!("Tournament reset");
                self.respond(response, ClockResponse::Success);
            }

            ClockMessage::NextLevel { response } => {
                let result = ClockResponse::from_changed(self.app.tournament.next_level());
                self.respond(response, result);
            }

            ClockMessage::PreviousLevel { response } => {
                let result = ClockResponse::from_changed(self.app.tournament.previous_level());
                self.respond(response, result);
            }

            ClockMessage::UpdateSettings { update, response } => {
                let result = match self.app.tournament.update_settings(update) {
                    Ok(()) => ClockResponse::Success,
                    Err(e) => ClockResponse::Error(e.to_string()),
                };
                self.respond(response, result);
            }

            ClockMessage::UpdateBlindsStructure { levels, response } => {
                let result = match self.app.tournament.update_blinds_structure(levels) {
                    Ok(()) => ClockResponse::Success,
                    Err(e) => ClockResponse::Error(e.to_string()),
                };
                self.respond(response, result);
            }

            ClockMessage::AddLevel { response } => {
                let id = self.app.tournament.add_level();
                log::info!("Added level {}", id);
                self.changed();
                let _ = response.send(id);
            }

            ClockMessage::UpdateLevel { level, response } => {
                let result = match self.app.tournament.update_level(level) {
                    Ok(()) => ClockResponse::Success,
                    Err(TournamentError::LevelNotFound(id)) => {
                        ClockResponse::NotFound(format!("level {}", id))
                    }
                    Err(e) => ClockResponse::Error(e.to_string()),
                };
                self.respond(response, result);
            }

            ClockMessage::AddPlayer {
                name,
                entries,
                response,
            } => {
                let id = self.app.add_player(name, entries);
                self.changed();
                let _ = response.send(id);
            }

            ClockMessage::Rebuy {
                player_id,
                response,
            } => {
                let found = self.app.rebuy(&player_id);
                self.respond(response, found_or(found, player_id));
            }

            ClockMessage::Eliminate {
                player_id,
                response,
            } => {
                let found = self.app.eliminate(&player_id);
                self.respond(response, found_or(found, player_id));
            }

            ClockMessage::UpdatePlayerChips {
                player_id,
                chips,
                response,
            } => {
                let found = self.app.players.update_player_chips(&player_id, chips);
                self.respond(response, found_or(found, player_id));
            }

            ClockMessage::RemovePlayer {
                player_id,
                response,
            } => {
                let found = self.app.remove_player(&player_id);
                self.respond(response, found_or(found, player_id));
            }

            ClockMessage::SetFinalChips {
                player_id,
                chips,
                response,
            } => {
                let found = self.app.set_final_chips(&player_id, chips);
                self.respond(response, found_or(found, player_id));
            }

            ClockMessage::SaveTournament { response } => {
                let result = self.app.save_tournament(Utc::now());
                if result.is_ok() {
                    self.changed();
                }
                let _ = response.send(result);
            }

            ClockMessage::DeleteTournament { id, response } => {
                let found = self.app.history.delete_tournament(&id);
                self.respond(response, found_or(found, id));
            }

            ClockMessage::ImportHistory {
                records,
                replace,
                response,
            } => {
                let added = if replace {
                    let count = records.len();
                    self.app.history.replace_history(records);
                    count
                } else {
                    self.app.history.import_history(records)
                };
                log::info!("Imported {} saved tournaments", added);
                self.changed();
                let _ = response.send(added);
            }

            ClockMessage::ToggleSound { response } => {
                let enabled = self.app.settings.toggle_sound();
                self.changed();
                let _ = response.send(enabled);
            }

            ClockMessage::UpdateAppSettings { settings, response } => {
                self.app.settings = settings;
                self.respond(response, ClockResponse::Success);
            }

            ClockMessage::GetView { response } => {
                let _ = response.send(ClockView::from_tournament(&self.app.tournament));
            }

            ClockMessage::GetState { response } => {
                let _ = response.send(self.app.clone());
            }

            ClockMessage::Subscribe {
                subscriber_id,
                sender,
            } => {
                self.subscribers.insert(subscriber_id, sender);
                log::debug!("Subscriber {} added", subscriber_id);
            }

            ClockMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!("Subscriber {} removed", subscriber_id);
            }

            ClockMessage::Shutdown { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    /// Publish the change if the request changed anything, then reply
    fn respond(&mut self, response: oneshot::Sender<ClockResponse>, result: ClockResponse) {
        if result.is_success() {
            self.changed();
        }
        let _ = response.send(result);
    }

    fn changed(&mut self) {
        self.sync_ticker();
        self.notify(ClockEvent::StateChanged);
        self.persist();
    }

    fn persist(&mut self) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let alive = persistence.persist(self.app.persisted());
        if !alive {
            log::error!("Persistence writer stopped, state will no longer be saved");
            self.persistence = None;
        }
    }

    /// Broadcast an event to all subscribers
    fn notify(&mut self, event: ClockEvent) {
        self.subscribers
            .retain(|subscriber_id, sender| match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Subscriber {} channel full, dropping event", subscriber_id);
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", subscriber_id);
                    false
                }
            });
    }
}

fn found_or(found: bool, id: String) -> ClockResponse {
    if found {
        ClockResponse::Success
    } else {
        ClockResponse::NotFound(id)
    }
}

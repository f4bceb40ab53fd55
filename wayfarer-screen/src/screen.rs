//! The journey screen: sole owner of the sequencer state, its side-tables
//! and the announcement coordinator.
//!
//! Everything that changes the current leg arrives as a [`ScreenMsg`] and is
//! applied in mailbox order, so a transition and its announcement finish
//! before the next trigger is looked at. Observers read [`ScreenSnapshot`]s
//! from a watch channel.

use crate::actor::{self, Actor, ActorHandle, Addr, Context};
use anyhow::{Result, anyhow};
use std::sync::Arc;
use tokio::{
    sync::{broadcast, oneshot, watch},
    task::JoinHandle,
};
use tracing::{Span, debug, info, info_span};
use uuid::Uuid;
use wayfarer_journey::{
    JourneyState, LegView, MapFrame, ParsedRoute, PlannedJourney, TransitStops, TransitTables,
    Transition, derive_leg_view, map_frame,
};
use wayfarer_speech::{AnnouncementCoordinator, AnnouncementOutcome, Announcer, VoiceSettings};

/// A route and its side-tables, replacing whatever the screen showed before.
#[derive(Debug, Clone, Default)]
pub struct JourneyLoad {
    pub route: ParsedRoute,
    pub tables: TransitTables,
}

impl JourneyLoad {
    pub fn new(route: ParsedRoute, tables: TransitTables) -> Self {
        Self { route, tables }
    }

    /// Combine a decoded plan with a stop catalog.
    pub fn from_plan(plan: PlannedJourney, stops: TransitStops) -> Self {
        Self {
            route: plan.route,
            tables: TransitTables {
                details: plan.transit_details,
                stops,
            },
        }
    }
}

pub enum ScreenMsg {
    /// Full reset onto a new journey.
    Load(JourneyLoad),
    /// Advance if `seen` is still the committed cursor; otherwise the
    /// trigger is stale and dropped.
    NextStep { seen: Option<usize> },
    /// Re-announce the current leg.
    Repeat,
    Snapshot { reply: oneshot::Sender<ScreenSnapshot> },
    /// Silence speech and stop the screen.
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    NoRoute,
    Active { index: usize, total: usize },
    Complete { legs: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    JourneyCompleted,
    /// The last announcement could not be spoken; repeat may help.
    AnnouncementUnavailable,
}

/// What the screen is showing right now.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSnapshot {
    pub journey_id: Option<Uuid>,
    pub phase: ScreenPhase,
    pub view: Option<LegView>,
    pub map: Option<MapFrame>,
    /// Text of the latest announcement for the current leg.
    pub announcement: Option<String>,
    pub notice: Option<Notice>,
    pub repeat_available: bool,
    pub advance_enabled: bool,
}

impl ScreenSnapshot {
    fn no_route() -> Self {
        Self {
            journey_id: None,
            phase: ScreenPhase::NoRoute,
            view: None,
            map: None,
            announcement: None,
            notice: None,
            repeat_available: false,
            advance_enabled: false,
        }
    }

    /// The committed leg index, to be echoed back in [`ScreenMsg::NextStep`].
    pub fn cursor(&self) -> Option<usize> {
        match self.phase {
            ScreenPhase::Active { index, .. } => Some(index),
            ScreenPhase::NoRoute | ScreenPhase::Complete { .. } => None,
        }
    }
}

pub struct JourneyScreen {
    journey: JourneyState,
    tables: TransitTables,
    journey_id: Option<Uuid>,
    coordinator: AnnouncementCoordinator,
    last_announcement: Option<AnnouncementOutcome>,
    updates: watch::Sender<ScreenSnapshot>,
    /// Carries the loaded journey's id on everything logged while handling.
    span: Span,
}

impl JourneyScreen {
    fn cursor(&self) -> Option<usize> {
        self.journey.active().map(|s| s.current_index())
    }

    fn snapshot(&self) -> ScreenSnapshot {
        let mut snap = ScreenSnapshot::no_route();
        snap.journey_id = self.journey_id;
        snap.repeat_available = self.coordinator.repeat_available();

        match &self.journey {
            JourneyState::Empty => {}
            JourneyState::Complete(done) => {
                snap.phase = ScreenPhase::Complete { legs: done.legs };
                snap.notice = Some(Notice::JourneyCompleted);
            }
            JourneyState::Active(state) => {
                snap.phase = ScreenPhase::Active {
                    index: state.current_index(),
                    total: state.len(),
                };
                snap.view = Some(derive_leg_view(state, &self.tables));
                snap.map = Some(map_frame(state, &self.tables));
                snap.announcement = self.last_announcement.as_ref().map(|o| o.text().to_string());
                if self.last_announcement.as_ref().is_some_and(|o| o.is_silenced()) {
                    snap.notice = Some(Notice::AnnouncementUnavailable);
                }
                snap.advance_enabled = true;
            }
        }
        snap
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    fn announce_current(&mut self) {
        self.last_announcement = match &self.journey {
            JourneyState::Active(state) => Some(self.coordinator.announce(state, &self.tables)),
            JourneyState::Empty | JourneyState::Complete(_) => None,
        };
    }

    fn load(&mut self, load: JourneyLoad) {
        self.coordinator.silence();
        self.last_announcement = None;

        let id = Uuid::new_v4();
        self.journey_id = Some(id);
        self.tables = load.tables;
        self.journey = JourneyState::initialize(load.route);
        self.span = info_span!(target: "wayfarer::screen", "journey", journey_id = %id);
        let legs = self.journey.active().map_or(0, |s| s.len());
        self.span
            .in_scope(|| info!(target: "wayfarer::screen", legs, "journey loaded"));
        self.announce_current();
    }

    /// Returns whether the screen changed.
    fn next_step(&mut self, seen: Option<usize>) -> bool {
        let committed = self.cursor();
        if seen != committed {
            debug!(
                target: "wayfarer::screen",
                ?seen,
                ?committed,
                "stale next-step trigger ignored"
            );
            return false;
        }

        let journey = std::mem::replace(&mut self.journey, JourneyState::Empty);
        let (journey, transition) = journey.advance();
        self.journey = journey;

        match transition {
            Transition::Moved { from, to } => {
                info!(target: "wayfarer::screen", from, to, "moved to next leg");
                self.announce_current();
                true
            }
            Transition::Completed { legs } => {
                info!(target: "wayfarer::screen", legs, "journey completed");
                self.coordinator.silence();
                self.last_announcement = None;
                true
            }
            Transition::AlreadyComplete | Transition::NoRoute => false,
        }
    }

    fn apply(&mut self, msg: ScreenMsg, ctx: &mut Context) {
        let changed = match msg {
            ScreenMsg::Load(load) => {
                self.load(load);
                true
            }
            ScreenMsg::NextStep { seen } => self.next_step(seen),
            ScreenMsg::Repeat => {
                let active = self.journey.active().is_some();
                if active {
                    debug!(target: "wayfarer::screen", "repeat requested");
                    self.announce_current();
                }
                active
            }
            ScreenMsg::Snapshot { reply } => {
                // The requester may have gone away; nothing to do then.
                let _ = reply.send(self.snapshot());
                false
            }
            ScreenMsg::Teardown => {
                info!(target: "wayfarer::screen", "journey screen torn down");
                self.coordinator.silence();
                ctx.stop();
                false
            }
        };
        if changed {
            self.publish();
        }
    }
}

#[async_trait::async_trait]
impl Actor for JourneyScreen {
    type Msg = ScreenMsg;

    async fn handle(&mut self, msg: ScreenMsg, ctx: &mut Context) -> Result<()> {
        let span = self.span.clone();
        span.in_scope(|| self.apply(msg, ctx));
        Ok(())
    }

    fn stopped(&mut self) {
        self.coordinator.silence();
    }
}

impl Addr<JourneyScreen> {
    /// Ask the screen for its current snapshot.
    pub async fn snapshot(&self) -> Result<ScreenSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(ScreenMsg::Snapshot { reply })
            .await
            .map_err(|_| anyhow!("journey screen has stopped"))?;
        rx.await.map_err(|_| anyhow!("journey screen dropped the snapshot request"))
    }

    pub async fn next_step(&self, seen: Option<usize>) -> Result<()> {
        self.send(ScreenMsg::NextStep { seen })
            .await
            .map_err(|_| anyhow!("journey screen has stopped"))
    }
}

pub struct ScreenHandle {
    pub addr: Addr<JourneyScreen>,
    pub updates: watch::Receiver<ScreenSnapshot>,
    pub task: JoinHandle<Result<()>>,
}

/// Start a journey screen with nothing loaded.
pub fn spawn_journey_screen(
    announcer: Arc<dyn Announcer>,
    voice: VoiceSettings,
    capacity: usize,
    shutdown: broadcast::Receiver<()>,
) -> ScreenHandle {
    let (updates_tx, updates) = watch::channel(ScreenSnapshot::no_route());
    let screen = JourneyScreen {
        journey: JourneyState::Empty,
        tables: TransitTables::default(),
        journey_id: None,
        coordinator: AnnouncementCoordinator::new(announcer, voice),
        last_announcement: None,
        updates: updates_tx,
        span: Span::none(),
    };
    let ActorHandle { addr, task } = actor::spawn_actor(screen, capacity, Some(shutdown));
    ScreenHandle {
        addr,
        updates,
        task,
    }
}

//! The live draft room: one actor per league, the single authority that
//! commits picks.
//!
//! Every commit attempt (a human `SubmitPick` or an internal `TimerFired`)
//! is handled with `AtomicResponse`, so the mailbox pauses until the
//! read-validate-write sequence finishes. Two attempts racing for the same
//! turn therefore serialize, and the store's null-guard catches anything
//! that slipped past validation. Broadcasts go out from this actor only,
//! which gives every connection the same event order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::draft::DraftConfig;
use crate::domain;
use crate::draft::registry::RoomRegistry;
use crate::draft::timer::{PickTimer, Tick};
use crate::errors::DraftError;
use crate::store::{CommitOutcome, DraftStore, NotificationSink, OpenTurn, PickCommit};
use crate::ws::protocol::ServerMsg;

/// Room-to-session push; the session serializes and writes the frame.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Outbound(pub ServerMsg);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub conn_id: Uuid,
    pub recipient: Recipient<Outbound>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub conn_id: Uuid,
}

#[derive(Message)]
#[rtype(result = "Result<(), DraftError>")]
pub struct SubmitPick {
    pub user_id: i64,
    pub movie_id: i64,
}

/// Internal: the countdown armed under `epoch` reached zero.
#[derive(Message)]
#[rtype(result = "()")]
struct TimerFired {
    epoch: u64,
}

/// Everything the commit critical section produced, handed back to the
/// actor for broadcasting.
struct Committed {
    turn: OpenTurn,
    movie_id: i64,
    outcome: CommitOutcome,
    owner_id: i64,
}

pub struct DraftRoom {
    league_id: i64,
    store: Arc<dyn DraftStore>,
    notifier: Arc<dyn NotificationSink>,
    config: DraftConfig,
    registry: Arc<RoomRegistry>,
    connections: HashMap<Uuid, Recipient<Outbound>>,
    timer: PickTimer,
    completed: bool,
}

impl DraftRoom {
    pub fn new(
        league_id: i64,
        store: Arc<dyn DraftStore>,
        notifier: Arc<dyn NotificationSink>,
        config: DraftConfig,
        registry: Arc<RoomRegistry>,
    ) -> Self {
        Self {
            league_id,
            store,
            notifier,
            config,
            registry,
            connections: HashMap::new(),
            timer: PickTimer::new(),
            completed: false,
        }
    }

    fn broadcast(&self, msg: ServerMsg) {
        for recipient in self.connections.values() {
            recipient.do_send(Outbound(msg.clone()));
        }
    }

    fn state_msg(turn: &OpenTurn) -> ServerMsg {
        ServerMsg::State {
            current_team: turn.team_id,
            current_pick: turn.pick_number,
            round: turn.round,
        }
    }

    fn start_pick_timer(&mut self, ctx: &mut Context<Self>) {
        let (epoch, stale) = self.timer.arm(self.config.pick_seconds);
        if let Some(handle) = stale {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_interval(Duration::from_secs(1), move |actor, ctx| {
            match actor.timer.tick(epoch) {
                Tick::Broadcast(seconds) => actor.broadcast(ServerMsg::Timer { seconds }),
                Tick::Quiet(_) => {}
                Tick::Expired => {
                    if let Some(handle) = actor.timer.take_expired_handle() {
                        ctx.cancel_future(handle);
                    }
                    ctx.notify(TimerFired { epoch });
                }
                Tick::Stale => {}
            }
        });
        self.timer.set_handle(handle);
    }

    fn stop_pick_timer(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.timer.disarm() {
            ctx.cancel_future(handle);
        }
    }

    /// Post-commit fan-out shared by the human and auto paths.
    fn finish_commit(&mut self, ctx: &mut Context<Self>, committed: Committed, auto: bool) {
        self.stop_pick_timer(ctx);

        info!(
            league_id = self.league_id,
            team_id = committed.turn.team_id,
            movie_id = committed.movie_id,
            pick_number = committed.turn.pick_number,
            auto,
            remaining = committed.outcome.remaining,
            "pick committed"
        );

        self.broadcast(ServerMsg::Pick {
            team_id: committed.turn.team_id,
            movie_id: committed.movie_id,
            movie_title: committed.outcome.movie_title.clone(),
            auto,
            remaining: committed.outcome.remaining,
        });

        if auto {
            let notifier = self.notifier.clone();
            let league_id = self.league_id;
            let owner_id = committed.owner_id;
            let body = format!(
                "Timer expired — {} was auto-picked for your team",
                committed.outcome.movie_title
            );
            ctx.spawn(
                async move {
                    if let Err(err) = notifier
                        .notify(owner_id, "draft_pick", "Auto-Pick", &body, league_id)
                        .await
                    {
                        warn!(league_id, owner_id, error = %err, "auto-pick notification failed");
                    }
                }
                .into_actor(self)
                .map(|_, _, _| ()),
            );
        }

        if committed.outcome.remaining > 0 {
            self.send_state_and_rearm(ctx);
        } else {
            self.completed = true;
            self.broadcast(ServerMsg::DraftComplete);
            self.maybe_retire(ctx);
        }
    }

    /// Broadcast the next open turn and arm a fresh timer for it.
    fn send_state_and_rearm(&mut self, ctx: &mut Context<Self>) {
        let store = self.store.clone();
        let league_id = self.league_id;
        ctx.spawn(
            async move { store.next_open_turn(league_id).await }
                .into_actor(self)
                .map(move |res, actor, ctx| match res {
                    Ok(Some(turn)) => {
                        actor.broadcast(Self::state_msg(&turn));
                        actor.start_pick_timer(ctx);
                    }
                    Ok(None) => {
                        // A racing commit finished the draft; it owns the
                        // draft_complete broadcast.
                    }
                    Err(err) => {
                        warn!(league_id, error = %err, "failed to load next turn");
                        // Arm the timer anyway so the draft cannot stall.
                        actor.start_pick_timer(ctx);
                    }
                }),
        );
    }

    fn maybe_retire(&mut self, ctx: &mut Context<Self>) {
        if self.completed && self.connections.is_empty() {
            info!(league_id = self.league_id, "draft complete and room empty, retiring");
            self.registry.remove(self.league_id);
            self.stop_pick_timer(ctx);
            ctx.stop();
        }
    }
}

impl Actor for DraftRoom {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(league_id = self.league_id, "draft room started");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(league_id = self.league_id, "draft room stopped");
    }
}

impl Handler<Join> for DraftRoom {
    type Result = ();

    fn handle(&mut self, msg: Join, ctx: &mut Self::Context) -> Self::Result {
        let recipient = msg.recipient.clone();
        self.connections.insert(msg.conn_id, msg.recipient);
        info!(
            league_id = self.league_id,
            conn_id = %msg.conn_id,
            connections = self.connections.len(),
            "connection joined draft room"
        );

        // Send the current open turn to the joining connection only, and
        // make sure a timer is guarding that turn.
        let store = self.store.clone();
        let league_id = self.league_id;
        ctx.spawn(
            async move { store.next_open_turn(league_id).await }
                .into_actor(self)
                .map(move |res, actor, ctx| match res {
                    Ok(Some(turn)) => {
                        recipient.do_send(Outbound(Self::state_msg(&turn)));
                        // Only an idle timer gets armed here. An expiry in
                        // flight must not be superseded by a fresh countdown.
                        if !actor.completed && actor.timer.is_idle() {
                            actor.start_pick_timer(ctx);
                        }
                    }
                    Ok(None) => {
                        actor.completed = true;
                        recipient.do_send(Outbound(ServerMsg::DraftComplete));
                    }
                    Err(err) => {
                        warn!(league_id, error = %err, "failed to load state for joiner");
                        recipient.do_send(Outbound(ServerMsg::Error {
                            message: "draft state unavailable".to_string(),
                        }));
                    }
                }),
        );
    }
}

impl Handler<Leave> for DraftRoom {
    type Result = ();

    fn handle(&mut self, msg: Leave, ctx: &mut Self::Context) -> Self::Result {
        self.connections.remove(&msg.conn_id);
        info!(
            league_id = self.league_id,
            conn_id = %msg.conn_id,
            connections = self.connections.len(),
            "connection left draft room"
        );
        self.maybe_retire(ctx);
    }
}

impl Handler<SubmitPick> for DraftRoom {
    type Result = AtomicResponse<Self, Result<(), DraftError>>;

    fn handle(&mut self, msg: SubmitPick, _ctx: &mut Self::Context) -> Self::Result {
        let store = self.store.clone();
        let league_id = self.league_id;
        let SubmitPick { user_id, movie_id } = msg;

        AtomicResponse::new(Box::pin(
            async move {
                let turn = store
                    .next_open_turn(league_id)
                    .await?
                    .ok_or(DraftError::NoOpenTurn)?;
                let owner_id = store.team_owner(turn.team_id).await?;
                if owner_id != user_id {
                    return Err(DraftError::NotYourTurn);
                }
                if store.is_movie_taken(league_id, movie_id).await? {
                    return Err(DraftError::MovieAlreadyDrafted);
                }
                let outcome = store
                    .commit_pick(PickCommit {
                        league_id,
                        pick_id: turn.pick_id,
                        team_id: turn.team_id,
                        movie_id,
                    })
                    .await?;
                Ok(Committed {
                    turn,
                    movie_id,
                    outcome,
                    owner_id,
                })
            }
            .into_actor(self)
            .map(|res, actor, ctx| match res {
                Ok(committed) => {
                    actor.finish_commit(ctx, committed, false);
                    Ok(())
                }
                Err(err) => Err(err),
            }),
        ))
    }
}

impl Handler<TimerFired> for DraftRoom {
    type Result = AtomicResponse<Self, ()>;

    fn handle(&mut self, msg: TimerFired, _ctx: &mut Self::Context) -> Self::Result {
        // A human pick that won the race disarmed the timer and bumped the
        // epoch; this expiry is then a no-op.
        if self.completed || !self.timer.matches(msg.epoch) {
            return AtomicResponse::new(Box::pin(actix::fut::ready(())));
        }

        let store = self.store.clone();
        let league_id = self.league_id;

        AtomicResponse::new(Box::pin(
            async move {
                let turn = store
                    .next_open_turn(league_id)
                    .await?
                    .ok_or(DraftError::NoOpenTurn)?;
                let owner_id = store.team_owner(turn.team_id).await?;
                let catalog = store.rankable_catalog(league_id).await?;
                let movie = domain::best_available(&catalog)
                    .ok_or(DraftError::EmptyCatalog)?
                    .clone();
                let outcome = store
                    .commit_pick(PickCommit {
                        league_id,
                        pick_id: turn.pick_id,
                        team_id: turn.team_id,
                        movie_id: movie.id,
                    })
                    .await?;
                Ok(Committed {
                    turn,
                    movie_id: movie.id,
                    outcome,
                    owner_id,
                })
            }
            .into_actor(self)
            .map(|res, actor, ctx| match res {
                Ok(committed) => actor.finish_commit(ctx, committed, true),
                Err(DraftError::NoOpenTurn) => {
                    // Raced with the commit that finished the draft.
                }
                Err(DraftError::EmptyCatalog) => {
                    error!(
                        league_id = actor.league_id,
                        "auto-pick found no rankable movie; league catalog is misconfigured"
                    );
                    actor.start_pick_timer(ctx);
                }
                Err(err) => {
                    // Leave the turn open and rearm; the next expiry retries
                    // rather than stalling the draft with no timer running.
                    warn!(league_id = actor.league_id, error = %err, "auto-pick failed, rearming timer");
                    actor.start_pick_timer(ctx);
                }
            }),
        ))
    }
}

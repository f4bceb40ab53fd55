use anyhow::Result;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};

/// Single-owner task driven by a bounded mailbox.
#[async_trait::async_trait]
pub trait Actor: Send + Sized + 'static {
    type Msg: Send + 'static;

    /// Handle a single message. Return `Err` to stop the actor.
    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context) -> Result<()>;

    /// Runs once when the loop exits, whatever the reason.
    fn stopped(&mut self) {}
}

/// Per-message control handed to [`Actor::handle`].
#[derive(Debug, Default)]
pub struct Context {
    stop: bool,
}

impl Context {
    /// Stop after the current message.
    pub fn stop(&mut self) {
        self.stop = true;
    }
}

/// Address for sending messages to an actor.
pub struct Addr<A: Actor>(mpsc::Sender<A::Msg>);

impl<A: Actor> Clone for Addr<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: Actor> Addr<A> {
    /// Async send; awaits backpressure. Returns the message if the actor is gone.
    pub async fn send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.send(msg).await.map_err(|e| e.0)
    }

    /// Send without waiting. Returns the message if the mailbox is full or closed.
    pub fn try_send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.try_send(msg).map_err(|e| e.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.0.max_capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

/// Handle to a running actor task.
pub struct ActorHandle<A: Actor> {
    pub addr: Addr<A>,
    pub task: JoinHandle<Result<()>>,
}

/// Spawn an actor with a bounded mailbox.
///
/// Stop conditions:
/// - `handle` returns `Err`
/// - all senders are dropped
/// - `ctx.stop()` is called
/// - the shutdown channel fires or closes
pub fn spawn_actor<A: Actor>(
    mut actor: A,
    capacity: usize,
    shutdown: Option<broadcast::Receiver<()>>,
) -> ActorHandle<A> {
    let (tx, mut rx) = mpsc::channel::<A::Msg>(capacity.max(1));
    let addr = Addr(tx);

    let task = tokio::spawn(async move {
        let mut ctx = Context::default();
        let result = run(&mut actor, &mut rx, &mut ctx, shutdown).await;
        actor.stopped();
        result
    });

    ActorHandle { addr, task }
}

async fn run<A: Actor>(
    actor: &mut A,
    rx: &mut mpsc::Receiver<A::Msg>,
    ctx: &mut Context,
    shutdown: Option<broadcast::Receiver<()>>,
) -> Result<()> {
    let Some(mut shutdown_rx) = shutdown else {
        while let Some(msg) = rx.recv().await {
            if !dispatch(actor, msg, ctx).await? {
                break;
            }
        }
        return Ok(());
    };

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                tracing::debug!(target: "wayfarer::actor", "shutdown signalled");
                break;
            }
            maybe_msg = rx.recv() => {
                match maybe_msg {
                    Some(msg) => {
                        if !dispatch(actor, msg, ctx).await? {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }
    Ok(())
}

/// Returns whether the loop should keep going.
async fn dispatch<A: Actor>(actor: &mut A, msg: A::Msg, ctx: &mut Context) -> Result<bool> {
    if let Err(e) = actor.handle(msg, ctx).await {
        tracing::error!(target: "wayfarer::actor", error = ?e, "actor returned error; stopping");
        return Err(e);
    }
    Ok(!ctx.stop)
}

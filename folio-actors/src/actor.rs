use anyhow::Result;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};

/// A unit of state that is only touched from its own mailbox loop.
///
/// `Self: Sized` keeps `Context<Self>` usable without object-safety gymnastics.
#[async_trait::async_trait]
pub trait Actor: Send + Sized + 'static {
    type Msg: Send + 'static;

    /// Runs once before the first message. Useful for arming timers that
    /// need the actor's own address.
    async fn started(&mut self, _ctx: &mut Context<Self>) -> Result<()> {
        Ok(())
    }

    /// Handle a single message. Returning `Err` stops the actor.
    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()>;
}

/// Runtime context handed to every `handle` call.
pub struct Context<A: Actor> {
    // Weak so the actor's own context does not keep its mailbox open.
    addr: mpsc::WeakSender<A::Msg>,
    stop: bool,
}

impl<A: Actor> Context<A> {
    /// The actor's own address, for self-messages and spawned helpers.
    /// `None` once every external `Addr` has been dropped.
    pub fn addr(&self) -> Option<Addr<A>> {
        self.addr.upgrade().map(Addr)
    }

    /// Stop after the current message has been handled.
    ///
    /// ```
    /// # use anyhow::Result;
    /// # use async_trait::async_trait;
    /// # use folio_actors::actor::{self, Actor, Context};
    /// struct Prompt(Vec<String>);
    ///
    /// #[async_trait]
    /// impl Actor for Prompt {
    ///     type Msg = String;
    ///     async fn handle(&mut self, line: String, ctx: &mut Context<Self>) -> Result<()> {
    ///         if line == "exit" {
    ///             ctx.stop();
    ///         } else {
    ///             self.0.push(line);
    ///         }
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let actor::ActorHandle { addr, task } = actor::spawn_actor(Prompt(Vec::new()), 4);
    ///     addr.send("ls".into()).await.unwrap();
    ///     addr.send("exit".into()).await.unwrap();
    ///     task.await.unwrap().unwrap();
    /// });
    /// ```
    pub fn stop(&mut self) {
        self.stop = true;
    }

    pub fn is_stopping(&self) -> bool {
        self.stop
    }
}

/// Address for sending messages to an actor.
pub struct Addr<A: Actor>(mpsc::Sender<A::Msg>);

// Manual impl: deriving would require `A: Clone`.
impl<A: Actor> Clone for Addr<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: Actor> Addr<A> {
    /// Send, waiting for mailbox space. Gives the message back if the actor is gone.
    pub async fn send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.send(msg).await.map_err(|e| e.0)
    }

    /// Send without waiting. Gives the message back if the mailbox is full or closed.
    ///
    /// ```
    /// # use anyhow::Result;
    /// # use async_trait::async_trait;
    /// # use folio_actors::actor::{self, Actor, Context};
    /// struct Once;
    ///
    /// #[async_trait]
    /// impl Actor for Once {
    ///     type Msg = &'static str;
    ///     async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
    ///         assert_eq!(msg, "whoami");
    ///         ctx.stop();
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let actor::ActorHandle { addr, task } = actor::spawn_actor(Once, 1);
    ///     addr.try_send("whoami").unwrap();
    ///     task.await.unwrap().unwrap();
    /// });
    /// ```
    pub fn try_send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.try_send(msg).map_err(|e| e.into_inner())
    }

    /// Bounded mailbox capacity.
    pub fn capacity(&self) -> usize {
        self.0.max_capacity()
    }

    /// True once the actor's mailbox has been dropped.
    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

/// Handle to a running actor task.
pub struct ActorHandle<A: Actor> {
    pub addr: Addr<A>,
    pub task: JoinHandle<anyhow::Result<()>>,
}

/// Spawn an actor with a bounded mailbox.
///
/// The actor stops when `handle` returns `Err`, when every `Addr` is
/// dropped, or when it calls `ctx.stop()`.
pub fn spawn_actor<A: Actor>(actor: A, capacity: usize) -> ActorHandle<A> {
    spawn_actor_with_shutdown(actor, capacity, None)
}

/// Like [`spawn_actor`], but also stops when `shutdown` fires.
pub fn spawn_actor_with_shutdown<A: Actor>(
    actor: A,
    capacity: usize,
    shutdown: Option<broadcast::Receiver<()>>,
) -> ActorHandle<A> {
    let (tx, rx) = mpsc::channel::<A::Msg>(capacity);
    let addr = Addr(tx);
    let task = tokio::spawn(run_mailbox(actor, addr.clone(), rx, shutdown));
    ActorHandle { addr, task }
}

async fn run_mailbox<A: Actor>(
    mut actor: A,
    addr: Addr<A>,
    mut rx: mpsc::Receiver<A::Msg>,
    shutdown: Option<broadcast::Receiver<()>>,
) -> Result<()> {
    let mut ctx = Context {
        addr: addr.0.downgrade(),
        stop: false,
    };
    drop(addr);

    if let Err(e) = actor.started(&mut ctx).await {
        tracing::error!(target = "folio-actors", error = ?e, "actor failed to start");
        return Err(e);
    }

    let mut shutdown = shutdown;
    while !ctx.stop {
        let next = match shutdown.as_mut() {
            Some(sd) => tokio::select! {
                _ = sd.recv() => None,
                msg = rx.recv() => msg,
            },
            None => rx.recv().await,
        };
        let Some(msg) = next else { break };

        if let Err(e) = actor.handle(msg, &mut ctx).await {
            tracing::error!(target = "folio-actors", error = ?e, "actor returned error; stopping");
            return Err(e);
        }
    }
    Ok(())
}

/// A mailbox whose address exists before its actor does.
///
/// Lets two actors hold each other's address: reserve both, build both with
/// the reserved addresses, then start them.
pub struct Reserved<A: Actor> {
    name: String,
    addr: Addr<A>,
    rx: mpsc::Receiver<A::Msg>,
}

impl<A: Actor> Reserved<A> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addr(&self) -> Addr<A> {
        self.addr.clone()
    }

    /// Start the actor on the reserved mailbox.
    ///
    /// ```
    /// # use anyhow::Result;
    /// # use async_trait::async_trait;
    /// # use folio_actors::actor::{self, Actor, Context};
    /// struct Echo;
    ///
    /// #[async_trait]
    /// impl Actor for Echo {
    ///     type Msg = String;
    ///     async fn handle(&mut self, msg: String, ctx: &mut Context<Self>) -> Result<()> {
    ///         assert_eq!(msg, "hello world");
    ///         ctx.stop();
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let reserved = actor::spawn_actor_reserved::<Echo>("echo", 4);
    ///     let addr = reserved.addr();
    ///     let handle = reserved.start(Echo);
    ///     addr.send("hello world".into()).await.unwrap();
    ///     handle.task.await.unwrap().unwrap();
    /// });
    /// ```
    pub fn start(self, actor: A) -> ActorHandle<A> {
        self.start_with_shutdown(actor, None)
    }

    pub fn start_with_shutdown(
        self,
        actor: A,
        shutdown: Option<broadcast::Receiver<()>>,
    ) -> ActorHandle<A> {
        tracing::debug!(target = "folio-actors", actor = %self.name, "starting reserved actor");
        let task = tokio::spawn(run_mailbox(actor, self.addr.clone(), self.rx, shutdown));
        ActorHandle {
            addr: self.addr,
            task,
        }
    }
}

/// Create a mailbox and address now; start the actor later.
pub fn spawn_actor_reserved<A: Actor>(name: impl Into<String>, capacity: usize) -> Reserved<A> {
    let (tx, rx) = mpsc::channel::<A::Msg>(capacity);
    Reserved {
        name: name.into(),
        addr: Addr(tx),
        rx,
    }
}

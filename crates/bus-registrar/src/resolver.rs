use crate::context::{
    CapabilityContainer, ContainerRef, ContextRef, ResolutionContext, ScopeInstances,
};
use crate::error::Error;
use crate::helpers::{BoxAny, Named};
use crate::provider::{Lifetime, Provider, ProviderObject, Resolvable, StaticProvider};
use crate::registry::CapabilityRegistry;
use async_trait::async_trait;
use futures::future::{abortable, AbortHandle};
use futures::FutureExt;
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

type ReplyTx = oneshot::Sender<Result<Option<Arc<BoxAny>>, Error>>;

#[derive(Debug)]
pub struct Resolver {
    root: ResolverRef,
    abort: AbortHandle,
}

impl Resolver {
    pub(crate) fn context(&self) -> ContextRef {
        Arc::new(self.root.clone())
    }

    pub(crate) fn root(&self) -> ContainerRef {
        Arc::new(self.root.clone())
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        self.abort.abort()
    }
}

#[derive(Clone)]
struct Registration {
    provider: Arc<dyn ProviderObject>,
    lifetime: Lifetime,
}

#[derive(Debug)]
pub struct ResolverBuilder {
    provider_map: BTreeMap<TypeId, Named<Registration>>,
}

impl ResolverBuilder {
    pub(crate) fn new() -> Self {
        Self {
            provider_map: BTreeMap::new(),
        }
    }

    pub fn register<P>(&mut self, provider: P) -> &mut Self
    where
        P: Provider,
    {
        self.register_provider(provider, Lifetime::Singleton)
    }

    pub(crate) fn finalize(mut self) -> Resolver {
        let (worker_tx, worker_rx) = mpsc::channel(32);
        let root = ResolverRef {
            tx: worker_tx,
            scope: None,
        };

        // Any context can hand out the root container, scopes included.
        self.register(StaticProvider::new(Arc::new(root.clone()) as ContainerRef));

        let worker = Worker {
            root: Arc::new(root.clone()),
            tx: root.tx.clone(),
            provider_map: self.provider_map,
            instance_map: BTreeMap::new(),
        };
        let (task, abort) = abortable(worker.start(worker_rx));

        tokio::spawn(task);

        Resolver { root, abort }
    }
}

impl CapabilityRegistry for ResolverBuilder {
    fn register_provider<P>(&mut self, provider: P, lifetime: Lifetime) -> &mut Self
    where
        P: Provider,
    {
        let type_info = Named::of::<P::Ref>();
        if self.provider_map.contains_key(&type_info.value) {
            tracing::debug!("replacing registration: {}", type_info.name);
        }
        let provider: Arc<dyn ProviderObject> = Arc::new(provider);
        self.provider_map.insert(
            type_info.value,
            type_info.with_value(Registration { provider, lifetime }),
        );
        self
    }

    fn registration_count(&self) -> usize {
        self.provider_map.len()
    }

    fn is_registered<S>(&self) -> bool
    where
        S: Resolvable,
    {
        self.provider_map.contains_key(&TypeId::of::<S>())
    }
}

enum WorkerMessage {
    ResolveRequest {
        type_info: Named<TypeId>,
        context: ContextRef,
        tx: ReplyTx,
    },
    ProviderCallback {
        type_info: Named<TypeId>,
        result: Result<Arc<BoxAny>, Error>,
    },
}

impl fmt::Debug for WorkerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerMessage::ResolveRequest { type_info, .. } => f
                .debug_struct("ResolveRequest")
                .field("type", &type_info.name)
                .finish(),
            WorkerMessage::ProviderCallback { type_info, result } => f
                .debug_struct("ProviderCallback")
                .field("type", &type_info.name)
                .field("ok", &result.is_ok())
                .finish(),
        }
    }
}

struct Worker {
    root: ContextRef,
    tx: mpsc::Sender<WorkerMessage>,
    provider_map: BTreeMap<TypeId, Named<Registration>>,
    instance_map: BTreeMap<TypeId, Named<InstanceSlot>>,
}

// Singletons only; transient instances are never cached.
enum InstanceSlot {
    ProviderRunning {
        txs: Vec<ReplyTx>,
    },
    // We cannot use Arc<Any> because Arc<Any>::downcast<T> requires T: Sized,
    // but we need T: ?Sized to cast Arc<Any> to Arc<dyn T> so we must box Arc<dyn T>
    Resolved(Arc<BoxAny>),
}

impl Worker {
    async fn start(mut self, mut rx: mpsc::Receiver<WorkerMessage>) {
        while let Some(msg) = rx.recv().await {
            tracing::debug!("msg: {:?}", msg);

            match msg {
                WorkerMessage::ResolveRequest {
                    type_info,
                    context,
                    tx: reply_tx,
                } => {
                    self.dispatch(type_info, context, reply_tx);
                }
                WorkerMessage::ProviderCallback { type_info, result } => {
                    self.complete(type_info, result);
                }
            }
        }
    }

    fn complete(&mut self, type_info: Named<TypeId>, result: Result<Arc<BoxAny>, Error>) {
        let running = match result {
            Ok(ref instance) => self.instance_map.insert(
                type_info.value,
                type_info.with_value(InstanceSlot::Resolved(instance.clone())),
            ),
            Err(_) => self.instance_map.remove(&type_info.value),
        };
        match running.map(|slot| slot.value) {
            Some(InstanceSlot::ProviderRunning { txs }) => {
                for tx in txs {
                    tx.send(result.clone().map(Some)).ok();
                }
            }
            _ => tracing::debug!("stray provider callback: {}", type_info.name),
        }
    }

    fn dispatch(
        &mut self,
        type_info: Named<TypeId>,
        context: ContextRef,
        reply_tx: ReplyTx,
    ) {
        let type_id = type_info.value;
        if let Some(slot) = self.instance_map.get_mut(&type_id) {
            match slot.value {
                InstanceSlot::ProviderRunning { ref mut txs } => {
                    txs.push(reply_tx);
                }
                InstanceSlot::Resolved(ref instance) => {
                    reply_tx.send(Ok(Some(instance.clone()))).ok();
                }
            }
            return;
        }

        let registration = match self.provider_map.get(&type_id) {
            Some(registration) => registration.value.clone(),
            None => {
                reply_tx.send(Ok(None)).ok();
                return;
            }
        };

        match registration.lifetime {
            Lifetime::Transient => {
                tokio::spawn(async move {
                    let result = provide(&registration, &context, type_info.name).await;
                    reply_tx.send(result.map(|v| Some(Arc::new(v)))).ok();
                });
            }
            Lifetime::Singleton => {
                self.instance_map.insert(
                    type_id,
                    type_info.with_value(InstanceSlot::ProviderRunning {
                        txs: vec![reply_tx],
                    }),
                );
                let root = self.root.clone();
                let worker_tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = provide(&registration, &root, type_info.name).await;
                    worker_tx
                        .send(WorkerMessage::ProviderCallback {
                            type_info,
                            result: result.map(Arc::new),
                        })
                        .await
                        .ok();
                });
            }
        }
    }
}

// A panicking provider must still answer every waiter.
async fn provide(
    registration: &Registration,
    context: &ContextRef,
    name: &'static str,
) -> Result<BoxAny, Error> {
    AssertUnwindSafe(registration.provider.provide(context))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            tracing::debug!("provider panicked: {}", name);
            Err(Error::Service(Arc::new(anyhow::anyhow!(
                "provider for {} panicked: {}",
                name,
                panic_message(panic.as_ref())
            ))))
        })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[derive(Debug, Clone)]
pub struct ResolverRef {
    tx: mpsc::Sender<WorkerMessage>,
    scope: Option<Arc<ScopeInstances>>,
}

#[async_trait]
impl ResolutionContext for ResolverRef {
    async fn resolve_slot(&self, type_info: Named<TypeId>) -> Result<Option<Arc<BoxAny>>, Error> {
        if let Some(instance) = self.scope.as_ref().and_then(|scope| scope.get(&type_info.value)) {
            return Ok(Some(instance));
        }

        let (tx, rx) = oneshot::channel();
        let req = WorkerMessage::ResolveRequest {
            type_info,
            context: Arc::new(self.clone()),
            tx,
        };
        self.tx.send(req).await.map_err(|_| Error::WorkerGone)?;
        rx.await.map_err(|_| Error::WorkerGone)?
    }
}

impl CapabilityContainer for ResolverRef {
    fn create_scope(&self, instances: ScopeInstances) -> ContextRef {
        let mut merged = self.scope.as_deref().cloned().unwrap_or_default();
        merged.extend(instances);
        Arc::new(ResolverRef {
            tx: self.tx.clone(),
            scope: Some(Arc::new(merged)),
        })
    }
}

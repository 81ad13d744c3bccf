use crate::error::Error;
use crate::helpers::{BoxAny, Named};
use crate::provider::Resolvable;
use async_trait::async_trait;
use std::any::{type_name, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

pub type ContextRef = Arc<dyn ResolutionContext>;
pub type ContainerRef = Arc<dyn CapabilityContainer>;

/// The resolution side of a capability container, as seen by providers.
#[async_trait]
pub trait ResolutionContext: fmt::Debug + Send + Sync + 'static {
    /// Resolves the service identified by `type_info`.
    ///
    /// Returns `Ok(None)` when nothing is registered for it in this context.
    async fn resolve_slot(&self, type_info: Named<TypeId>) -> Result<Option<Arc<BoxAny>>, Error>;
}

impl dyn ResolutionContext {
    pub async fn resolve<S>(&self) -> Result<S, Error>
    where
        S: Resolvable,
    {
        match self.try_resolve::<S>().await? {
            Some(value) => Ok(value),
            None => Err(Error::UnregisteredServiceType(type_name::<S>())),
        }
    }

    /// `Ok(None)` when `S` is not registered; a registered provider that fails is still an error.
    pub async fn try_resolve<S>(&self) -> Result<Option<S>, Error>
    where
        S: Resolvable,
    {
        match self.resolve_slot(Named::of::<S>()).await? {
            Some(slot) => downcast::<S>(&slot).map(Some),
            None => Ok(None),
        }
    }
}

fn downcast<S>(slot: &BoxAny) -> Result<S, Error>
where
    S: Resolvable,
{
    slot.downcast_ref::<S>().cloned().ok_or_else(|| {
        Error::Configuration(format!(
            "registered instance does not match service type {}",
            type_name::<S>()
        ))
    })
}

pub trait CapabilityContainer: fmt::Debug + Send + Sync + 'static {
    fn create_scope(&self, instances: ScopeInstances) -> ContextRef;
}

#[derive(Debug, Clone, Default)]
pub struct ScopeInstances {
    instances: BTreeMap<TypeId, Named<Arc<BoxAny>>>,
}

impl ScopeInstances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S>(&mut self, value: S) -> &mut Self
    where
        S: Resolvable,
    {
        let type_info = Named::of::<S>();
        self.instances.insert(
            type_info.value,
            type_info.with_value(Arc::new(Box::new(value) as BoxAny)),
        );
        self
    }

    pub fn extend(&mut self, other: ScopeInstances) -> &mut Self {
        self.instances.extend(other.instances);
        self
    }

    pub fn get(&self, type_id: &TypeId) -> Option<Arc<BoxAny>> {
        self.instances.get(type_id).map(|slot| slot.value.clone())
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Deferred<S> {
    context: ContextRef,
    _p: PhantomData<fn() -> S>,
}

impl<S> Deferred<S> {
    pub fn new(context: ContextRef) -> Self {
        Self {
            context,
            _p: PhantomData,
        }
    }

    pub async fn resolve(&self) -> Result<S, Error>
    where
        S: Resolvable,
    {
        self.context.resolve::<S>().await
    }
}

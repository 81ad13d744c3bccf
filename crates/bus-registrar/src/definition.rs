use crate::components::{Activity, Consumer, ExecuteActivity, Saga};
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

pub trait ConsumerDefinition<C>: Send + Sync + 'static
where
    C: Consumer,
{
    /// Receive endpoint name; `None` lets the bus derive one from the consumer type.
    fn endpoint_name(&self) -> Option<&str> {
        None
    }

    fn concurrent_message_limit(&self) -> Option<usize> {
        None
    }

    fn consumer_type(&self) -> &'static str {
        type_name::<C>()
    }
}

pub trait SagaDefinition<S>: Send + Sync + 'static
where
    S: Saga,
{
    fn endpoint_name(&self) -> Option<&str> {
        None
    }

    fn concurrent_message_limit(&self) -> Option<usize> {
        None
    }

    fn saga_type(&self) -> &'static str {
        type_name::<S>()
    }
}

pub trait ActivityDefinition<A, Args, Log>: Send + Sync + 'static
where
    A: Activity<Args, Log>,
{
    fn execute_endpoint_name(&self) -> Option<&str> {
        None
    }

    fn compensate_endpoint_name(&self) -> Option<&str> {
        None
    }

    fn concurrent_message_limit(&self) -> Option<usize> {
        None
    }

    fn activity_type(&self) -> &'static str {
        type_name::<A>()
    }
}

pub trait ExecuteActivityDefinition<A, Args>: Send + Sync + 'static
where
    A: ExecuteActivity<Args>,
{
    fn execute_endpoint_name(&self) -> Option<&str> {
        None
    }

    fn concurrent_message_limit(&self) -> Option<usize> {
        None
    }

    fn activity_type(&self) -> &'static str {
        type_name::<A>()
    }
}

pub trait EndpointDefinition<T>: Send + Sync + 'static {
    fn endpoint_name(&self) -> Option<&str> {
        None
    }

    fn is_temporary(&self) -> bool {
        false
    }

    fn prefetch_count(&self) -> Option<u16> {
        None
    }

    fn concurrent_message_limit(&self) -> Option<usize> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub name: Option<String>,
    pub is_temporary: bool,
    pub prefetch_count: Option<u16>,
    pub concurrent_message_limit: Option<usize>,
}

pub struct EndpointSettings<D: ?Sized> {
    config: EndpointConfig,
    _definition: PhantomData<fn() -> Box<D>>,
}

impl<D: ?Sized> EndpointSettings<D> {
    pub fn new(config: EndpointConfig) -> Self {
        EndpointSettings {
            config,
            _definition: PhantomData,
        }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }
}

impl<D: ?Sized> From<EndpointConfig> for EndpointSettings<D> {
    fn from(config: EndpointConfig) -> Self {
        Self::new(config)
    }
}

impl<D: ?Sized> Deref for EndpointSettings<D> {
    type Target = EndpointConfig;

    fn deref(&self) -> &EndpointConfig {
        &self.config
    }
}

impl<D: ?Sized> Clone for EndpointSettings<D> {
    fn clone(&self) -> Self {
        Self::new(self.config.clone())
    }
}

impl<D: ?Sized> fmt::Debug for EndpointSettings<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointSettings")
            .field("definition", &type_name::<D>())
            .field("config", &self.config)
            .finish()
    }
}

use crate::components::{Activity, CompensateActivity, Consumer, ExecuteActivity, Saga};
use crate::definition::{
    ActivityDefinition, ConsumerDefinition, EndpointDefinition, EndpointSettings,
    ExecuteActivityDefinition, SagaDefinition,
};
use crate::provider::Construct;
use crate::registry::CapabilityRegistry;
use crate::request::{create_request_client, Address, RequestTimeout};
use crate::scope::{
    create_compensate_activity_scope_provider, create_execute_activity_scope_provider,
};
use std::any::type_name;
use std::sync::Arc;

/// Declares message bus building blocks to a dependency injection container.
///
/// Every operation only records a registration; nothing is built until the
/// container resolves it, so the order of calls does not matter. Registering
/// the same service twice leaves the last registration in effect.
pub trait ContainerRegistrar {
    fn register_consumer<T>(&mut self) -> &mut Self
    where
        T: Consumer + Construct;

    fn register_consumer_definition<D, C>(&mut self) -> &mut Self
    where
        D: ConsumerDefinition<C> + Construct,
        C: Consumer;

    /// Sagas are loaded from their repository rather than built by the
    /// container, so this registers nothing.
    fn register_saga<T>(&mut self) -> &mut Self
    where
        T: Saga;

    fn register_saga_definition<D, S>(&mut self) -> &mut Self
    where
        D: SagaDefinition<S> + Construct,
        S: Saga;

    fn register_execute_activity<A, Args>(&mut self) -> &mut Self
    where
        A: ExecuteActivity<Args> + Construct,
        Args: Send + Sync + 'static;

    fn register_activity_definition<D, A, Args, Log>(&mut self) -> &mut Self
    where
        D: ActivityDefinition<A, Args, Log> + Construct,
        A: Activity<Args, Log>,
        Args: Send + Sync + 'static,
        Log: Send + Sync + 'static;

    fn register_execute_activity_definition<D, A, Args>(&mut self) -> &mut Self
    where
        D: ExecuteActivityDefinition<A, Args> + Construct,
        A: ExecuteActivity<Args>,
        Args: Send + Sync + 'static;

    fn register_compensate_activity<A, Log>(&mut self) -> &mut Self
    where
        A: CompensateActivity<Log> + Construct,
        Log: Send + Sync + 'static;

    /// Registers the endpoint definition, plus `settings` as a singleton when given.
    fn register_endpoint_definition<D, T>(
        &mut self,
        settings: Option<EndpointSettings<dyn EndpointDefinition<T>>>,
    ) -> &mut Self
    where
        D: EndpointDefinition<T> + Construct,
        T: Send + Sync + 'static;

    fn register_request_client<T>(&mut self, timeout: RequestTimeout) -> &mut Self
    where
        T: Send + Sync + 'static;

    fn register_request_client_for<T>(
        &mut self,
        destination: Address,
        timeout: RequestTimeout,
    ) -> &mut Self
    where
        T: Send + Sync + 'static;
}

#[derive(Debug)]
pub struct Registrar<'a, R> {
    registry: &'a mut R,
}

impl<'a, R> Registrar<'a, R>
where
    R: CapabilityRegistry,
{
    pub fn new(registry: &'a mut R) -> Self {
        Registrar { registry }
    }
}

impl<R> ContainerRegistrar for Registrar<'_, R>
where
    R: CapabilityRegistry,
{
    fn register_consumer<T>(&mut self) -> &mut Self
    where
        T: Consumer + Construct,
    {
        tracing::debug!(consumer = type_name::<T>(), "register consumer");
        self.registry.register_concrete_type::<T>();
        self
    }

    fn register_consumer_definition<D, C>(&mut self) -> &mut Self
    where
        D: ConsumerDefinition<C> + Construct,
        C: Consumer,
    {
        tracing::debug!(
            definition = type_name::<D>(),
            consumer = type_name::<C>(),
            "register consumer definition"
        );
        self.registry
            .register_implementation::<D, Arc<dyn ConsumerDefinition<C>>>(|definition| {
                definition as Arc<dyn ConsumerDefinition<C>>
            });
        self
    }

    fn register_saga<T>(&mut self) -> &mut Self
    where
        T: Saga,
    {
        tracing::debug!(saga = type_name::<T>(), "saga is not container constructed");
        self
    }

    fn register_saga_definition<D, S>(&mut self) -> &mut Self
    where
        D: SagaDefinition<S> + Construct,
        S: Saga,
    {
        tracing::debug!(
            definition = type_name::<D>(),
            saga = type_name::<S>(),
            "register saga definition"
        );
        self.registry
            .register_implementation::<D, Arc<dyn SagaDefinition<S>>>(|definition| {
                definition as Arc<dyn SagaDefinition<S>>
            });
        self
    }

    fn register_execute_activity<A, Args>(&mut self) -> &mut Self
    where
        A: ExecuteActivity<Args> + Construct,
        Args: Send + Sync + 'static,
    {
        tracing::debug!(activity = type_name::<A>(), "register execute activity");
        self.registry.register_concrete_type::<A>();
        self.registry.register_factory(|context| async move {
            create_execute_activity_scope_provider::<A, Args>(&context)
                .await
                .map_err(anyhow::Error::from)
        });
        self
    }

    fn register_activity_definition<D, A, Args, Log>(&mut self) -> &mut Self
    where
        D: ActivityDefinition<A, Args, Log> + Construct,
        A: Activity<Args, Log>,
        Args: Send + Sync + 'static,
        Log: Send + Sync + 'static,
    {
        tracing::debug!(
            definition = type_name::<D>(),
            activity = type_name::<A>(),
            "register activity definition"
        );
        self.registry
            .register_implementation::<D, Arc<dyn ActivityDefinition<A, Args, Log>>>(
                |definition| definition as Arc<dyn ActivityDefinition<A, Args, Log>>,
            );
        self
    }

    fn register_execute_activity_definition<D, A, Args>(&mut self) -> &mut Self
    where
        D: ExecuteActivityDefinition<A, Args> + Construct,
        A: ExecuteActivity<Args>,
        Args: Send + Sync + 'static,
    {
        tracing::debug!(
            definition = type_name::<D>(),
            activity = type_name::<A>(),
            "register execute activity definition"
        );
        self.registry
            .register_implementation::<D, Arc<dyn ExecuteActivityDefinition<A, Args>>>(
                |definition| definition as Arc<dyn ExecuteActivityDefinition<A, Args>>,
            );
        self
    }

    fn register_compensate_activity<A, Log>(&mut self) -> &mut Self
    where
        A: CompensateActivity<Log> + Construct,
        Log: Send + Sync + 'static,
    {
        tracing::debug!(activity = type_name::<A>(), "register compensate activity");
        self.registry.register_concrete_type::<A>();
        self.registry.register_factory(|context| async move {
            create_compensate_activity_scope_provider::<A, Log>(&context)
                .await
                .map_err(anyhow::Error::from)
        });
        self
    }

    fn register_endpoint_definition<D, T>(
        &mut self,
        settings: Option<EndpointSettings<dyn EndpointDefinition<T>>>,
    ) -> &mut Self
    where
        D: EndpointDefinition<T> + Construct,
        T: Send + Sync + 'static,
    {
        tracing::debug!(
            definition = type_name::<D>(),
            settings = settings.is_some(),
            "register endpoint definition"
        );
        self.registry
            .register_implementation::<D, Arc<dyn EndpointDefinition<T>>>(|definition| {
                definition as Arc<dyn EndpointDefinition<T>>
            });

        if let Some(settings) = settings {
            self.registry.register_singleton(Arc::new(settings));
        }
        self
    }

    fn register_request_client<T>(&mut self, timeout: RequestTimeout) -> &mut Self
    where
        T: Send + Sync + 'static,
    {
        tracing::debug!(request = type_name::<T>(), "register request client");
        self.registry.register_factory(move |context| async move {
            create_request_client::<T>(&context, None, timeout)
                .await
                .map_err(anyhow::Error::from)
        });
        self
    }

    fn register_request_client_for<T>(
        &mut self,
        destination: Address,
        timeout: RequestTimeout,
    ) -> &mut Self
    where
        T: Send + Sync + 'static,
    {
        tracing::debug!(
            request = type_name::<T>(),
            destination = %destination,
            "register request client"
        );
        self.registry.register_factory(move |context| {
            let destination = destination.clone();
            async move {
                create_request_client::<T>(&context, Some(&destination), timeout)
                    .await
                    .map_err(anyhow::Error::from)
            }
        });
        self
    }
}

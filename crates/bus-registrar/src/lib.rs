mod provider;
pub use provider::{
    Construct, ConstructProvider, FactoryProvider, ImplementationProvider, Lifetime,
    ProvideResult, Provider, Resolvable, StaticProvider,
};
mod error;
pub use error::Error;
mod context;
pub use context::{
    CapabilityContainer, ContainerRef, ContextRef, Deferred, ResolutionContext, ScopeInstances,
};
mod registry;
pub use registry::CapabilityRegistry;
mod resolver;
pub use resolver::{Resolver, ResolverBuilder, ResolverRef};
mod helpers;
pub use helpers::{BoxAny, Named};
mod components;
pub use components::{Activity, CompensateActivity, Consumer, ExecuteActivity, Saga};
mod definition;
pub use definition::{
    ActivityDefinition, ConsumerDefinition, EndpointConfig, EndpointDefinition, EndpointSettings,
    ExecuteActivityDefinition, SagaDefinition,
};
mod scope;
pub use scope::{
    create_compensate_activity_scope_provider, create_execute_activity_scope_provider,
    CompensateActivityScope, CompensateActivityScopeProvider, CompensateContext,
    ExecuteActivityScope, ExecuteActivityScopeProvider, ExecuteContext,
};
mod request;
pub use request::{
    create_request_client, Address, ClientFactory, ConsumeContext, MessageType, RequestClient,
    RequestSender, RequestTimeout,
};
mod registrar;
pub use registrar::{ContainerRegistrar, Registrar};
mod configurator;
pub use configurator::{ComponentKind, ComponentRegistration, RegistrationConfigurator};

pub use async_trait::async_trait;
pub type Ref<T> = std::sync::Arc<T>;

#[derive(Debug)]
pub struct Container {
    registry: Resolver,
}

impl Container {
    pub fn new<F>(config: F) -> Self
    where
        F: FnOnce(&mut ResolverBuilder),
    {
        let mut builder = ResolverBuilder::new();

        config(&mut builder);

        Self {
            registry: builder.finalize(),
        }
    }

    pub fn build() -> ContainerBuilder {
        ContainerBuilder {
            resolve_builder: ResolverBuilder::new(),
        }
    }

    pub async fn resolve<S>(&self) -> Result<S, Error>
    where
        S: Resolvable,
    {
        self.registry.context().resolve().await
    }

    pub async fn try_resolve<S>(&self) -> Result<Option<S>, Error>
    where
        S: Resolvable,
    {
        self.registry.context().try_resolve().await
    }

    pub fn context(&self) -> ContextRef {
        self.registry.context()
    }

    pub fn root(&self) -> ContainerRef {
        self.registry.root()
    }

    pub fn create_scope(&self, instances: ScopeInstances) -> ContextRef {
        self.registry.root().create_scope(instances)
    }
}

#[derive(Debug)]
pub struct ContainerBuilder {
    resolve_builder: ResolverBuilder,
}

impl ContainerBuilder {
    pub fn register<P>(&mut self, provider: P) -> &mut Self
    where
        P: Provider,
    {
      self.resolve_builder.register(provider);
      self
    }

    pub fn registrar(&mut self) -> Registrar<'_, ResolverBuilder> {
      Registrar::new(&mut self.resolve_builder)
    }

    pub fn registration_count(&self) -> usize {
      self.resolve_builder.registration_count()
    }

    pub fn finalize(self) -> Container {
      Container {
        registry: self.resolve_builder.finalize(),
      }
    }
}

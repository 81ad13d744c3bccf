use crate::components::{Activity, Consumer, ExecuteActivity, Saga};
use crate::definition::{
    ActivityDefinition, ConsumerDefinition, EndpointDefinition, EndpointSettings,
    ExecuteActivityDefinition, SagaDefinition,
};
use crate::provider::Construct;
use crate::registrar::ContainerRegistrar;
use crate::request::{Address, RequestTimeout};
use std::any::{type_name, TypeId};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Consumer,
    Saga,
    ExecuteActivity,
    Activity,
    Endpoint,
    RequestClient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRegistration {
    pub kind: ComponentKind,
    pub component: &'static str,
    pub definition: Option<&'static str>,
}

/// The application-facing surface for declaring bus components.
///
/// Each component type is added at most once: the first `add_*` call for a
/// type registers it (with its definition, if any) and later calls for the
/// same type are ignored. Request clients are the exception: every add is
/// forwarded to the registrar, so the last one wins, but only the first is
/// listed in `registrations()`.
#[derive(Debug)]
pub struct RegistrationConfigurator<R> {
    registrar: R,
    added: HashSet<(ComponentKind, TypeId)>,
    registrations: Vec<ComponentRegistration>,
}

impl<R> RegistrationConfigurator<R>
where
    R: ContainerRegistrar,
{
    pub fn new(registrar: R) -> Self {
        RegistrationConfigurator {
            registrar,
            added: HashSet::new(),
            registrations: Vec::new(),
        }
    }

    pub fn registrations(&self) -> &[ComponentRegistration] {
        &self.registrations
    }

    fn track<T>(&mut self, kind: ComponentKind, definition: Option<&'static str>) -> bool
    where
        T: 'static,
    {
        if !self.added.insert((kind, TypeId::of::<T>())) {
            tracing::debug!("{:?} already added: {}", kind, type_name::<T>());
            return false;
        }
        self.registrations.push(ComponentRegistration {
            kind,
            component: type_name::<T>(),
            definition,
        });
        true
    }

    pub fn add_consumer<T>(&mut self) -> &mut Self
    where
        T: Consumer + Construct,
    {
        if self.track::<T>(ComponentKind::Consumer, None) {
            self.registrar.register_consumer::<T>();
        }
        self
    }

    pub fn add_consumer_with_definition<T, D>(&mut self) -> &mut Self
    where
        T: Consumer + Construct,
        D: ConsumerDefinition<T> + Construct,
    {
        if self.track::<T>(ComponentKind::Consumer, Some(type_name::<D>())) {
            self.registrar
                .register_consumer::<T>()
                .register_consumer_definition::<D, T>();
        }
        self
    }

    pub fn add_saga<T>(&mut self) -> &mut Self
    where
        T: Saga,
    {
        if self.track::<T>(ComponentKind::Saga, None) {
            self.registrar.register_saga::<T>();
        }
        self
    }

    pub fn add_saga_with_definition<T, D>(&mut self) -> &mut Self
    where
        T: Saga,
        D: SagaDefinition<T> + Construct,
    {
        if self.track::<T>(ComponentKind::Saga, Some(type_name::<D>())) {
            self.registrar
                .register_saga::<T>()
                .register_saga_definition::<D, T>();
        }
        self
    }

    pub fn add_execute_activity<A, Args>(&mut self) -> &mut Self
    where
        A: ExecuteActivity<Args> + Construct,
        Args: Send + Sync + 'static,
    {
        if self.track::<A>(ComponentKind::ExecuteActivity, None) {
            self.registrar.register_execute_activity::<A, Args>();
        }
        self
    }

    pub fn add_execute_activity_with_definition<A, Args, D>(&mut self) -> &mut Self
    where
        A: ExecuteActivity<Args> + Construct,
        Args: Send + Sync + 'static,
        D: ExecuteActivityDefinition<A, Args> + Construct,
    {
        if self.track::<A>(ComponentKind::ExecuteActivity, Some(type_name::<D>())) {
            self.registrar
                .register_execute_activity::<A, Args>()
                .register_execute_activity_definition::<D, A, Args>();
        }
        self
    }

    pub fn add_activity<A, Args, Log>(&mut self) -> &mut Self
    where
        A: Activity<Args, Log> + Construct,
        Args: Send + Sync + 'static,
        Log: Send + Sync + 'static,
    {
        if self.track::<A>(ComponentKind::Activity, None) {
            self.registrar
                .register_execute_activity::<A, Args>()
                .register_compensate_activity::<A, Log>();
        }
        self
    }

    pub fn add_activity_with_definition<A, Args, Log, D>(&mut self) -> &mut Self
    where
        A: Activity<Args, Log> + Construct,
        Args: Send + Sync + 'static,
        Log: Send + Sync + 'static,
        D: ActivityDefinition<A, Args, Log> + Construct,
    {
        if self.track::<A>(ComponentKind::Activity, Some(type_name::<D>())) {
            self.registrar
                .register_execute_activity::<A, Args>()
                .register_compensate_activity::<A, Log>()
                .register_activity_definition::<D, A, Args, Log>();
        }
        self
    }

    pub fn add_endpoint<D, T>(
        &mut self,
        settings: Option<EndpointSettings<dyn EndpointDefinition<T>>>,
    ) -> &mut Self
    where
        D: EndpointDefinition<T> + Construct,
        T: Send + Sync + 'static,
    {
        if self.track::<T>(ComponentKind::Endpoint, Some(type_name::<D>())) {
            self.registrar.register_endpoint_definition::<D, T>(settings);
        }
        self
    }

    pub fn add_request_client<T>(&mut self, timeout: RequestTimeout) -> &mut Self
    where
        T: Send + Sync + 'static,
    {
        self.track::<T>(ComponentKind::RequestClient, None);
        self.registrar.register_request_client::<T>(timeout);
        self
    }

    pub fn add_request_client_for<T>(
        &mut self,
        destination: Address,
        timeout: RequestTimeout,
    ) -> &mut Self
    where
        T: Send + Sync + 'static,
    {
        self.track::<T>(ComponentKind::RequestClient, None);
        self.registrar
            .register_request_client_for::<T>(destination, timeout);
        self
    }
}

use crate::context::ContextRef;
use crate::provider::{
    Construct, ConstructProvider, FactoryProvider, ImplementationProvider, Lifetime, ProvideResult,
    Provider, Resolvable, StaticProvider,
};
use crate::Ref;
use std::future::Future;

/// The registration side of a capability container.
pub trait CapabilityRegistry {
    fn register_provider<P>(&mut self, provider: P, lifetime: Lifetime) -> &mut Self
    where
        P: Provider;

    fn registration_count(&self) -> usize;

    fn is_registered<S>(&self) -> bool
    where
        S: Resolvable;

    fn register_concrete_type<T>(&mut self) -> &mut Self
    where
        T: Construct,
    {
        self.register_provider(ConstructProvider::<T>::new(), Lifetime::Transient)
    }

    fn register_implementation<I, S>(&mut self, upcast: fn(Ref<I>) -> S) -> &mut Self
    where
        I: Construct,
        S: Resolvable,
    {
        self.register_provider(ImplementationProvider::new(upcast), Lifetime::Transient)
    }

    fn register_factory<S, F, Fut>(&mut self, factory: F) -> &mut Self
    where
        S: Resolvable,
        F: Fn(ContextRef) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProvideResult<S>> + Send + 'static,
    {
        self.register_provider(FactoryProvider::<S, F>::new(factory), Lifetime::Transient)
    }

    fn register_singleton<S>(&mut self, instance: S) -> &mut Self
    where
        S: Resolvable,
    {
        self.register_provider(StaticProvider::new(instance), Lifetime::Singleton)
    }
}

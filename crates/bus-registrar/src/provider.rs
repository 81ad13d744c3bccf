use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use async_trait::async_trait;
use crate::context::ContextRef;
use crate::error::Error;
use crate::helpers::BoxAny;
use crate::Ref;

pub type ProvideResult<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
  /// The provider runs once per resolution request, against the requesting scope.
  Transient,
  /// The provider runs once for the whole container; every request shares the instance.
  Singleton,
}

#[async_trait]
pub trait Provider: Send + Sync + 'static {
  type Ref: Resolvable;
  async fn provide(&self, context: &ContextRef) -> ProvideResult<Self::Ref>;
}

#[async_trait]
pub(crate) trait ProviderObject: Send + Sync + 'static {
  async fn provide(&self, context: &ContextRef) -> Result<BoxAny, Error>;
}

#[async_trait]
impl<T> ProviderObject for T
  where T: Provider
{
  async fn provide(&self, context: &ContextRef) -> Result<BoxAny, Error> {
    Provider::provide(self, context).await
      .map(|v| Box::new(v) as BoxAny)
      .map_err(|err| {
        match err.downcast::<Error>() {
          Ok(err) => err,
          Err(err) => Error::Service(Arc::new(err))
        }
      })
  }
}

#[async_trait]
pub trait Construct: Sized + Send + Sync + 'static {
  async fn construct(context: &ContextRef) -> ProvideResult<Self>;
}

pub struct StaticProvider<T>(T);

impl<T> StaticProvider<T> {
  pub fn new(value: T) -> Self {
    StaticProvider(value)
  }
}

#[async_trait]
impl<T> Provider for StaticProvider<T>
where T: Resolvable
{
  type Ref = T;

  async fn provide(&self, _: &ContextRef) -> ProvideResult<Self::Ref> {
    Ok(self.0.clone())
  }
}

pub struct ConstructProvider<T>(PhantomData<fn() -> T>);

impl<T> ConstructProvider<T> {
  pub fn new() -> Self {
    ConstructProvider(PhantomData)
  }
}

impl<T> Default for ConstructProvider<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl<T> Provider for ConstructProvider<T>
where T: Construct
{
  type Ref = Ref<T>;

  async fn provide(&self, context: &ContextRef) -> ProvideResult<Self::Ref> {
    Ok(Ref::new(T::construct(context).await?))
  }
}

pub struct ImplementationProvider<I, S> {
  upcast: fn(Ref<I>) -> S,
}

impl<I, S> ImplementationProvider<I, S> {
  pub fn new(upcast: fn(Ref<I>) -> S) -> Self {
    ImplementationProvider { upcast }
  }
}

#[async_trait]
impl<I, S> Provider for ImplementationProvider<I, S>
where
  I: Construct,
  S: Resolvable,
{
  type Ref = S;

  async fn provide(&self, context: &ContextRef) -> ProvideResult<Self::Ref> {
    let implementation = Ref::new(I::construct(context).await?);
    Ok((self.upcast)(implementation))
  }
}

pub struct FactoryProvider<S, F> {
  factory: F,
  _p: PhantomData<fn() -> S>,
}

impl<S, F> FactoryProvider<S, F> {
  pub fn new(factory: F) -> Self {
    FactoryProvider { factory, _p: PhantomData }
  }
}

#[async_trait]
impl<S, F, Fut> Provider for FactoryProvider<S, F>
where
  S: Resolvable,
  F: Fn(ContextRef) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = ProvideResult<S>> + Send + 'static,
{
  type Ref = S;

  async fn provide(&self, context: &ContextRef) -> ProvideResult<Self::Ref> {
    (self.factory)(context.clone()).await
  }
}

pub trait Resolvable: Clone + Send + Sync + 'static {}

impl<T> Resolvable for T
  where T: Clone + Send + Sync + ?Sized + 'static
{}

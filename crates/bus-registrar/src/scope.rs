use crate::components::{CompensateActivity, ExecuteActivity};
use crate::context::{ContainerRef, ContextRef, ScopeInstances};
use crate::error::Error;
use crate::request::ConsumeContext;
use crate::Ref;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Debug)]
pub struct ExecuteContext<Args> {
    pub arguments: Ref<Args>,
    pub consume_context: Option<Arc<dyn ConsumeContext>>,
}

#[derive(Debug)]
pub struct CompensateContext<Log> {
    pub log: Ref<Log>,
    pub consume_context: Option<Arc<dyn ConsumeContext>>,
}

/// Supplies execute activities with a resolution scope of their own.
///
/// Holds the root container, not the context it was resolved from, so every
/// invocation can open a fresh nested scope.
pub struct ExecuteActivityScopeProvider<A, Args> {
    container: ContainerRef,
    _p: PhantomData<fn() -> (A, Args)>,
}

impl<A, Args> ExecuteActivityScopeProvider<A, Args>
where
    A: ExecuteActivity<Args>,
    Args: Send + Sync + 'static,
{
    pub fn new(container: ContainerRef) -> Self {
        ExecuteActivityScopeProvider {
            container,
            _p: PhantomData,
        }
    }

    pub fn container(&self) -> &ContainerRef {
        &self.container
    }

    pub async fn get_scope(
        &self,
        context: ExecuteContext<Args>,
    ) -> Result<ExecuteActivityScope<A, Args>, Error> {
        let mut instances = ScopeInstances::new();
        instances.insert(context.arguments.clone());
        if let Some(consume_context) = &context.consume_context {
            instances.insert(consume_context.clone());
        }

        let scope = self.container.create_scope(instances);
        tracing::debug!("execute activity scope: {}", type_name::<A>());
        let activity = scope.resolve::<Ref<A>>().await?;

        Ok(ExecuteActivityScope {
            activity,
            context,
            scope,
        })
    }
}

impl<A, Args> Clone for ExecuteActivityScopeProvider<A, Args> {
    fn clone(&self) -> Self {
        ExecuteActivityScopeProvider {
            container: self.container.clone(),
            _p: PhantomData,
        }
    }
}

impl<A, Args> fmt::Debug for ExecuteActivityScopeProvider<A, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteActivityScopeProvider")
            .field("activity", &type_name::<A>())
            .field("container", &self.container)
            .finish()
    }
}

pub struct ExecuteActivityScope<A, Args> {
    activity: Ref<A>,
    context: ExecuteContext<Args>,
    scope: ContextRef,
}

impl<A, Args> ExecuteActivityScope<A, Args> {
    pub fn activity(&self) -> &Ref<A> {
        &self.activity
    }

    pub fn context(&self) -> &ExecuteContext<Args> {
        &self.context
    }

    pub fn scope(&self) -> &ContextRef {
        &self.scope
    }
}

pub struct CompensateActivityScopeProvider<A, Log> {
    container: ContainerRef,
    _p: PhantomData<fn() -> (A, Log)>,
}

impl<A, Log> CompensateActivityScopeProvider<A, Log>
where
    A: CompensateActivity<Log>,
    Log: Send + Sync + 'static,
{
    pub fn new(container: ContainerRef) -> Self {
        CompensateActivityScopeProvider {
            container,
            _p: PhantomData,
        }
    }

    pub fn container(&self) -> &ContainerRef {
        &self.container
    }

    pub async fn get_scope(
        &self,
        context: CompensateContext<Log>,
    ) -> Result<CompensateActivityScope<A, Log>, Error> {
        let mut instances = ScopeInstances::new();
        instances.insert(context.log.clone());
        if let Some(consume_context) = &context.consume_context {
            instances.insert(consume_context.clone());
        }

        let scope = self.container.create_scope(instances);
        tracing::debug!("compensate activity scope: {}", type_name::<A>());
        let activity = scope.resolve::<Ref<A>>().await?;

        Ok(CompensateActivityScope {
            activity,
            context,
            scope,
        })
    }
}

impl<A, Log> Clone for CompensateActivityScopeProvider<A, Log> {
    fn clone(&self) -> Self {
        CompensateActivityScopeProvider {
            container: self.container.clone(),
            _p: PhantomData,
        }
    }
}

impl<A, Log> fmt::Debug for CompensateActivityScopeProvider<A, Log> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompensateActivityScopeProvider")
            .field("activity", &type_name::<A>())
            .field("container", &self.container)
            .finish()
    }
}

pub struct CompensateActivityScope<A, Log> {
    activity: Ref<A>,
    context: CompensateContext<Log>,
    scope: ContextRef,
}

impl<A, Log> CompensateActivityScope<A, Log> {
    pub fn activity(&self) -> &Ref<A> {
        &self.activity
    }

    pub fn context(&self) -> &CompensateContext<Log> {
        &self.context
    }

    pub fn scope(&self) -> &ContextRef {
        &self.scope
    }
}

async fn root_container(context: &ContextRef) -> Result<ContainerRef, Error> {
    context.try_resolve::<ContainerRef>().await?.ok_or_else(|| {
        Error::Configuration("resolution context cannot supply the root container".to_string())
    })
}

pub async fn create_execute_activity_scope_provider<A, Args>(
    context: &ContextRef,
) -> Result<ExecuteActivityScopeProvider<A, Args>, Error>
where
    A: ExecuteActivity<Args>,
    Args: Send + Sync + 'static,
{
    Ok(ExecuteActivityScopeProvider::new(root_container(context).await?))
}

pub async fn create_compensate_activity_scope_provider<A, Log>(
    context: &ContextRef,
) -> Result<CompensateActivityScopeProvider<A, Log>, Error>
where
    A: CompensateActivity<Log>,
    Log: Send + Sync + 'static,
{
    Ok(CompensateActivityScopeProvider::new(root_container(context).await?))
}

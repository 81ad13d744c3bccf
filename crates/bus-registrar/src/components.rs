use uuid::Uuid;

pub trait Consumer: Send + Sync + 'static {}

/// Saga instances are loaded and stored by a saga repository, never built by
/// the container.
pub trait Saga: Send + Sync + 'static {
    fn correlation_id(&self) -> Uuid;
}

pub trait ExecuteActivity<Args>: Send + Sync + 'static {}

pub trait CompensateActivity<Log>: Send + Sync + 'static {}

pub trait Activity<Args, Log>: ExecuteActivity<Args> + CompensateActivity<Log> {}

impl<T, Args, Log> Activity<Args, Log> for T
where
    T: ExecuteActivity<Args> + CompensateActivity<Log>,
{}

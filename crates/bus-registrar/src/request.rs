use crate::context::ContextRef;
use crate::error::Error;
use crate::helpers::BoxAny;
use crate::provider::ProvideResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::any::{type_name, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub type Address = url::Url;

/// How long a request client waits for a response.
///
/// The default leaves the choice to the client factory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTimeout(Option<Duration>);

impl RequestTimeout {
    pub fn after(timeout: Duration) -> Self {
        RequestTimeout(Some(timeout))
    }

    pub fn value(&self) -> Option<Duration> {
        self.0
    }

    pub fn has_value(&self) -> bool {
        self.0.is_some()
    }

    pub fn or(self, fallback: Duration) -> Duration {
        self.0.unwrap_or(fallback)
    }
}

impl From<Duration> for RequestTimeout {
    fn from(timeout: Duration) -> Self {
        Self::after(timeout)
    }
}

pub trait ConsumeContext: fmt::Debug + Send + Sync + 'static {
    fn message_id(&self) -> Option<Uuid>;

    fn conversation_id(&self) -> Option<Uuid> {
        None
    }

    fn correlation_id(&self) -> Option<Uuid> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageType {
    pub name: &'static str,
    pub id: TypeId,
}

impl MessageType {
    pub fn of<T>() -> Self
    where
        T: 'static,
    {
        MessageType {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }
}

#[async_trait]
pub trait RequestSender: Send + Sync + 'static {
    async fn send_request(&self, request: BoxAny) -> ProvideResult<BoxAny>;
}

pub trait ClientFactory: Send + Sync + 'static {
    /// A stand-alone client that establishes its own correlation and deadline.
    fn create_request_client(
        &self,
        request: MessageType,
        destination: Option<&Address>,
        timeout: RequestTimeout,
    ) -> Arc<dyn RequestSender>;

    /// A client that participates in the correlation of the message being consumed.
    fn create_consume_request_client(
        &self,
        consume_context: Arc<dyn ConsumeContext>,
        request: MessageType,
        destination: Option<&Address>,
        timeout: RequestTimeout,
    ) -> Arc<dyn RequestSender>;
}

pub struct RequestClient<T> {
    sender: Arc<dyn RequestSender>,
    _request: PhantomData<fn(T)>,
}

impl<T> RequestClient<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(sender: Arc<dyn RequestSender>) -> Self {
        RequestClient {
            sender,
            _request: PhantomData,
        }
    }

    pub async fn get_response<R>(&self, request: T) -> ProvideResult<R>
    where
        R: Send + Sync + 'static,
    {
        let response = self.sender.send_request(Box::new(request)).await?;
        response
            .downcast::<R>()
            .map(|response| *response)
            .map_err(|_| anyhow::anyhow!("unexpected response type, expected {}", type_name::<R>()))
    }
}

impl<T> Clone for RequestClient<T> {
    fn clone(&self) -> Self {
        RequestClient {
            sender: self.sender.clone(),
            _request: PhantomData,
        }
    }
}

impl<T> fmt::Debug for RequestClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient")
            .field("request", &type_name::<T>())
            .finish()
    }
}

/// Builds a `RequestClient<T>` for the resolution context it runs in.
///
/// When the context can supply a `ConsumeContext` the client is bound to it,
/// otherwise a stand-alone client is created. The client factory itself is a
/// hard dependency.
pub async fn create_request_client<T>(
    context: &ContextRef,
    destination: Option<&Address>,
    timeout: RequestTimeout,
) -> Result<RequestClient<T>, Error>
where
    T: Send + Sync + 'static,
{
    let client_factory = context.resolve::<Arc<dyn ClientFactory>>().await?;
    let request = MessageType::of::<T>();

    let sender = match context.try_resolve::<Arc<dyn ConsumeContext>>().await? {
        Some(consume_context) => client_factory.create_consume_request_client(
            consume_context,
            request,
            destination,
            timeout,
        ),
        None => client_factory.create_request_client(request, destination, timeout),
    };

    Ok(RequestClient::new(sender))
}

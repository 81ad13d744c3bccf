#![allow(dead_code)]

use bus_registrar::*;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct OrderConsumer;

impl Consumer for OrderConsumer {}

#[async_trait]
impl Construct for OrderConsumer {
    async fn construct(_: &ContextRef) -> ProvideResult<Self> {
        Ok(OrderConsumer)
    }
}

pub struct OrderConsumerDefinition;

impl ConsumerDefinition<OrderConsumer> for OrderConsumerDefinition {
    fn endpoint_name(&self) -> Option<&str> {
        Some("orders")
    }

    fn concurrent_message_limit(&self) -> Option<usize> {
        Some(8)
    }
}

#[async_trait]
impl Construct for OrderConsumerDefinition {
    async fn construct(_: &ContextRef) -> ProvideResult<Self> {
        Ok(OrderConsumerDefinition)
    }
}

pub struct PriorityOrderConsumerDefinition;

impl ConsumerDefinition<OrderConsumer> for PriorityOrderConsumerDefinition {
    fn endpoint_name(&self) -> Option<&str> {
        Some("priority-orders")
    }
}

#[async_trait]
impl Construct for PriorityOrderConsumerDefinition {
    async fn construct(_: &ContextRef) -> ProvideResult<Self> {
        Ok(PriorityOrderConsumerDefinition)
    }
}

pub struct OrderSaga {
    pub correlation_id: Uuid,
}

impl Saga for OrderSaga {
    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

pub struct OrderSagaDefinition;

impl SagaDefinition<OrderSaga> for OrderSagaDefinition {
    fn endpoint_name(&self) -> Option<&str> {
        Some("order-state")
    }
}

#[async_trait]
impl Construct for OrderSagaDefinition {
    async fn construct(_: &ContextRef) -> ProvideResult<Self> {
        Ok(OrderSagaDefinition)
    }
}

#[derive(Debug, PartialEq)]
pub struct ConvertArguments {
    pub path: String,
}

#[derive(Debug, PartialEq)]
pub struct ConvertLog {
    pub converted: String,
}

/// Picks up whatever arguments or log the resolving scope carries.
pub struct ConvertActivity {
    pub arguments: Option<Ref<ConvertArguments>>,
    pub log: Option<Ref<ConvertLog>>,
    pub consume_context: Option<Arc<dyn ConsumeContext>>,
}

impl ExecuteActivity<ConvertArguments> for ConvertActivity {}

impl CompensateActivity<ConvertLog> for ConvertActivity {}

#[async_trait]
impl Construct for ConvertActivity {
    async fn construct(context: &ContextRef) -> ProvideResult<Self> {
        Ok(ConvertActivity {
            arguments: context.try_resolve().await?,
            log: context.try_resolve().await?,
            consume_context: context.try_resolve().await?,
        })
    }
}

pub struct ConvertActivityDefinition;

impl ActivityDefinition<ConvertActivity, ConvertArguments, ConvertLog> for ConvertActivityDefinition {
    fn execute_endpoint_name(&self) -> Option<&str> {
        Some("convert-execute")
    }

    fn compensate_endpoint_name(&self) -> Option<&str> {
        Some("convert-compensate")
    }
}

#[async_trait]
impl Construct for ConvertActivityDefinition {
    async fn construct(_: &ContextRef) -> ProvideResult<Self> {
        Ok(ConvertActivityDefinition)
    }
}

pub struct ConvertExecuteDefinition;

impl ExecuteActivityDefinition<ConvertActivity, ConvertArguments> for ConvertExecuteDefinition {
    fn concurrent_message_limit(&self) -> Option<usize> {
        Some(2)
    }
}

#[async_trait]
impl Construct for ConvertExecuteDefinition {
    async fn construct(_: &ContextRef) -> ProvideResult<Self> {
        Ok(ConvertExecuteDefinition)
    }
}

pub struct OrderEndpointDefinition;

impl EndpointDefinition<OrderConsumer> for OrderEndpointDefinition {
    fn endpoint_name(&self) -> Option<&str> {
        Some("orders")
    }

    fn prefetch_count(&self) -> Option<u16> {
        Some(16)
    }
}

#[async_trait]
impl Construct for OrderEndpointDefinition {
    async fn construct(_: &ContextRef) -> ProvideResult<Self> {
        Ok(OrderEndpointDefinition)
    }
}

#[derive(Debug)]
pub struct CheckOrder {
    pub order_id: u32,
}

#[derive(Debug, PartialEq)]
pub struct OrderStatus {
    pub order_id: u32,
    pub status: &'static str,
}

#[derive(Debug)]
pub struct TestConsumeContext {
    pub message_id: Uuid,
}

impl ConsumeContext for TestConsumeContext {
    fn message_id(&self) -> Option<Uuid> {
        Some(self.message_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientCall {
    pub consume_message_id: Option<Uuid>,
    pub request: &'static str,
    pub destination: Option<Address>,
    pub timeout: RequestTimeout,
}

/// Records how each client was created and answers `CheckOrder` requests.
#[derive(Default)]
pub struct RecordingClientFactory {
    calls: Mutex<Vec<ClientCall>>,
}

impl RecordingClientFactory {
    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ClientCall) -> Arc<dyn RequestSender> {
        self.calls.lock().unwrap().push(call);
        Arc::new(OrderStatusSender)
    }
}

impl ClientFactory for RecordingClientFactory {
    fn create_request_client(
        &self,
        request: MessageType,
        destination: Option<&Address>,
        timeout: RequestTimeout,
    ) -> Arc<dyn RequestSender> {
        self.record(ClientCall {
            consume_message_id: None,
            request: request.name,
            destination: destination.cloned(),
            timeout,
        })
    }

    fn create_consume_request_client(
        &self,
        consume_context: Arc<dyn ConsumeContext>,
        request: MessageType,
        destination: Option<&Address>,
        timeout: RequestTimeout,
    ) -> Arc<dyn RequestSender> {
        self.record(ClientCall {
            consume_message_id: consume_context.message_id(),
            request: request.name,
            destination: destination.cloned(),
            timeout,
        })
    }
}

struct OrderStatusSender;

#[async_trait]
impl RequestSender for OrderStatusSender {
    async fn send_request(&self, request: BoxAny) -> ProvideResult<BoxAny> {
        let request = request
            .downcast::<CheckOrder>()
            .map_err(|_| anyhow::anyhow!("unsupported request"))?;
        Ok(Box::new(OrderStatus {
            order_id: request.order_id,
            status: "accepted",
        }))
    }
}

/// Registers `factory` as the bus client factory.
pub fn register_client_factory(builder: &mut ContainerBuilder, factory: Arc<RecordingClientFactory>) {
    builder.register(StaticProvider::new(factory as Arc<dyn ClientFactory>));
}

pub fn data_ptr<T: ?Sized>(value: &Arc<T>) -> *const () {
    Arc::as_ptr(value) as *const ()
}

mod common;

use bus_registrar::*;
use common::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn configurator_registers_components_once() {
    let factory = Arc::new(RecordingClientFactory::default());

    let mut builder = Container::build();
    register_client_factory(&mut builder, factory.clone());

    let mut configurator = RegistrationConfigurator::new(builder.registrar());
    configurator
        .add_consumer_with_definition::<OrderConsumer, OrderConsumerDefinition>()
        .add_consumer_with_definition::<OrderConsumer, PriorityOrderConsumerDefinition>()
        .add_saga_with_definition::<OrderSaga, OrderSagaDefinition>()
        .add_activity_with_definition::<ConvertActivity, ConvertArguments, ConvertLog, ConvertActivityDefinition>()
        .add_endpoint::<OrderEndpointDefinition, OrderConsumer>(None)
        .add_request_client::<CheckOrder>(RequestTimeout::after(Duration::from_secs(10)));

    let registrations = configurator.registrations().to_vec();
    drop(configurator);
    assert_eq!(
        registrations.iter().map(|r| r.kind).collect::<Vec<_>>(),
        vec![
            ComponentKind::Consumer,
            ComponentKind::Saga,
            ComponentKind::Activity,
            ComponentKind::Endpoint,
            ComponentKind::RequestClient,
        ]
    );
    assert!(registrations[0]
        .definition
        .unwrap()
        .ends_with("OrderConsumerDefinition"));
    assert!(registrations[4].definition.is_none());

    let container = builder.finalize();

    // The repeated consumer add was ignored, so the first definition stands.
    let definition: Arc<dyn ConsumerDefinition<OrderConsumer>> = container.resolve().await.unwrap();
    assert_eq!(definition.endpoint_name(), Some("orders"));

    container.resolve::<Arc<dyn SagaDefinition<OrderSaga>>>().await.unwrap();
    container
        .resolve::<Arc<dyn ActivityDefinition<ConvertActivity, ConvertArguments, ConvertLog>>>()
        .await
        .unwrap();
    container
        .resolve::<ExecuteActivityScopeProvider<ConvertActivity, ConvertArguments>>()
        .await
        .unwrap();
    container
        .resolve::<CompensateActivityScopeProvider<ConvertActivity, ConvertLog>>()
        .await
        .unwrap();
    container
        .resolve::<Arc<dyn EndpointDefinition<OrderConsumer>>>()
        .await
        .unwrap();

    container.resolve::<RequestClient<CheckOrder>>().await.unwrap();
    assert_eq!(
        factory.calls()[0].timeout.value(),
        Some(Duration::from_secs(10))
    );
}

#[test]
fn plain_adds_register_without_definitions() {
    let mut builder = Container::build();

    let mut configurator = RegistrationConfigurator::new(builder.registrar());
    configurator
        .add_consumer::<OrderConsumer>()
        .add_saga::<OrderSaga>()
        .add_execute_activity::<ConvertActivity, ConvertArguments>()
        .add_request_client_for::<CheckOrder>(
            Address::parse("queue:check-order").unwrap(),
            RequestTimeout::default(),
        );
    assert_eq!(configurator.registrations().len(), 4);
    assert!(configurator
        .registrations()
        .iter()
        .all(|r| r.definition.is_none()));
    drop(configurator);

    // consumer, execute activity + scope provider, request client; the saga adds nothing
    assert_eq!(builder.registration_count(), 4);
}

#[tokio::test]
async fn execute_only_activity_with_definition() {
    let mut builder = Container::build();
    RegistrationConfigurator::new(builder.registrar())
        .add_execute_activity_with_definition::<ConvertActivity, ConvertArguments, ConvertExecuteDefinition>();
    let container = builder.finalize();

    let definition: Arc<dyn ExecuteActivityDefinition<ConvertActivity, ConvertArguments>> =
        container.resolve().await.unwrap();
    assert_eq!(definition.concurrent_message_limit(), Some(2));

    let compensate = container
        .try_resolve::<CompensateActivityScopeProvider<ConvertActivity, ConvertLog>>()
        .await
        .unwrap();
    assert!(compensate.is_none());
}

#[tokio::test]
async fn later_request_client_add_replaces_earlier() {
    let factory = Arc::new(RecordingClientFactory::default());
    let destination = Address::parse("queue:check-order").unwrap();

    let mut builder = Container::build();
    register_client_factory(&mut builder, factory.clone());

    let mut configurator = RegistrationConfigurator::new(builder.registrar());
    configurator
        .add_request_client::<CheckOrder>(RequestTimeout::default())
        .add_request_client_for::<CheckOrder>(destination.clone(), RequestTimeout::default());
    assert_eq!(configurator.registrations().len(), 1);
    drop(configurator);

    let container = builder.finalize();
    container.resolve::<RequestClient<CheckOrder>>().await.unwrap();

    let calls = factory.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].destination, Some(destination));
}

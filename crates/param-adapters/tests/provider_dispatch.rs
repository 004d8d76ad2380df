use futures::TryStreamExt;
use param_adapters::{async_rows, method_fn, rows, StandardAdapters};
use param_core::model::factory::materialize;
use param_core::model::{builtins, DataSourceDescriptor, DataSourceLevel, MethodRef, ParameterMetadata};
use param_core::source::{AdapterContext, AdapterProvider, MethodReturn, SourceRow};
use param_core::{CancellationToken, SourceRegistry, TestValue};
use uuid::Uuid;

fn ctx(registry: SourceRegistry) -> AdapterContext {
    AdapterContext { session_id: Uuid::new_v4(),
                     class_name: "Fixture".into(),
                     method_name: "Runs".into(),
                     level: DataSourceLevel::Method,
                     parameters: vec![ParameterMetadata::new("x", builtins::int())],
                     registry,
                     cancel: CancellationToken::new(),
                     sole_source: false }
}

async fn first_values(descriptor: &DataSourceDescriptor, registry: SourceRegistry) -> Vec<TestValue> {
    let rows: Vec<SourceRow> = StandardAdapters.adapter_for(descriptor).rows(ctx(registry)).try_collect().await.unwrap();
    materialize(&rows[0].factories).await.unwrap()
}

#[tokio::test]
async fn every_source_kind_reaches_its_adapter() {
    let registry = SourceRegistry::new();
    registry.register_method("Fixture", "Numbers", method_fn(|_, _| Ok(MethodReturn::rows(vec![TestValue::Int(2)]))));
    registry.register_activator("Fixture", std::sync::Arc::new(|| Ok::<_, param_core::DataSourceError>(TestValue::Int(3))));
    registry.register_method("Fixture",
                             "Mine",
                             method_fn(|recv, _| Ok(MethodReturn::Single(recv.unwrap_or(TestValue::Null).into()))));

    let level = DataSourceLevel::Method;
    let cases = vec![(DataSourceDescriptor::literal(level, vec![TestValue::Int(1)]), 1),
                     (DataSourceDescriptor::static_method(level, MethodRef::new("Numbers")), 2),
                     (DataSourceDescriptor::instance_method(level, MethodRef::new("Mine")), 3),
                     (DataSourceDescriptor::sync_generator(level, rows(vec![vec![TestValue::Int(4)]])), 4),
                     (DataSourceDescriptor::async_generator(level, async_rows(vec![vec![TestValue::Int(5)]])), 5),
                     (DataSourceDescriptor::untyped_generator(level, async_rows(vec![vec![TestValue::Int(6)]])), 6)];
    for (descriptor, expected) in cases {
        assert_eq!(first_values(&descriptor, registry.clone()).await,
                   vec![TestValue::Int(expected)],
                   "{}",
                   descriptor.kind.name());
    }
}

#[tokio::test]
async fn method_arguments_are_forwarded() {
    let registry = SourceRegistry::new();
    registry.register_method("Fixture",
                             "Echo",
                             method_fn(|_, args| Ok(MethodReturn::rows(args))));
    let target = MethodRef::new("Echo").with_arguments(vec![TestValue::Int(8), TestValue::Int(9)]);
    let descriptor = DataSourceDescriptor::static_method(DataSourceLevel::Method, target);
    let rows: Vec<SourceRow> = StandardAdapters.adapter_for(&descriptor).rows(ctx(registry)).try_collect().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(materialize(&rows[1].factories).await, Ok(vec![TestValue::Int(9)]));
}

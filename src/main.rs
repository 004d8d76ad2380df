//! Demo: descubre las combinaciones de algunos tests de ejemplo y las imprime.
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use log::info;
use param_core::model::format::display_name;
use param_core::model::{builtins, ClassMetadata, GenericParameter, MethodMetadata, MethodRef, ParameterMetadata,
                        TypeExpr};
use param_core::source::{DataItem, DataMethod, MethodReturn};
use paramflow::config::SETTINGS;
use paramflow::param_adapters::{iter_generator, repeat_with};
use paramflow::{fingerprint, test_id, CancellationToken, CombinationEngine, DataSourceDescriptor, DataSourceError,
                DataSourceLevel, EngineConfig, GlobalRegistry, StandardAdapters, TestMetadata, TestValue};

/// Casos de suma servidos por un método de datos asíncrono.
struct AdditionCases;

#[async_trait]
impl DataMethod for AdditionCases {
    async fn invoke(&self, _receiver: Option<TestValue>, arguments: Vec<TestValue>)
                    -> Result<MethodReturn, DataSourceError> {
        let limit = match arguments.first() {
            Some(TestValue::Int(n)) => *n,
            _ => 3,
        };
        let items: Vec<Result<DataItem, DataSourceError>> =
            (1..=limit).map(|i| Ok(DataItem::Value(TestValue::Tuple(vec![TestValue::Int(i), TestValue::Int(i * 10)]))))
                       .collect();
        Ok(MethodReturn::Stream(futures::stream::iter(items).boxed()))
    }
}

fn calculator() -> TestMetadata {
    let add = MethodMetadata::new("Add").param(ParameterMetadata::new("a", builtins::int()))
                                        .param(ParameterMetadata::new("b", builtins::int()))
                                        .source(DataSourceDescriptor::literal(DataSourceLevel::Method,
                                                                              vec![TestValue::Int(1), TestValue::Int(2)]))
                                        .source(DataSourceDescriptor::static_method(DataSourceLevel::Method,
                                                                                    MethodRef::new("AdditionCases").with_arguments(vec![TestValue::Int(2)])))
                                        .repeat(1);
    TestMetadata::new(ClassMetadata::new("Calculator").in_namespace("demo"), add)
}

fn generic_box() -> TestMetadata {
    let class = ClassMetadata::new("Box").in_namespace("demo")
                                         .type_param(GenericParameter::new("T"))
                                         .ctor_param(ParameterMetadata::new("value", TypeExpr::param("T")))
                                         .source(DataSourceDescriptor::literal(DataSourceLevel::Class, vec![TestValue::Int(5)]))
                                         .source(DataSourceDescriptor::literal(DataSourceLevel::Class, vec!["five".into()]));
    TestMetadata::new(class, MethodMetadata::new("Holds"))
}

fn flaky() -> TestMetadata {
    let generator = iter_generator(|_| Err(DataSourceError::generation("fixture server unreachable")));
    let method = MethodMetadata::new("Reads").param(ParameterMetadata::new("x", builtins::int()))
                                             .source(DataSourceDescriptor::sync_generator(DataSourceLevel::Method, generator))
                                             .repeat(2);
    TestMetadata::new(ClassMetadata::new("Io").in_namespace("demo"), method)
}

fn endless() -> TestMetadata {
    let generator = repeat_with(|| Ok(vec![TestValue::Int(42)]));
    let method = MethodMetadata::new("Spins").param(ParameterMetadata::new("x", builtins::int()))
                                             .source(DataSourceDescriptor::sync_generator(DataSourceLevel::Method, generator));
    TestMetadata::new(ClassMetadata::new("Loop").in_namespace("demo"), method)
}

async fn show(engine: &CombinationEngine, metadata: TestMetadata) {
    let metadata = Arc::new(metadata);
    let combinations: Vec<_> = engine.discover(Arc::clone(&metadata), CancellationToken::new())
                                     .into_stream()
                                     .collect()
                                     .await;
    println!("== {}.{} ({} combinations)", metadata.class.full_name(), metadata.method.name, combinations.len());
    for c in &combinations {
        println!("  {:<55} {:<40} {}",
                 test_id(&metadata, c),
                 display_name(&metadata.method.name, c).await,
                 &fingerprint(&metadata, c)[..12]);
        if let Some(binding) = &c.resolved_generic_types {
            println!("      generics: {binding}");
        }
    }
}

#[tokio::main]
async fn main() {
    paramflow::logging::init();
    info!("settings: {}", serde_json::to_string(&*SETTINGS).unwrap_or_default());

    GlobalRegistry::get().initialize_with(|r| r.register_method("Calculator", "AdditionCases", Arc::new(AdditionCases)));

    let engine = paramflow::engine();
    show(&engine, calculator()).await;
    show(&engine, generic_box()).await;
    show(&engine, flaky()).await;

    // una fuente sin fin necesita un tope de filas
    let bounded = CombinationEngine::builder().adapters(StandardAdapters)
                                              .registry(engine.registry().clone())
                                              .config(EngineConfig { max_rows_per_source: Some(1_000),
                                                                     ..SETTINGS.engine_config() })
                                              .build();
    show(&bounded, endless()).await;
}

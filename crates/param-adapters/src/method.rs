//! Adapter de métodos de datos (estáticos y de instancia).
//!
//! El método se resuelve en el registro por dueño explícito o, en su defecto,
//! por la clase del test. Un retorno enumerable se recorre de forma perezosa:
//! una fila por elemento. Si el método no existe, la fuente aporta una fila
//! neutra salvo que sea la única fuente de parámetros obligatorios.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use log::warn;
use param_core::errors::DataSourceError;
use param_core::model::{MethodRef, TestValue};
use param_core::source::{AdapterContext, DataItem, DataMethod, MethodReturn, RowStream, SourceAdapter, SourceRow};

use crate::decompose::shape_item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Static,
    /// Se crea una instancia nueva del dueño con su activador registrado.
    Instance,
}

#[derive(Debug, Clone)]
pub struct MethodAdapter {
    target: MethodRef,
    receiver: Receiver,
}

type ItemStream = BoxStream<'static, Result<DataItem, DataSourceError>>;

enum Cursor {
    Start,
    Items(ItemStream),
    Done,
}

enum Opened {
    Unavailable,
    Items(ItemStream),
}

impl MethodAdapter {
    pub fn new(target: MethodRef, receiver: Receiver) -> Self { Self { target, receiver } }
}

fn unavailable(ctx: &AdapterContext, owner: &str, member: &str) -> Result<Opened, DataSourceError> {
    let err = DataSourceError::SourceUnavailable { owner: owner.to_string(),
                                                   member: member.to_string() };
    if ctx.sole_source {
        return Err(err);
    }
    warn!("{err}; continuing without its contribution");
    Ok(Opened::Unavailable)
}

async fn open(target: &MethodRef, receiver: Receiver, ctx: &AdapterContext) -> Result<Opened, DataSourceError> {
    let owner = target.resolved_owner(&ctx.class_name);
    let Some(method) = ctx.registry.method(owner, &target.name) else {
        return unavailable(ctx, owner, &target.name);
    };
    let instance = match receiver {
        Receiver::Static => None,
        Receiver::Instance => match ctx.registry.activate(owner) {
            Some(created) => Some(created?),
            None => return unavailable(ctx, owner, &target.name),
        },
    };
    let items: ItemStream = match method.invoke(instance, target.arguments.clone()).await? {
        MethodReturn::Single(item) => stream::iter([Ok(item)]).boxed(),
        MethodReturn::Iter(iter) => stream::iter(iter).boxed(),
        MethodReturn::Stream(s) => s,
    };
    Ok(Opened::Items(items))
}

type Step = Option<(SourceRow, (Cursor, AdapterContext))>;

async fn step(target: MethodRef, receiver: Receiver, cursor: Cursor, ctx: AdapterContext)
              -> Result<Step, DataSourceError> {
    ctx.cancel.check()?;
    let mut items = match cursor {
        Cursor::Done => return Ok(None),
        Cursor::Items(items) => items,
        Cursor::Start => match open(&target, receiver, &ctx).await? {
            Opened::Unavailable => return Ok(Some((SourceRow::neutral(), (Cursor::Done, ctx)))),
            Opened::Items(items) => items,
        },
    };
    match items.next().await {
        None => Ok(None),
        Some(item) => {
            let factories = shape_item(item?, ctx.parameters.len())?;
            Ok(Some((SourceRow::new(factories), (Cursor::Items(items), ctx))))
        }
    }
}

impl SourceAdapter for MethodAdapter {
    fn rows(&self, ctx: AdapterContext) -> RowStream {
        let target = self.target.clone();
        let receiver = self.receiver;
        stream::try_unfold((Cursor::Start, ctx), move |(cursor, ctx)| step(target.clone(), receiver, cursor, ctx)).boxed()
    }
}

/// `DataMethod` a partir de una función síncrona.
pub struct FnMethod<F> {
    f: F,
}

impl<F> FnMethod<F> where F: Fn(Option<TestValue>, Vec<TestValue>) -> Result<MethodReturn, DataSourceError> + Send + Sync
{
    pub fn new(f: F) -> Self { Self { f } }
}

#[async_trait]
impl<F> DataMethod for FnMethod<F>
    where F: Fn(Option<TestValue>, Vec<TestValue>) -> Result<MethodReturn, DataSourceError> + Send + Sync
{
    async fn invoke(&self, receiver: Option<TestValue>, arguments: Vec<TestValue>) -> Result<MethodReturn, DataSourceError> {
        (self.f)(receiver, arguments)
    }
}

/// Atajo para registrar un método de datos desde un closure.
pub fn method_fn<F>(f: F) -> Arc<dyn DataMethod>
    where F: Fn(Option<TestValue>, Vec<TestValue>) -> Result<MethodReturn, DataSourceError> + Send + Sync + 'static
{
    Arc::new(FnMethod::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{collect_rows, context};
    use param_core::model::{builtins, DataSourceLevel, ParameterMetadata};
    use param_core::model::factory::materialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn two_ints() -> Vec<ParameterMetadata> {
        vec![ParameterMetadata::new("a", builtins::int()), ParameterMetadata::new("b", builtins::int())]
    }

    #[tokio::test]
    async fn enumerable_return_yields_one_row_per_element() {
        let ctx = context(DataSourceLevel::Method, two_ints());
        ctx.registry.register_method("C",
                                     "Pairs",
                                     method_fn(|_, _| {
                                         Ok(MethodReturn::rows(vec![TestValue::Tuple(vec![TestValue::Int(1), TestValue::Int(2)]),
                                                                    TestValue::Tuple(vec![TestValue::Int(3), TestValue::Int(4)])]))
                                     }));
        let adapter = MethodAdapter::new(MethodRef::new("Pairs"), Receiver::Static);
        let rows = collect_rows(&adapter, ctx).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(materialize(&rows[1].factories).await, Ok(vec![TestValue::Int(3), TestValue::Int(4)]));
    }

    #[tokio::test]
    async fn missing_method_is_neutral_unless_sole_source() {
        let ctx = context(DataSourceLevel::Method, two_ints());
        let adapter = MethodAdapter::new(MethodRef::on("Elsewhere", "Nope"), Receiver::Static);
        let rows = collect_rows(&adapter, ctx.clone()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].factories.is_empty());

        let sole = AdapterContext { sole_source: true,
                                    ..ctx };
        let err = collect_rows(&adapter, sole).await.err();
        assert_eq!(err,
                   Some(DataSourceError::SourceUnavailable { owner: "Elsewhere".into(),
                                                             member: "Nope".into() }));
    }

    #[tokio::test]
    async fn instance_method_receives_fresh_receiver() {
        let ctx = context(DataSourceLevel::Method, vec![ParameterMetadata::new("x", builtins::int())]);
        let created = Arc::new(AtomicUsize::new(0));
        let counter = created.clone();
        ctx.registry.register_activator("C",
                                        Arc::new(move || {
                                            Ok::<_, DataSourceError>(TestValue::Int(counter.fetch_add(1, Ordering::SeqCst) as i32))
                                        }));
        ctx.registry.register_method("C",
                                     "FromInstance",
                                     method_fn(|recv, _| Ok(MethodReturn::Single(recv.unwrap_or(TestValue::Null).into()))));
        let adapter = MethodAdapter::new(MethodRef::new("FromInstance"), Receiver::Instance);
        let rows = collect_rows(&adapter, ctx).await.unwrap();
        assert_eq!(materialize(&rows[0].factories).await, Ok(vec![TestValue::Int(0)]));
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn deferred_items_are_reinvoked() {
        let ctx = context(DataSourceLevel::Method, vec![ParameterMetadata::new("x", builtins::int())]);
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        ctx.registry.register_method("C",
                                     "Fresh",
                                     method_fn(move |_, _| {
                                         let c = c.clone();
                                         let thunk: param_core::model::ValueThunk =
                                             Arc::new(move || Ok::<_, DataSourceError>(TestValue::Int(c.fetch_add(1, Ordering::SeqCst) as i32)));
                                         Ok(MethodReturn::Single(DataItem::Deferred(thunk)))
                                     }));
        let rows = collect_rows(&MethodAdapter::new(MethodRef::new("Fresh"), Receiver::Static), ctx).await.unwrap();
        // una invocación de muestreo + dos ejecuciones
        assert_eq!((rows[0].factories[0])().await, Ok(TestValue::Int(1)));
        assert_eq!((rows[0].factories[0])().await, Ok(TestValue::Int(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}

//! Adapters de generadores (síncronos, asíncronos y sin tipo).
//!
//! El generador se invoca una vez para obtener su secuencia de filas
//! diferidas; la secuencia se recorre bajo demanda. Cada fila se evalúa una
//! vez para conocer su forma y las factorías resultantes vuelven a invocar
//! la fila en cada ejecución.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use param_core::errors::DataSourceError;
use param_core::model::factory::{fixed_row, row_factory};
use param_core::model::{TestValue, ValueFactory};
use param_core::source::{AdapterContext, AsyncDataGenerator, DataGenerator, FactoryIter, FactoryStream,
                         GeneratorContext, RowStream, SourceAdapter, SourceRow};

use crate::decompose::shape_row;

#[derive(Clone)]
enum Generator {
    Sync(Arc<dyn DataGenerator>),
    Async(Arc<dyn AsyncDataGenerator>),
}

#[derive(Clone)]
pub struct GeneratorAdapter {
    generator: Generator,
}

impl GeneratorAdapter {
    pub fn sync(generator: Arc<dyn DataGenerator>) -> Self { Self { generator: Generator::Sync(generator) } }

    pub fn asynchronous(generator: Arc<dyn AsyncDataGenerator>) -> Self { Self { generator: Generator::Async(generator) } }

    fn factories(&self, ctx: &GeneratorContext) -> FactoryStream {
        match &self.generator {
            Generator::Sync(g) => match g.generate(ctx) {
                Ok(iter) => stream::iter(iter).boxed(),
                Err(e) => stream::iter([Err(e)]).boxed(),
            },
            Generator::Async(g) => g.generate(ctx),
        }
    }
}

type Step = Option<(SourceRow, (FactoryStream, AdapterContext))>;

async fn step(mut factories: FactoryStream, ctx: AdapterContext) -> Result<Step, DataSourceError> {
    ctx.cancel.check()?;
    let Some(next) = factories.next().await else {
        return Ok(None);
    };
    let row = next?;
    let sample = row().await?;
    let args = shape_row(row, &sample, ctx.parameters.len());
    Ok(Some((SourceRow::new(args), (factories, ctx))))
}

impl SourceAdapter for GeneratorAdapter {
    fn rows(&self, ctx: AdapterContext) -> RowStream {
        let factories = self.factories(&ctx.generator_context());
        stream::try_unfold((factories, ctx), |(factories, ctx)| step(factories, ctx)).boxed()
    }
}

/// Generador síncrono a partir de un closure.
pub struct IterGenerator<F> {
    f: F,
}

impl<F> DataGenerator for IterGenerator<F> where F: Fn(&GeneratorContext) -> Result<FactoryIter, DataSourceError> + Send + Sync
{
    fn generate(&self, ctx: &GeneratorContext) -> Result<FactoryIter, DataSourceError> { (self.f)(ctx) }
}

/// Generador asíncrono a partir de un closure que devuelve el stream.
pub struct StreamGenerator<F> {
    f: F,
}

impl<F> AsyncDataGenerator for StreamGenerator<F> where F: Fn(&GeneratorContext) -> FactoryStream + Send + Sync
{
    fn generate(&self, ctx: &GeneratorContext) -> FactoryStream { (self.f)(ctx) }
}

pub fn iter_generator<F>(f: F) -> Arc<dyn DataGenerator>
    where F: Fn(&GeneratorContext) -> Result<FactoryIter, DataSourceError> + Send + Sync + 'static
{
    Arc::new(IterGenerator { f })
}

pub fn stream_generator<F>(f: F) -> Arc<dyn AsyncDataGenerator>
    where F: Fn(&GeneratorContext) -> FactoryStream + Send + Sync + 'static
{
    Arc::new(StreamGenerator { f })
}

/// Filas fijas, síncronas.
pub fn rows(rows: Vec<Vec<TestValue>>) -> Arc<dyn DataGenerator> {
    iter_generator(move |_| {
        let iter: FactoryIter = Box::new(rows.clone().into_iter().map(|r| Ok(fixed_row(r))));
        Ok(iter)
    })
}

/// Filas fijas servidas como stream asíncrono.
pub fn async_rows(rows: Vec<Vec<TestValue>>) -> Arc<dyn AsyncDataGenerator> {
    stream_generator(move |_| {
        let items: Vec<Result<ValueFactory, DataSourceError>> = rows.iter().cloned().map(|r| Ok(fixed_row(r))).collect();
        stream::iter(items).boxed()
    })
}

/// Secuencia sin fin: cada fila llama a `f` en cada invocación. El consumidor
/// decide cuántas toma (o el límite de filas del motor corta).
pub fn repeat_with<F>(f: F) -> Arc<dyn DataGenerator>
    where F: Fn() -> Result<Vec<TestValue>, DataSourceError> + Send + Sync + 'static
{
    let f = Arc::new(f);
    iter_generator(move |_| {
        let f = Arc::clone(&f);
        let factory: ValueFactory = row_factory(move || (*f)());
        let iter: FactoryIter = Box::new(std::iter::repeat(factory).map(Ok));
        Ok(iter)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{collect_rows, context};
    use futures::TryStreamExt;
    use param_core::model::factory::materialize;
    use param_core::model::{builtins, DataSourceLevel, ParameterMetadata};

    fn params(n: usize) -> Vec<ParameterMetadata> {
        (0..n).map(|i| ParameterMetadata::new(format!("p{i}"), builtins::int())).collect()
    }

    #[tokio::test]
    async fn row_shape_rule() {
        let g = rows(vec![vec![],
                          vec![TestValue::Tuple(vec![TestValue::Int(1), TestValue::Int(2)])],
                          vec![TestValue::Int(3), TestValue::Int(4)]]);
        let rows = collect_rows(&GeneratorAdapter::sync(g), context(DataSourceLevel::Method, params(2))).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(materialize(&rows[0].factories).await, Ok(vec![TestValue::Null]));
        assert_eq!(materialize(&rows[1].factories).await, Ok(vec![TestValue::Int(1), TestValue::Int(2)]));
        assert_eq!(materialize(&rows[2].factories).await, Ok(vec![TestValue::Int(3), TestValue::Int(4)]));
    }

    #[tokio::test]
    async fn async_rows_are_pulled_lazily() {
        let g = async_rows(vec![vec![TestValue::Int(1)], vec![TestValue::Int(2)]]);
        let adapter = GeneratorAdapter::asynchronous(g);
        let mut s = adapter.rows(context(DataSourceLevel::Method, params(1)));
        let first = s.try_next().await.unwrap().map(|r| r.factories.len());
        assert_eq!(first, Some(1));
    }

    #[tokio::test]
    async fn unbounded_generator_can_be_truncated_by_consumer() {
        let g = repeat_with(|| Ok(vec![TestValue::Int(9)]));
        let s = GeneratorAdapter::sync(g).rows(context(DataSourceLevel::Method, params(1)));
        let taken: Vec<SourceRow> = s.take(5).try_collect().await.unwrap();
        assert_eq!(taken.len(), 5);
    }

    #[tokio::test]
    async fn generator_failure_surfaces_as_error() {
        let g = iter_generator(|_| Err(DataSourceError::generation("no rows today")));
        let res = collect_rows(&GeneratorAdapter::sync(g), context(DataSourceLevel::Method, params(1))).await;
        assert_eq!(res.err(), Some(DataSourceError::generation("no rows today")));
    }
}

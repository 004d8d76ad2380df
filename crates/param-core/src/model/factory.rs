//! Factorías diferidas de valores.
//!
//! Una `ValueFactory` produce la fila completa de argumentos; una
//! `ArgumentFactory` produce un único argumento (proyección de la fila). Nunca
//! se memorizan: cada invocación vuelve a ejecutar la fuente, así dos
//! ejecuciones del mismo test reciben instancias independientes.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use super::value::TestValue;
use crate::errors::DataSourceError;

pub type ValueFactory = Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<TestValue>, DataSourceError>> + Send + Sync>;

pub type ArgumentFactory = Arc<dyn Fn() -> BoxFuture<'static, Result<TestValue, DataSourceError>> + Send + Sync>;

/// Productor síncrono de un valor (p. ej. un `Func<T>` del usuario).
pub type ValueThunk = Arc<dyn Fn() -> Result<TestValue, DataSourceError> + Send + Sync>;

/// Fila síncrona elevada a `ValueFactory`.
pub fn row_factory<F>(f: F) -> ValueFactory
    where F: Fn() -> Result<Vec<TestValue>, DataSourceError> + Send + Sync + 'static
{
    Arc::new(move || {
        let row = f();
        async move { row }.boxed()
    })
}

/// Fila asíncrona; `f` se vuelve a llamar en cada invocación.
pub fn async_row_factory<F, Fut>(f: F) -> ValueFactory
    where F: Fn() -> Fut + Send + Sync + 'static,
          Fut: std::future::Future<Output = Result<Vec<TestValue>, DataSourceError>> + Send + 'static
{
    Arc::new(move || f().boxed())
}

/// Fila fija: cada invocación devuelve una copia de `values`.
pub fn fixed_row(values: Vec<TestValue>) -> ValueFactory { row_factory(move || Ok(values.clone())) }

/// Argumento constante (literal).
pub fn constant(value: TestValue) -> ArgumentFactory {
    Arc::new(move || {
        let v = value.clone();
        async move { Ok(v) }.boxed()
    })
}

/// Proyección `index` de una fila: re-invoca la fila en cada llamada.
pub fn project(row: ValueFactory, index: usize) -> ArgumentFactory {
    Arc::new(move || {
        let fut = row();
        async move {
            let values = fut.await?;
            let len = values.len();
            values.into_iter().nth(index).ok_or(DataSourceError::IndexOutOfRange { index, len })
        }.boxed()
    })
}

/// Proyección de una fila cuyo único elemento es un contenedor que debe
/// desplegarse en argumentos (regla de forma 1 → desempaquetar).
pub fn project_unwrapped(row: ValueFactory, index: usize) -> ArgumentFactory {
    Arc::new(move || {
        let fut = row();
        async move {
            let mut values = fut.await?;
            let inner = match values.len() {
                1 => match values.remove(0) {
                    TestValue::Array(items) | TestValue::Tuple(items) => items,
                    other => vec![other],
                },
                _ => values,
            };
            let len = inner.len();
            inner.into_iter().nth(index).ok_or(DataSourceError::IndexOutOfRange { index, len })
        }.boxed()
    })
}

/// Argumento que re-invoca un `ValueThunk`; con `index` toma ese elemento del
/// contenedor devuelto.
pub fn from_thunk(thunk: ValueThunk, index: Option<usize>) -> ArgumentFactory {
    Arc::new(move || {
        let produced = thunk();
        async move {
            let value = produced?;
            match index {
                None => Ok(value),
                Some(index) => {
                    let items = match value {
                        TestValue::Array(items) | TestValue::Tuple(items) => items,
                        other => vec![other],
                    };
                    let len = items.len();
                    items.into_iter().nth(index).ok_or(DataSourceError::IndexOutOfRange { index, len })
                }
            }
        }.boxed()
    })
}

/// Invoca todas las factorías en orden y recoge sus valores.
pub async fn materialize(factories: &[ArgumentFactory]) -> Result<Vec<TestValue>, DataSourceError> {
    let mut out = Vec::with_capacity(factories.len());
    for f in factories {
        out.push(f().await?);
    }
    Ok(out)
}

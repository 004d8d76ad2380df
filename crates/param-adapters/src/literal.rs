//! Adapter de argumentos literales: siempre una única fila.

use futures::stream::{self, StreamExt};
use param_core::model::factory::constant;
use param_core::model::{DataSourceLevel, TestValue};
use param_core::source::{AdapterContext, RowStream, SourceAdapter, SourceRow};

use crate::decompose::decompose_literal;

#[derive(Debug, Clone)]
pub struct LiteralAdapter {
    values: Vec<TestValue>,
}

impl LiteralAdapter {
    pub fn new(values: Vec<TestValue>) -> Self { Self { values } }

    fn row(&self, ctx: &AdapterContext) -> SourceRow {
        let values = match ctx.level {
            // Una propiedad toma el primer valor tal cual.
            DataSourceLevel::Property => vec![self.values.first().cloned().unwrap_or(TestValue::Null)],
            _ => decompose_literal(&self.values, &ctx.parameters),
        };
        SourceRow::new(values.into_iter().map(constant).collect())
    }
}

impl SourceAdapter for LiteralAdapter {
    fn rows(&self, ctx: AdapterContext) -> RowStream {
        let row = ctx.cancel.check().map(|()| self.row(&ctx));
        stream::iter([row]).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{collect_rows, context};
    use param_core::model::{builtins, ParameterMetadata};
    use param_core::DataSourceError;

    #[tokio::test]
    async fn one_row_with_decomposed_values() {
        let params = vec![ParameterMetadata::new("a", builtins::int()), ParameterMetadata::new("b", builtins::int())];
        let adapter = LiteralAdapter::new(vec![TestValue::Int(1), TestValue::Int(2)]);
        let rows = collect_rows(&adapter, context(DataSourceLevel::Method, params)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].factories.len(), 2);
        assert_eq!((rows[0].factories[1])().await, Ok(TestValue::Int(2)));
    }

    #[tokio::test]
    async fn property_level_uses_first_value() {
        let params = vec![ParameterMetadata::new("p", builtins::int())];
        let adapter = LiteralAdapter::new(vec![TestValue::Int(7), TestValue::Int(8)]);
        let rows = collect_rows(&adapter, context(DataSourceLevel::Property, params)).await.unwrap();
        assert_eq!(rows[0].factories.len(), 1);
        assert_eq!((rows[0].factories[0])().await, Ok(TestValue::Int(7)));
    }

    #[tokio::test]
    async fn cancelled_context_yields_error() {
        let ctx = context(DataSourceLevel::Method, vec![]);
        ctx.cancel.cancel();
        let res = collect_rows(&LiteralAdapter::new(vec![TestValue::Int(1)]), ctx).await;
        assert!(matches!(res, Err(DataSourceError::Cancelled)));
    }
}

//! Reglas de forma: cómo se reparte lo que devuelve una fuente entre los
//! parámetros destino.
//!
//! - Literales: reparto posicional con empaquetado para un único parámetro
//!   colección y para la cola `params`.
//! - Filas de generador: 0 → un `null`; 1 → se despliega si es un contenedor;
//!   N → ya tiene forma de parámetros.
//! - Elementos de métodos de datos: tuplas (o arrays, con más de un
//!   parámetro) de la aridad esperada se reparten por índice.

use param_core::errors::DataSourceError;
use param_core::model::factory::{constant, from_thunk, project, project_unwrapped};
use param_core::model::{ArgumentFactory, ParameterMetadata, TestValue, TypeExpr, ValueFactory};
use param_core::source::DataItem;

fn element_type(param: &ParameterMetadata) -> Option<&TypeExpr> {
    match &param.ty {
        TypeExpr::Array(e) => Some(e),
        _ => None,
    }
}

fn pack(values: &[TestValue], param: &ParameterMetadata) -> TestValue {
    let items = values.iter()
                      .cloned()
                      .map(|v| match element_type(param) {
                          Some(e) => v.coerce_to(e),
                          None => v,
                      })
                      .collect();
    TestValue::Array(items)
}

/// Reparte los valores de un literal entre `params`.
pub fn decompose_literal(values: &[TestValue], params: &[ParameterMetadata]) -> Vec<TestValue> {
    if values.is_empty() || (values.len() == 1 && values[0].is_null()) {
        return vec![TestValue::Null];
    }

    if let Some(last) = params.last().filter(|p| p.is_params) {
        let fixed = params.len() - 1;
        if values.len() >= fixed {
            let mut out: Vec<TestValue> =
                values[..fixed].iter().cloned().zip(params).map(|(v, p)| v.coerce_to(&p.ty)).collect();
            let tail = &values[fixed..];
            match tail {
                // Ya viene como array para la cola.
                [TestValue::Array(_)] => out.push(tail[0].clone()),
                _ => out.push(pack(tail, last)),
            }
            return out;
        }
    }

    if let [single] = params {
        if values.len() > 1 {
            return vec![pack(values, single)];
        }
    }

    // Sin cola `params` los valores sobrantes se descartan.
    if params.is_empty() {
        return values.to_vec();
    }
    values.iter().cloned().zip(params).map(|(v, p)| v.coerce_to(&p.ty)).collect()
}

/// Factorías por argumento para una fila de generador, a partir de una
/// muestra de la propia fila.
pub fn shape_row(row: ValueFactory, sample: &[TestValue], expected: usize) -> Vec<ArgumentFactory> {
    match sample {
        [] => vec![constant(TestValue::Null)],
        [TestValue::Tuple(items)] => (0..items.len()).map(|i| project_unwrapped(row.clone(), i)).collect(),
        [TestValue::Array(items)] if expected > 1 => {
            (0..items.len()).map(|i| project_unwrapped(row.clone(), i)).collect()
        }
        [_] => vec![project(row, 0)],
        many => (0..many.len()).map(|i| project(row.clone(), i)).collect(),
    }
}

fn splits(value: &TestValue, expected: usize) -> bool {
    match value {
        TestValue::Tuple(items) => items.len() == expected,
        TestValue::Array(items) => expected > 1 && items.len() == expected,
        _ => false,
    }
}

/// Factorías por argumento para un elemento devuelto por un método de datos.
/// Un elemento diferido se evalúa una vez para conocer su forma; las
/// factorías resultantes vuelven a invocarlo en cada ejecución.
pub fn shape_item(item: DataItem, expected: usize) -> Result<Vec<ArgumentFactory>, DataSourceError> {
    match item {
        DataItem::Value(v) if splits(&v, expected) => {
            Ok(v.as_container().map_or_else(Vec::new, |items| items.iter().cloned().map(constant).collect()))
        }
        DataItem::Value(v) => Ok(vec![constant(v)]),
        DataItem::Deferred(thunk) => {
            let sample = thunk()?;
            if splits(&sample, expected) {
                Ok((0..expected).map(|i| from_thunk(thunk.clone(), Some(i))).collect())
            } else {
                Ok(vec![from_thunk(thunk, None)])
            }
        }
    }
}

//! Unidad de salida del motor: `TestDataCombination`.
//!
//! Una combinación agrupa las factorías de argumentos de clase y de método,
//! los índices de origen (para identidad y nombre visible) y, en el camino
//! genérico, el binding de tipos resuelto. Si `data_generation_error` está
//! presente la combinación es un centinela: sólo `display_name` y
//! `repeat_index` tienen significado.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::factory::{materialize, ArgumentFactory};
use super::types::RuntimeType;
use super::value::TestValue;
use crate::errors::DataSourceError;

/// Mapa ordenado parámetro-de-tipo → tipo concreto.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericBinding(IndexMap<String, RuntimeType>);

impl GenericBinding {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, name: impl Into<String>, ty: RuntimeType) { self.0.insert(name.into(), ty); }

    pub fn get(&self, name: &str) -> Option<&RuntimeType> { self.0.get(name) }

    pub fn contains(&self, name: &str) -> bool { self.0.contains_key(name) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RuntimeType)> { self.0.iter() }
}

impl std::fmt::Display for GenericBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {}", v.display())).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[derive(Clone, Default)]
pub struct TestDataCombination {
    pub class_data_factories: Vec<ArgumentFactory>,
    pub method_data_factories: Vec<ArgumentFactory>,
    pub class_data_source_index: usize,
    pub class_loop_index: usize,
    pub method_data_source_index: usize,
    pub method_loop_index: usize,
    pub repeat_index: u32,
    pub display_name: Option<String>,
    pub data_generation_error: Option<DataSourceError>,
    pub resolved_generic_types: Option<GenericBinding>,
    pub property_value_factories: IndexMap<String, ArgumentFactory>,
}

impl TestDataCombination {
    /// Combinación centinela para una repetición concreta.
    pub fn sentinel(error: DataSourceError, display_name: String, repeat_index: u32) -> Self {
        Self { data_generation_error: Some(error),
               display_name: Some(display_name),
               repeat_index,
               ..Self::default() }
    }

    pub fn is_failed(&self) -> bool { self.data_generation_error.is_some() }

    /// Copia con otro índice de repetición (las factorías se comparten por
    /// `Arc`, no se invocan).
    pub fn with_repeat(&self, repeat_index: u32) -> Self {
        Self { repeat_index,
               ..self.clone() }
    }

    pub async fn class_arguments(&self) -> Result<Vec<TestValue>, DataSourceError> {
        materialize(&self.class_data_factories).await
    }

    pub async fn method_arguments(&self) -> Result<Vec<TestValue>, DataSourceError> {
        materialize(&self.method_data_factories).await
    }

    pub async fn property_values(&self) -> Result<IndexMap<String, TestValue>, DataSourceError> {
        let mut out = IndexMap::with_capacity(self.property_value_factories.len());
        for (name, f) in &self.property_value_factories {
            out.insert(name.clone(), f().await?);
        }
        Ok(out)
    }

    /// Vista serializable sin factorías: lo que determina identidad y orden.
    pub fn summary(&self) -> CombinationSummary {
        CombinationSummary { class_data_source_index: self.class_data_source_index,
                             class_loop_index: self.class_loop_index,
                             method_data_source_index: self.method_data_source_index,
                             method_loop_index: self.method_loop_index,
                             repeat_index: self.repeat_index,
                             class_arity: self.class_data_factories.len(),
                             method_arity: self.method_data_factories.len(),
                             properties: self.property_value_factories.keys().cloned().collect(),
                             display_name: self.display_name.clone(),
                             error: self.data_generation_error.as_ref().map(ToString::to_string),
                             generic_types: self.resolved_generic_types.clone() }
    }
}

impl std::fmt::Debug for TestDataCombination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestDataCombination")
         .field("class_factories", &self.class_data_factories.len())
         .field("method_factories", &self.method_data_factories.len())
         .field("class_data_source_index", &self.class_data_source_index)
         .field("class_loop_index", &self.class_loop_index)
         .field("method_data_source_index", &self.method_data_source_index)
         .field("method_loop_index", &self.method_loop_index)
         .field("repeat_index", &self.repeat_index)
         .field("display_name", &self.display_name)
         .field("data_generation_error", &self.data_generation_error)
         .field("resolved_generic_types", &self.resolved_generic_types)
         .field("properties", &self.property_value_factories.keys().collect::<Vec<_>>())
         .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationSummary {
    pub class_data_source_index: usize,
    pub class_loop_index: usize,
    pub method_data_source_index: usize,
    pub method_loop_index: usize,
    pub repeat_index: u32,
    pub class_arity: usize,
    pub method_arity: usize,
    pub properties: Vec<String>,
    pub display_name: Option<String>,
    pub error: Option<String>,
    pub generic_types: Option<GenericBinding>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::factory::constant;
    use crate::model::types::builtins;

    #[test]
    fn binding_display_is_ordered() {
        let mut b = GenericBinding::new();
        b.insert("T", builtins::int());
        b.insert("U", builtins::string());
        assert_eq!(b.to_string(), "{T: int, U: string}");
    }

    #[tokio::test]
    async fn with_repeat_shares_factories() {
        let c = TestDataCombination { method_data_factories: vec![constant(TestValue::Int(7))],
                                      method_data_source_index: 1,
                                      ..Default::default() };
        let r = c.with_repeat(3);
        assert_eq!(r.repeat_index, 3);
        assert_eq!(r.method_data_source_index, 1);
        assert_eq!(r.method_arguments().await, Ok(vec![TestValue::Int(7)]));
        assert!(!r.is_failed());
    }
}

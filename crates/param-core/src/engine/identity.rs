//! Identidad estable de cada combinación.
//!
//! `test_id` sigue el formato
//! `ns.Clase(tipos).claseFuente.claseBucle.Metodo(tipos).metodoFuente.metodoBucle.repeticion`
//! y añade `_DataGenerationError` a los centinelas. `fingerprint` es el hash
//! blake3 del JSON canónico de esos mismos campos más la versión del motor.

use serde_json::json;

use crate::constants::{DATA_GENERATION_ERROR_SUFFIX, ENGINE_VERSION};
use crate::hashing::hash_value;
use crate::model::format::parameter_signature;
use crate::model::{TestDataCombination, TestMetadata};

/// Nombre de la clase con sus argumentos genéricos: resueltos si la
/// combinación trae binding, declarados si no.
fn class_name_with_generics(metadata: &TestMetadata, combination: &TestDataCombination) -> String {
    let class = &metadata.class;
    if class.type_parameters.is_empty() {
        return class.name.clone();
    }
    let args: Vec<String> = class.type_parameters
                                 .iter()
                                 .map(|tp| {
                                     combination.resolved_generic_types
                                                .as_ref()
                                                .and_then(|b| b.get(&tp.name))
                                                .map_or_else(|| tp.name.clone(), |t| t.display())
                                 })
                                 .collect();
    format!("{}<{}>", class.name, args.join(", "))
}

pub fn test_id(metadata: &TestMetadata, combination: &TestDataCombination) -> String {
    let class = &metadata.class;
    let method = &metadata.method;
    let mut id = format!("{}.{}{}.{}.{}.{}{}.{}.{}.{}",
                         class.namespace.as_deref().unwrap_or_default(),
                         class_name_with_generics(metadata, combination),
                         parameter_signature(&class.constructor_parameters),
                         combination.class_data_source_index,
                         combination.class_loop_index,
                         method.name,
                         parameter_signature(&method.parameters),
                         combination.method_data_source_index,
                         combination.method_loop_index,
                         combination.repeat_index);
    if combination.is_failed() {
        id.push_str(DATA_GENERATION_ERROR_SUFFIX);
    }
    id
}

/// Hash estable de la identidad; no depende de los valores de las
/// factorías (que no se invocan).
pub fn fingerprint(metadata: &TestMetadata, combination: &TestDataCombination) -> String {
    let record = json!({
        "engine_version": ENGINE_VERSION,
        "test_id": test_id(metadata, combination),
        "summary": combination.summary(),
    });
    hash_value(&record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DataSourceError;
    use crate::model::{builtins, ClassMetadata, GenericBinding, GenericParameter, MethodMetadata, ParameterMetadata};

    fn metadata() -> TestMetadata {
        TestMetadata::new(ClassMetadata::new("Calc").in_namespace("demo"),
                          MethodMetadata::new("Add").param(ParameterMetadata::new("a", builtins::int()))
                                                    .param(ParameterMetadata::new("b", builtins::int())))
    }

    #[test]
    fn id_follows_index_layout() {
        let c = TestDataCombination { method_data_source_index: 1,
                                      method_loop_index: 2,
                                      repeat_index: 3,
                                      ..Default::default() };
        assert_eq!(test_id(&metadata(), &c), "demo.Calc().0.0.Add(int, int).1.2.3");
    }

    #[test]
    fn sentinel_id_has_suffix() {
        let c = TestDataCombination::sentinel(DataSourceError::generation("x"), "[x]".into(), 0);
        assert_eq!(test_id(&metadata(), &c), "demo.Calc().0.0.Add(int, int).0.0.0_DataGenerationError");
    }

    #[test]
    fn generic_class_uses_resolved_binding() {
        let md = TestMetadata::new(ClassMetadata::new("Box").type_param(GenericParameter::new("T")),
                                   MethodMetadata::new("Open"));
        let mut binding = GenericBinding::new();
        binding.insert("T", builtins::int());
        let resolved = TestDataCombination { resolved_generic_types: Some(binding),
                                             ..Default::default() };
        assert_eq!(test_id(&md, &resolved), ".Box<int>().0.0.Open().0.0.0");
        assert_eq!(test_id(&md, &TestDataCombination::default()), ".Box<T>().0.0.Open().0.0.0");
    }

    #[test]
    fn fingerprint_is_stable_and_index_sensitive() {
        let md = metadata();
        let a = TestDataCombination::default();
        let b = TestDataCombination { method_loop_index: 1,
                                      ..Default::default() };
        assert_eq!(fingerprint(&md, &a), fingerprint(&md, &a.clone()));
        assert_ne!(fingerprint(&md, &a), fingerprint(&md, &b));
        assert_eq!(fingerprint(&md, &a).len(), 64);
    }
}

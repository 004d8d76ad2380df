//! Nombres visibles de tests a partir de sus argumentos.

use super::combination::TestDataCombination;
use super::metadata::ParameterMetadata;
use super::value::TestValue;

/// `Add(1, 2)`; sin argumentos devuelve sólo el nombre.
pub fn format_arguments(name: &str, arguments: &[TestValue]) -> String {
    if arguments.is_empty() {
        return name.to_string();
    }
    let parts: Vec<String> = arguments.iter().map(TestValue::display).collect();
    format!("{name}({})", parts.join(", "))
}

/// Firma de tipos declarada: `(int, List<T>)`.
pub fn parameter_signature(parameters: &[ParameterMetadata]) -> String {
    let parts: Vec<String> = parameters.iter().map(|p| p.ty.display()).collect();
    format!("({})", parts.join(", "))
}

/// Nombre visible de una combinación: el override si existe; si no, el método
/// con sus argumentos materializados. Invoca las factorías de método.
pub async fn display_name(method_name: &str, combination: &TestDataCombination) -> String {
    if let Some(name) = &combination.display_name {
        return name.clone();
    }
    match combination.method_arguments().await {
        Ok(args) => format_arguments(method_name, &args),
        Err(_) => method_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{builtins, TypeExpr};

    #[test]
    fn formats_arguments_and_signature() {
        assert_eq!(format_arguments("Add", &[TestValue::Int(1), TestValue::Int(2)]), "Add(1, 2)");
        assert_eq!(format_arguments("Run", &[]), "Run");
        let ps = [ParameterMetadata::new("a", builtins::int()),
                  ParameterMetadata::new("b", TypeExpr::generic("List", vec![TypeExpr::param("T")]))];
        assert_eq!(parameter_signature(&ps), "(int, List<T>)");
    }
}

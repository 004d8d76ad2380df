//! Validación de restricciones genéricas.
//!
//! Se recogen todas las violaciones de todos los parámetros antes de fallar:
//! el usuario ve la lista completa en un único error.

use crate::errors::{ConstraintViolation, GenericResolutionError, ViolationKind};
use crate::model::{GenericBinding, GenericConstraint, GenericParameter, TypeDescriptor};

/// Violaciones de un parámetro frente a un tipo concreto.
pub fn violations<T>(param: &GenericParameter, actual: &T) -> Vec<ConstraintViolation>
    where T: TypeDescriptor + ?Sized
{
    let mut out = Vec::new();
    let mut push = |kind| {
        out.push(ConstraintViolation { parameter: param.name.clone(),
                                       kind,
                                       actual: actual.type_name() })
    };
    for constraint in &param.constraints {
        match constraint {
            GenericConstraint::ReferenceType if actual.is_value_type() => push(ViolationKind::ReferenceType),
            GenericConstraint::ValueType if !actual.is_value_type() => push(ViolationKind::ValueType),
            GenericConstraint::DefaultConstructor if !actual.has_public_default_constructor() => {
                push(ViolationKind::DefaultConstructor)
            }
            GenericConstraint::Interface(i) if !actual.is_assignable_to(i) => push(ViolationKind::Interface(i.display())),
            GenericConstraint::BaseClass(b) if !actual.is_assignable_to(b) => push(ViolationKind::BaseClass(b.display())),
            _ => {}
        }
    }
    out
}

/// Valida el binding completo. Parámetros ausentes del binding se ignoran
/// (la resolución ya habrá fallado o aplicado el fallback).
pub fn validate<'a, I>(params: I, binding: &GenericBinding) -> Result<(), GenericResolutionError>
    where I: IntoIterator<Item = &'a GenericParameter>
{
    let all: Vec<ConstraintViolation> = params.into_iter()
                                              .filter_map(|p| binding.get(&p.name).map(|t| violations(p, t)))
                                              .flatten()
                                              .collect();
    if all.is_empty() {
        Ok(())
    } else {
        Err(GenericResolutionError::ConstraintViolations(all))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{builtins, RuntimeType};

    #[test]
    fn value_type_violates_class_constraint() {
        let p = GenericParameter::new("T").constrained(GenericConstraint::ReferenceType);
        let v = violations(&p, &builtins::int());
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].to_string(), "Type parameter 'T' has a class constraint but 'int' is a value type");
    }

    #[test]
    fn string_lacks_default_constructor_and_struct() {
        let p = GenericParameter::new("T").constrained(GenericConstraint::ValueType)
                                          .constrained(GenericConstraint::DefaultConstructor);
        let v = violations(&p, &builtins::string());
        assert_eq!(v.len(), 2);
        assert_eq!(v[1].to_string(),
                   "Type parameter 'T' has a new() constraint but 'string' does not have a parameterless constructor");
    }

    #[test]
    fn all_parameters_are_collected() {
        let comparable = RuntimeType::interface("IComparable");
        let t = GenericParameter::new("T").constrained(GenericConstraint::Interface(comparable));
        let u = GenericParameter::new("U").constrained(GenericConstraint::BaseClass(RuntimeType::class("Animal")));
        let mut binding = GenericBinding::new();
        binding.insert("T", RuntimeType::class("Widget"));
        binding.insert("U", builtins::string());
        let err = validate([&t, &u], &binding).unwrap_err();
        match err {
            GenericResolutionError::ConstraintViolations(v) => {
                assert_eq!(v.len(), 2);
                assert_eq!(v[0].to_string(), "Type parameter 'T' must implement 'IComparable' but 'Widget' does not");
                assert_eq!(v[1].to_string(), "Type parameter 'U' must derive from 'Animal' but 'string' does not");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

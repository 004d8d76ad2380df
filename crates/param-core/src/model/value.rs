//! Valores crudos de argumento.
//!
//! `TestValue` es el equivalente neutral de un `object?` del host: el motor
//! sólo lo inspecciona para conocer su forma (aridad) y su tipo en tiempo de
//! ejecución durante la inferencia genérica.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{builtins, RuntimeType, TypeExpr, TypeKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TestValue {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Str(String),
    Char(char),
    Array(Vec<TestValue>),
    Tuple(Vec<TestValue>),
    /// Instancia de un tipo de usuario; `state` es opaco para el motor.
    Object { ty: RuntimeType, state: Value },
    Type(RuntimeType),
}

impl TestValue {
    pub fn str(s: impl Into<String>) -> Self { Self::Str(s.into()) }

    pub fn object(ty: RuntimeType, state: Value) -> Self { Self::Object { ty, state } }

    pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

    /// Tipo en tiempo de ejecución; `None` para `Null`, que no aporta
    /// información de tipo.
    pub fn runtime_type(&self) -> Option<RuntimeType> {
        Some(match self {
            Self::Null => return None,
            Self::Bool(_) => builtins::bool(),
            Self::Int(_) => builtins::int(),
            Self::Long(_) => builtins::long(),
            Self::Double(_) => builtins::double(),
            Self::Str(_) => builtins::string(),
            Self::Char(_) => builtins::char(),
            Self::Array(items) => {
                let element = items.iter().find_map(TestValue::runtime_type).unwrap_or_else(builtins::object);
                RuntimeType::array_of(element)
            }
            Self::Tuple(items) => {
                builtins::tuple(items.iter()
                                     .map(|i| i.runtime_type().unwrap_or_else(builtins::object))
                                     .collect())
            }
            Self::Object { ty, .. } => ty.clone(),
            Self::Type(_) => builtins::type_type(),
        })
    }

    /// Coerción de constantes hacia el tipo declarado del parámetro. Sólo se
    /// aplican conversiones sin pérdida o inequívocas; el resto se devuelve tal
    /// cual y el consumidor decide.
    pub fn coerce_to(self, target: &TypeExpr) -> Self {
        let Some(name) = target.concrete_name() else {
            return self;
        };
        match (self, name) {
            (Self::Int(i), "long") => Self::Long(i64::from(i)),
            (Self::Int(i), "double") => Self::Double(f64::from(i)),
            (Self::Long(l), "int") if i32::try_from(l).is_ok() => Self::Int(l as i32),
            // i64 -> f64 puede perder precisión en magnitudes enormes; es la
            // misma conversión implícita que aplica el host.
            (Self::Long(l), "double") => Self::Double(l as f64),
            (Self::Str(s), "char") if s.chars().count() == 1 => s.chars().next().map_or(Self::Str(s.clone()), Self::Char),
            (v, _) => v,
        }
    }

    /// Elementos si el valor es un contenedor multi-valor (array o tupla).
    pub fn as_container(&self) -> Option<&[TestValue]> {
        match self {
            Self::Array(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Representación para nombres de test: `1`, `"a"`, `'c'`, `null`.
    pub fn display(&self) -> String {
        match self {
            Self::Null => "null".into(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Long(l) => l.to_string(),
            Self::Double(d) => d.to_string(),
            Self::Str(s) => format!("\"{s}\""),
            Self::Char(c) => format!("'{c}'"),
            Self::Array(items) => format!("[{}]", join_display(items)),
            Self::Tuple(items) => format!("({})", join_display(items)),
            Self::Object { ty, .. } => ty.display(),
            Self::Type(t) => format!("typeof({})", t.display()),
        }
    }

    /// ¿Es un valor de tipo por valor? (útil para hosts sin `RuntimeType`).
    pub fn is_value_kind(&self) -> bool {
        self.runtime_type().is_some_and(|t| matches!(t.kind, TypeKind::Value))
    }
}

fn join_display(items: &[TestValue]) -> String {
    items.iter().map(TestValue::display).collect::<Vec<_>>().join(", ")
}

impl From<i32> for TestValue {
    fn from(v: i32) -> Self { Self::Int(v) }
}

impl From<i64> for TestValue {
    fn from(v: i64) -> Self { Self::Long(v) }
}

impl From<f64> for TestValue {
    fn from(v: f64) -> Self { Self::Double(v) }
}

impl From<bool> for TestValue {
    fn from(v: bool) -> Self { Self::Bool(v) }
}

impl From<char> for TestValue {
    fn from(v: char) -> Self { Self::Char(v) }
}

impl From<&str> for TestValue {
    fn from(v: &str) -> Self { Self::Str(v.to_string()) }
}

impl From<String> for TestValue {
    fn from(v: String) -> Self { Self::Str(v) }
}

impl<T: Into<TestValue>> From<Option<T>> for TestValue {
    fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_runtime_type_uses_first_non_null_element() {
        let v = TestValue::Array(vec![TestValue::Null, TestValue::Int(3)]);
        assert_eq!(v.runtime_type().map(|t| t.display()), Some("int[]".to_string()));
        assert_eq!(TestValue::Null.runtime_type(), None);
    }

    #[test]
    fn constants_are_coerced_to_declared_type() {
        let long = TypeExpr::Concrete(builtins::long());
        assert_eq!(TestValue::Int(5).coerce_to(&long), TestValue::Long(5));
        let ch = TypeExpr::Concrete(builtins::char());
        assert_eq!(TestValue::str("x").coerce_to(&ch), TestValue::Char('x'));
        assert_eq!(TestValue::str("xy").coerce_to(&ch), TestValue::str("xy"));
        assert_eq!(TestValue::Int(1).coerce_to(&TypeExpr::param("T")), TestValue::Int(1));
    }

    #[test]
    fn display_quotes_strings_and_chars() {
        let v = TestValue::Tuple(vec![TestValue::Int(1), "a".into(), 'c'.into(), TestValue::Null]);
        assert_eq!(v.display(), "(1, \"a\", 'c', null)");
    }
}

//! Descriptores de tipo en tiempo de ejecución.
//!
//! El motor no depende de reflexión nativa: cada valor conoce su
//! `RuntimeType` y las restricciones genéricas se validan contra el trait
//! `TypeDescriptor`. Un host con reflexión propia puede implementar el trait
//! sobre sus propios tipos; `RuntimeType` es la implementación por defecto.
//!
//! `TypeExpr` describe el tipo *declarado* de un parámetro, que puede estar
//! abierto (mencionar parámetros de tipo como `T`). La inferencia estructural
//! (`TypeExpr::infer`) unifica una expresión declarada con un tipo concreto.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Categoría del tipo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Reference,
    Value,
    Interface,
    Array,
    Pointer,
    Callable,
}

/// Abstracción mínima que necesita el validador de restricciones.
pub trait TypeDescriptor {
    fn type_name(&self) -> String;
    fn is_value_type(&self) -> bool;
    fn is_assignable_to(&self, target: &RuntimeType) -> bool;
    fn has_public_default_constructor(&self) -> bool;
}

/// Tipo concreto conocido en tiempo de ejecución.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeType {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub generic_args: Vec<RuntimeType>,
    #[serde(default)]
    pub element: Option<Box<RuntimeType>>,
    #[serde(default)]
    pub base: Option<Box<RuntimeType>>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub default_constructible: bool,
}

impl RuntimeType {
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self { name: name.into(),
               kind,
               generic_args: Vec::new(),
               element: None,
               base: None,
               interfaces: Vec::new(),
               default_constructible: false }
    }

    /// Tipo por referencia (clase). Sin constructor por defecto salvo que se
    /// indique con `constructible()`.
    pub fn class(name: impl Into<String>) -> Self { Self::with_kind(name, TypeKind::Reference) }

    /// Tipo por valor; siempre construible sin argumentos.
    pub fn value(name: impl Into<String>) -> Self {
        let mut t = Self::with_kind(name, TypeKind::Value);
        t.default_constructible = true;
        t
    }

    pub fn interface(name: impl Into<String>) -> Self { Self::with_kind(name, TypeKind::Interface) }

    pub fn array_of(element: RuntimeType) -> Self {
        let mut t = Self::with_kind(format!("{}[]", element.display()), TypeKind::Array);
        t.element = Some(Box::new(element));
        t.interfaces = vec!["IEnumerable".to_string()];
        t
    }

    pub fn pointer_to(element: RuntimeType) -> Self {
        let mut t = Self::with_kind(format!("{}*", element.display()), TypeKind::Pointer);
        t.element = Some(Box::new(element));
        t
    }

    /// Firma invocable: `generic_args` = parámetros seguidos del retorno.
    pub fn callable(params: Vec<RuntimeType>, ret: RuntimeType) -> Self {
        let mut t = Self::with_kind("Func", TypeKind::Callable);
        t.generic_args = params;
        t.generic_args.push(ret);
        t
    }

    pub fn constructible(mut self) -> Self {
        self.default_constructible = true;
        self
    }

    pub fn with_interfaces<I, S>(mut self, interfaces: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.interfaces.extend(interfaces.into_iter().map(Into::into));
        self
    }

    pub fn with_base(mut self, base: RuntimeType) -> Self {
        self.base = Some(Box::new(base));
        self
    }

    pub fn with_generic_args(mut self, args: Vec<RuntimeType>) -> Self {
        self.generic_args = args;
        self
    }

    /// Nombre legible: `List<int>`, `int[]`, `Func<int, string>`.
    pub fn display(&self) -> String {
        match self.kind {
            TypeKind::Array | TypeKind::Pointer => self.name.clone(),
            _ if self.generic_args.is_empty() => self.name.clone(),
            _ => {
                let args: Vec<String> = self.generic_args.iter().map(RuntimeType::display).collect();
                format!("{}<{}>", self.name, args.join(", "))
            }
        }
    }

    /// Identidad estructural (nombre + argumentos), ignorando metadatos de
    /// herencia que pueden variar según quién construyó el descriptor.
    fn same_type(&self, other: &RuntimeType) -> bool {
        self.name == other.name
        && self.generic_args.len() == other.generic_args.len()
        && self.generic_args.iter().zip(&other.generic_args).all(|(a, b)| a.same_type(b))
    }
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.display()) }
}

impl TypeDescriptor for RuntimeType {
    fn type_name(&self) -> String { self.display() }

    fn is_value_type(&self) -> bool { matches!(self.kind, TypeKind::Value) }

    fn is_assignable_to(&self, target: &RuntimeType) -> bool {
        if target.name == builtins::OBJECT_NAME || self.same_type(target) {
            return true;
        }
        if matches!(target.kind, TypeKind::Interface) && self.interfaces.iter().any(|i| *i == target.name) {
            return true;
        }
        self.base.as_deref().is_some_and(|b| b.is_assignable_to(target))
    }

    fn has_public_default_constructor(&self) -> bool { self.default_constructible }
}

/// Tipos primitivos compartidos por todo el proceso.
pub mod builtins {
    use super::*;

    pub const OBJECT_NAME: &str = "object";

    const NUMERIC: [&str; 4] = ["IComparable", "IEquatable", "IFormattable", "IConvertible"];

    static INT: Lazy<RuntimeType> = Lazy::new(|| RuntimeType::value("int").with_interfaces(NUMERIC));
    static LONG: Lazy<RuntimeType> = Lazy::new(|| RuntimeType::value("long").with_interfaces(NUMERIC));
    static DOUBLE: Lazy<RuntimeType> = Lazy::new(|| RuntimeType::value("double").with_interfaces(NUMERIC));
    static BOOL: Lazy<RuntimeType> =
        Lazy::new(|| RuntimeType::value("bool").with_interfaces(["IComparable", "IEquatable", "IConvertible"]));
    static CHAR: Lazy<RuntimeType> =
        Lazy::new(|| RuntimeType::value("char").with_interfaces(["IComparable", "IEquatable", "IConvertible"]));
    static STRING: Lazy<RuntimeType> = Lazy::new(|| {
        RuntimeType::class("string").with_interfaces(["IComparable", "IEquatable", "IEnumerable", "IConvertible"])
    });
    static OBJECT: Lazy<RuntimeType> = Lazy::new(|| RuntimeType::class(OBJECT_NAME).constructible());
    static TYPE: Lazy<RuntimeType> = Lazy::new(|| RuntimeType::class("Type"));

    pub fn int() -> RuntimeType { INT.clone() }
    pub fn long() -> RuntimeType { LONG.clone() }
    pub fn double() -> RuntimeType { DOUBLE.clone() }
    pub fn bool() -> RuntimeType { BOOL.clone() }
    pub fn char() -> RuntimeType { CHAR.clone() }
    pub fn string() -> RuntimeType { STRING.clone() }
    pub fn object() -> RuntimeType { OBJECT.clone() }
    pub fn type_type() -> RuntimeType { TYPE.clone() }

    /// Tupla por valor con los tipos de sus elementos como argumentos.
    pub fn tuple(items: Vec<RuntimeType>) -> RuntimeType {
        RuntimeType::value("ValueTuple").with_generic_args(items)
    }

    /// Busca un primitivo por nombre (`"int"`, `"string"`, ...).
    pub fn by_name(name: &str) -> Option<RuntimeType> {
        match name {
            "int" => Some(int()),
            "long" => Some(long()),
            "double" => Some(double()),
            "bool" => Some(bool()),
            "char" => Some(char()),
            "string" => Some(string()),
            "object" => Some(object()),
            _ => None,
        }
    }
}

/// Tipo declarado de un parámetro; puede mencionar parámetros genéricos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeExpr {
    Concrete(RuntimeType),
    Param(String),
    Generic { name: String, args: Vec<TypeExpr> },
    Array(Box<TypeExpr>),
    /// Puntero o parámetro por referencia.
    Pointer(Box<TypeExpr>),
    Callable { params: Vec<TypeExpr>, ret: Option<Box<TypeExpr>> },
}

impl TypeExpr {
    pub fn param(name: impl Into<String>) -> Self { Self::Param(name.into()) }

    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self::Generic { name: name.into(),
                        args }
    }

    pub fn array(element: TypeExpr) -> Self { Self::Array(Box::new(element)) }

    pub fn pointer(element: TypeExpr) -> Self { Self::Pointer(Box::new(element)) }

    pub fn callable(params: Vec<TypeExpr>, ret: Option<TypeExpr>) -> Self {
        Self::Callable { params,
                         ret: ret.map(Box::new) }
    }

    /// Nombre del tipo concreto si la expresión es cerrada y simple.
    pub fn concrete_name(&self) -> Option<&str> {
        match self {
            Self::Concrete(t) => Some(t.name.as_str()),
            _ => None,
        }
    }

    /// ¿La expresión menciona el parámetro `param` en alguna posición?
    pub fn mentions(&self, param: &str) -> bool {
        match self {
            Self::Concrete(_) => false,
            Self::Param(p) => p == param,
            Self::Generic { args, .. } => args.iter().any(|a| a.mentions(param)),
            Self::Array(e) | Self::Pointer(e) => e.mentions(param),
            Self::Callable { params, ret } => {
                params.iter().any(|p| p.mentions(param)) || ret.as_deref().is_some_and(|r| r.mentions(param))
            }
        }
    }

    /// Unifica la expresión declarada con `actual` y devuelve el tipo que
    /// ocupa la posición de `param`, si la estructura coincide.
    pub fn infer(&self, param: &str, actual: &RuntimeType) -> Option<RuntimeType> {
        match self {
            Self::Concrete(_) => None,
            Self::Param(p) if p == param => Some(actual.clone()),
            Self::Param(_) => None,
            Self::Generic { args, .. } => {
                if args.len() != actual.generic_args.len() {
                    return None;
                }
                args.iter().zip(&actual.generic_args).find_map(|(a, t)| a.infer(param, t))
            }
            Self::Array(e) => match (actual.kind, actual.element.as_deref()) {
                (TypeKind::Array, Some(el)) => e.infer(param, el),
                _ => None,
            },
            // Un parámetro por referencia recibe el valor apuntado directamente.
            Self::Pointer(e) => match (actual.kind, actual.element.as_deref()) {
                (TypeKind::Pointer, Some(el)) => e.infer(param, el),
                _ => e.infer(param, actual),
            },
            Self::Callable { params, ret } => {
                if !matches!(actual.kind, TypeKind::Callable) {
                    return None;
                }
                let (arg_types, ret_type) = actual.generic_args.split_at(actual.generic_args.len().saturating_sub(1));
                if arg_types.len() != params.len() {
                    return None;
                }
                params.iter()
                      .zip(arg_types)
                      .find_map(|(p, t)| p.infer(param, t))
                      .or_else(|| match (ret.as_deref(), ret_type.first()) {
                          (Some(r), Some(t)) => r.infer(param, t),
                          _ => None,
                      })
            }
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Concrete(t) => t.display(),
            Self::Param(p) => p.clone(),
            Self::Generic { name, args } => {
                let args: Vec<String> = args.iter().map(TypeExpr::display).collect();
                format!("{name}<{}>", args.join(", "))
            }
            Self::Array(e) => format!("{}[]", e.display()),
            Self::Pointer(e) => format!("{}*", e.display()),
            Self::Callable { params, ret } => {
                let mut parts: Vec<String> = params.iter().map(TypeExpr::display).collect();
                parts.push(ret.as_deref().map_or_else(|| "void".to_string(), TypeExpr::display));
                format!("Func<{}>", parts.join(", "))
            }
        }
    }
}

impl From<RuntimeType> for TypeExpr {
    fn from(t: RuntimeType) -> Self { Self::Concrete(t) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_is_comparable_value_type() {
        let int = builtins::int();
        assert!(int.is_value_type());
        assert!(int.is_assignable_to(&RuntimeType::interface("IComparable")));
        assert!(int.is_assignable_to(&builtins::object()));
        assert!(!int.is_assignable_to(&builtins::string()));
    }

    #[test]
    fn base_chain_is_followed() {
        let animal = RuntimeType::class("Animal");
        let dog = RuntimeType::class("Dog").with_base(RuntimeType::class("Mammal").with_base(animal.clone()));
        assert!(dog.is_assignable_to(&animal));
        assert!(!animal.is_assignable_to(&dog));
    }

    #[test]
    fn infers_through_containers() {
        let list_of_int = RuntimeType::class("List").with_generic_args(vec![builtins::int()]);
        let declared = TypeExpr::generic("List", vec![TypeExpr::param("T")]);
        assert_eq!(declared.infer("T", &list_of_int), Some(builtins::int()));

        let arr = RuntimeType::array_of(builtins::string());
        assert_eq!(TypeExpr::array(TypeExpr::param("T")).infer("T", &arr), Some(builtins::string()));

        let by_ref = TypeExpr::pointer(TypeExpr::param("T"));
        assert_eq!(by_ref.infer("T", &builtins::long()), Some(builtins::long()));
    }

    #[test]
    fn infers_from_callable_return() {
        let f = RuntimeType::callable(vec![builtins::int()], builtins::string());
        let declared = TypeExpr::callable(vec![TypeExpr::Concrete(builtins::int())], Some(TypeExpr::param("TResult")));
        assert!(declared.mentions("TResult"));
        assert_eq!(declared.infer("TResult", &f), Some(builtins::string()));
        assert_eq!(declared.display(), "Func<int, TResult>");
    }
}

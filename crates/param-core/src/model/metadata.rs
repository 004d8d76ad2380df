//! Metadatos estructurales de un test (entrada del escáner externo).

use super::descriptor::{DataSourceDescriptor, DataSourceLevel};
use super::types::{RuntimeType, TypeExpr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMetadata {
    pub name: String,
    pub ty: TypeExpr,
    /// Último parámetro que acepta una cola variable (`params T[]`).
    pub is_params: bool,
    pub is_optional: bool,
    /// Tipo declarado por una anotación genérica del parámetro (p. ej. una
    /// fuente `Matrix<int>`). Sólo se consulta cuando ninguna fuente del test
    /// está tipada.
    pub type_annotation: Option<RuntimeType>,
}

impl ParameterMetadata {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeExpr>) -> Self {
        Self { name: name.into(),
               ty: ty.into(),
               is_params: false,
               is_optional: false,
               type_annotation: None }
    }

    pub fn annotated(mut self, ty: RuntimeType) -> Self {
        self.type_annotation = Some(ty);
        self
    }

    pub fn params(mut self) -> Self {
        self.is_params = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn is_required(&self) -> bool { !self.is_params && !self.is_optional }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericConstraint {
    ReferenceType,
    ValueType,
    DefaultConstructor,
    Interface(RuntimeType),
    BaseClass(RuntimeType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParameter {
    pub name: String,
    pub constraints: Vec<GenericConstraint>,
}

impl GenericParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               constraints: Vec::new() }
    }

    pub fn constrained(mut self, constraint: GenericConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Propiedad inyectada desde una fuente de datos.
#[derive(Debug, Clone)]
pub struct PropertySource {
    pub name: String,
    pub ty: TypeExpr,
    pub source: DataSourceDescriptor,
}

#[derive(Debug, Clone, Default)]
pub struct ClassMetadata {
    pub name: String,
    pub namespace: Option<String>,
    pub type_parameters: Vec<GenericParameter>,
    pub constructor_parameters: Vec<ParameterMetadata>,
    pub data_sources: Vec<DataSourceDescriptor>,
    pub property_sources: Vec<PropertySource>,
    pub repeat: Option<u32>,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               ..Self::default() }
    }

    pub fn in_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }

    pub fn type_param(mut self, p: GenericParameter) -> Self {
        self.type_parameters.push(p);
        self
    }

    pub fn ctor_param(mut self, p: ParameterMetadata) -> Self {
        self.constructor_parameters.push(p);
        self
    }

    pub fn source(mut self, mut d: DataSourceDescriptor) -> Self {
        d.level = DataSourceLevel::Class;
        self.data_sources.push(d);
        self
    }

    pub fn property(mut self, name: impl Into<String>, ty: impl Into<TypeExpr>, mut source: DataSourceDescriptor) -> Self {
        source.level = DataSourceLevel::Property;
        self.property_sources.push(PropertySource { name: name.into(),
                                                    ty: ty.into(),
                                                    source });
        self
    }

    pub fn repeat(mut self, n: u32) -> Self {
        self.repeat = Some(n);
        self
    }

    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MethodMetadata {
    pub name: String,
    pub type_parameters: Vec<GenericParameter>,
    pub parameters: Vec<ParameterMetadata>,
    pub data_sources: Vec<DataSourceDescriptor>,
    pub repeat: Option<u32>,
}

impl MethodMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               ..Self::default() }
    }

    pub fn type_param(mut self, p: GenericParameter) -> Self {
        self.type_parameters.push(p);
        self
    }

    pub fn param(mut self, p: ParameterMetadata) -> Self {
        self.parameters.push(p);
        self
    }

    pub fn source(mut self, mut d: DataSourceDescriptor) -> Self {
        d.level = DataSourceLevel::Method;
        self.data_sources.push(d);
        self
    }

    pub fn repeat(mut self, n: u32) -> Self {
        self.repeat = Some(n);
        self
    }
}

/// Todo lo que el motor necesita saber de un test.
#[derive(Debug, Clone)]
pub struct TestMetadata {
    pub class: ClassMetadata,
    pub method: MethodMetadata,
    /// Repetición declarada a nivel de ensamblado.
    pub assembly_repeat: Option<u32>,
}

impl TestMetadata {
    pub fn new(class: ClassMetadata, method: MethodMetadata) -> Self {
        Self { class,
               method,
               assembly_repeat: None }
    }

    pub fn with_assembly_repeat(mut self, n: u32) -> Self {
        self.assembly_repeat = Some(n);
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.class.type_parameters.is_empty() || !self.method.type_parameters.is_empty()
    }

    pub fn has_sources(&self) -> bool {
        !self.class.data_sources.is_empty()
        || !self.method.data_sources.is_empty()
        || !self.class.property_sources.is_empty()
    }

    /// Precedencia: método > clase > ensamblado > valor global configurado.
    pub fn repeat_count(&self, global_default: u32) -> u32 {
        self.method
            .repeat
            .or(self.class.repeat)
            .or(self.assembly_repeat)
            .unwrap_or(global_default)
    }

    /// Parámetros destino de un nivel.
    pub fn parameters_for(&self, level: DataSourceLevel) -> &[ParameterMetadata] {
        match level {
            DataSourceLevel::Class => &self.class.constructor_parameters,
            DataSourceLevel::Method | DataSourceLevel::Property => &self.method.parameters,
        }
    }
}

//! Descriptores de fuentes de datos.
//!
//! Un `DataSourceDescriptor` se construye una vez a partir de la salida del
//! escáner externo y no se muta. El tipo de fuente es una variante cerrada:
//! el proveedor de adapters la inspecciona una sola vez al elegir adapter.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::RuntimeType;
use super::value::TestValue;
use crate::source::{AsyncDataGenerator, DataGenerator};

/// Nivel al que aplica una fuente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSourceLevel {
    Class,
    Method,
    Property,
}

/// Referencia a un método que produce datos. `owner = None` significa "la
/// clase que declara el test".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRef {
    pub owner: Option<String>,
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<TestValue>,
}

impl MethodRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { owner: None,
               name: name.into(),
               arguments: Vec::new() }
    }

    pub fn on(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self { owner: Some(owner.into()),
               name: name.into(),
               arguments: Vec::new() }
    }

    pub fn with_arguments(mut self, arguments: Vec<TestValue>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Dueño efectivo: el explícito o, si falta, la clase del test.
    pub fn resolved_owner<'a>(&'a self, declaring_class: &'a str) -> &'a str {
        self.owner.as_deref().unwrap_or(declaring_class)
    }
}

#[derive(Clone)]
pub enum DataSourceKind {
    Literal { values: Vec<TestValue> },
    StaticMethod(MethodRef),
    InstanceMethod(MethodRef),
    SyncGenerator { generator: Arc<dyn DataGenerator>, type_arguments: Vec<RuntimeType> },
    AsyncGenerator { generator: Arc<dyn AsyncDataGenerator>, type_arguments: Vec<RuntimeType> },
    /// Generador sin información de tipos: nunca guía la inferencia genérica.
    UntypedGenerator { generator: Arc<dyn AsyncDataGenerator> },
}

impl DataSourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::StaticMethod(_) => "static-method",
            Self::InstanceMethod(_) => "instance-method",
            Self::SyncGenerator { .. } => "sync-generator",
            Self::AsyncGenerator { .. } => "async-generator",
            Self::UntypedGenerator { .. } => "untyped-generator",
        }
    }

    /// Argumentos de tipo declarados por un generador tipado.
    pub fn type_arguments(&self) -> &[RuntimeType] {
        match self {
            Self::SyncGenerator { type_arguments, .. } | Self::AsyncGenerator { type_arguments, .. } => type_arguments,
            _ => &[],
        }
    }

    /// Fuentes aptas para la inferencia genérica: literales y generadores que
    /// declaran sus argumentos de tipo.
    pub fn is_typed(&self) -> bool {
        match self {
            Self::Literal { .. } => true,
            Self::SyncGenerator { type_arguments, .. } | Self::AsyncGenerator { type_arguments, .. } => {
                !type_arguments.is_empty()
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for DataSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal { values } => f.debug_struct("Literal").field("values", values).finish(),
            Self::StaticMethod(m) => f.debug_tuple("StaticMethod").field(m).finish(),
            Self::InstanceMethod(m) => f.debug_tuple("InstanceMethod").field(m).finish(),
            Self::SyncGenerator { type_arguments, .. } => {
                f.debug_struct("SyncGenerator").field("type_arguments", type_arguments).finish_non_exhaustive()
            }
            Self::AsyncGenerator { type_arguments, .. } => {
                f.debug_struct("AsyncGenerator").field("type_arguments", type_arguments).finish_non_exhaustive()
            }
            Self::UntypedGenerator { .. } => f.debug_struct("UntypedGenerator").finish_non_exhaustive(),
        }
    }
}

/// Fuente declarada, inmutable.
#[derive(Debug, Clone)]
pub struct DataSourceDescriptor {
    pub kind: DataSourceKind,
    pub level: DataSourceLevel,
    /// Nombre visible fijado por la propia fuente (p. ej. `DisplayName` de un
    /// literal).
    pub display_name: Option<String>,
}

impl DataSourceDescriptor {
    pub fn new(level: DataSourceLevel, kind: DataSourceKind) -> Self {
        Self { kind,
               level,
               display_name: None }
    }

    pub fn literal(level: DataSourceLevel, values: Vec<TestValue>) -> Self {
        Self::new(level, DataSourceKind::Literal { values })
    }

    pub fn static_method(level: DataSourceLevel, target: MethodRef) -> Self {
        Self::new(level, DataSourceKind::StaticMethod(target))
    }

    pub fn instance_method(level: DataSourceLevel, target: MethodRef) -> Self {
        Self::new(level, DataSourceKind::InstanceMethod(target))
    }

    pub fn sync_generator(level: DataSourceLevel, generator: Arc<dyn DataGenerator>) -> Self {
        Self::new(level,
                  DataSourceKind::SyncGenerator { generator,
                                                  type_arguments: Vec::new() })
    }

    pub fn async_generator(level: DataSourceLevel, generator: Arc<dyn AsyncDataGenerator>) -> Self {
        Self::new(level,
                  DataSourceKind::AsyncGenerator { generator,
                                                   type_arguments: Vec::new() })
    }

    pub fn untyped_generator(level: DataSourceLevel, generator: Arc<dyn AsyncDataGenerator>) -> Self {
        Self::new(level, DataSourceKind::UntypedGenerator { generator })
    }

    /// Declara los argumentos de tipo de un generador. En otros tipos de
    /// fuente no tiene efecto.
    pub fn with_type_arguments(mut self, types: Vec<RuntimeType>) -> Self {
        match &mut self.kind {
            DataSourceKind::SyncGenerator { type_arguments, .. }
            | DataSourceKind::AsyncGenerator { type_arguments, .. } => *type_arguments = types,
            _ => {}
        }
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

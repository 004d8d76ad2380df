//! Contratos entre el motor y las fuentes de datos.
//!
//! - `DataGenerator` / `AsyncDataGenerator`: rutinas de usuario que producen
//!   filas diferidas (`ValueFactory`).
//! - `DataMethod`: método de datos registrado (estático o de instancia).
//! - `SourceAdapter`: convierte un descriptor en un stream perezoso de filas
//!   ya descompuestas contra los parámetros destino.
//! - `AdapterProvider`: elige el adapter de cada descriptor (única inspección
//!   del tipo de fuente).

use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::errors::DataSourceError;
use crate::model::{ArgumentFactory, DataSourceDescriptor, DataSourceLevel, ParameterMetadata, TestValue, ValueFactory,
                   ValueThunk};
use crate::registry::SourceRegistry;

/// Información que recibe un generador de usuario.
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    pub session_id: Uuid,
    pub class_name: String,
    pub method_name: String,
    pub level: DataSourceLevel,
    pub parameters: Vec<ParameterMetadata>,
    pub cancel: CancellationToken,
}

pub type FactoryIter = Box<dyn Iterator<Item = Result<ValueFactory, DataSourceError>> + Send>;

pub type FactoryStream = BoxStream<'static, Result<ValueFactory, DataSourceError>>;

/// Generador síncrono: la secuencia puede ser infinita; el consumidor decide
/// hasta dónde tira de ella.
pub trait DataGenerator: Send + Sync {
    fn generate(&self, ctx: &GeneratorContext) -> Result<FactoryIter, DataSourceError>;
}

pub trait AsyncDataGenerator: Send + Sync {
    fn generate(&self, ctx: &GeneratorContext) -> FactoryStream;
}

/// Elemento devuelto por un método de datos.
#[derive(Clone)]
pub enum DataItem {
    Value(TestValue),
    /// Valor envuelto en una función: se re-invoca en cada ejecución.
    Deferred(ValueThunk),
}

impl From<TestValue> for DataItem {
    fn from(v: TestValue) -> Self { Self::Value(v) }
}

pub enum MethodReturn {
    /// Retorno no enumerable: exactamente una fila.
    Single(DataItem),
    Iter(Box<dyn Iterator<Item = Result<DataItem, DataSourceError>> + Send>),
    Stream(BoxStream<'static, Result<DataItem, DataSourceError>>),
}

impl MethodReturn {
    /// Enumerable ya materializado.
    pub fn rows(items: Vec<TestValue>) -> Self { Self::Iter(Box::new(items.into_iter().map(|v| Ok(DataItem::Value(v))))) }
}

#[async_trait]
pub trait DataMethod: Send + Sync {
    /// `receiver` es la instancia para métodos de instancia (`None` en
    /// estáticos).
    async fn invoke(&self, receiver: Option<TestValue>, arguments: Vec<TestValue>) -> Result<MethodReturn, DataSourceError>;
}

/// Fila producida por un adapter, ya descompuesta en argumentos. El índice
/// de bucle lo asigna el motor según la posición en el stream.
#[derive(Clone, Default)]
pub struct SourceRow {
    pub factories: Vec<ArgumentFactory>,
    pub display_name: Option<String>,
}

impl SourceRow {
    pub fn new(factories: Vec<ArgumentFactory>) -> Self {
        Self { factories,
               display_name: None }
    }

    /// Fila neutra: la fuente no aporta argumentos.
    pub fn neutral() -> Self { Self::default() }
}

pub type RowStream = BoxStream<'static, Result<SourceRow, DataSourceError>>;

/// Contexto con el que el motor invoca a un adapter.
#[derive(Clone)]
pub struct AdapterContext {
    pub session_id: Uuid,
    pub class_name: String,
    pub method_name: String,
    pub level: DataSourceLevel,
    pub parameters: Vec<ParameterMetadata>,
    pub registry: SourceRegistry,
    pub cancel: CancellationToken,
    /// La fuente es la única del nivel y hay parámetros obligatorios: si no
    /// se encuentra, el error debe propagarse.
    pub sole_source: bool,
}

impl AdapterContext {
    pub fn generator_context(&self) -> GeneratorContext {
        GeneratorContext { session_id: self.session_id,
                           class_name: self.class_name.clone(),
                           method_name: self.method_name.clone(),
                           level: self.level,
                           parameters: self.parameters.clone(),
                           cancel: self.cancel.clone() }
    }
}

pub trait SourceAdapter: Send + Sync {
    fn rows(&self, ctx: AdapterContext) -> RowStream;
}

pub trait AdapterProvider: Send + Sync {
    fn adapter_for(&self, descriptor: &DataSourceDescriptor) -> Box<dyn SourceAdapter>;
}

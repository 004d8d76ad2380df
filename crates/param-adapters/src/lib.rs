//! param-adapters: adapters concretos de fuentes de datos para el motor.
//!
//! Este crate provee:
//! - `LiteralAdapter`: argumentos literales, una única fila.
//! - `MethodAdapter`: métodos de datos registrados (estáticos o de instancia).
//! - `GeneratorAdapter`: generadores síncronos, asíncronos y sin tipo.
//! - `StandardAdapters`: el `AdapterProvider` que elige entre ellos.
//!
//! Nota: el core nunca inspecciona el tipo de fuente. La única decisión por
//! tipo vive en `StandardAdapters::adapter_for`.

pub mod decompose;
pub mod generator;
pub mod literal;
pub mod method;

use param_core::model::{DataSourceDescriptor, DataSourceKind};
use param_core::source::{AdapterProvider, SourceAdapter};

pub use generator::{async_rows, iter_generator, repeat_with, rows, stream_generator, GeneratorAdapter};
pub use literal::LiteralAdapter;
pub use method::{method_fn, FnMethod, MethodAdapter, Receiver};

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAdapters;

impl AdapterProvider for StandardAdapters {
    fn adapter_for(&self, descriptor: &DataSourceDescriptor) -> Box<dyn SourceAdapter> {
        match &descriptor.kind {
            DataSourceKind::Literal { values } => Box::new(LiteralAdapter::new(values.clone())),
            DataSourceKind::StaticMethod(target) => Box::new(MethodAdapter::new(target.clone(), Receiver::Static)),
            DataSourceKind::InstanceMethod(target) => Box::new(MethodAdapter::new(target.clone(), Receiver::Instance)),
            DataSourceKind::SyncGenerator { generator, .. } => Box::new(GeneratorAdapter::sync(generator.clone())),
            DataSourceKind::AsyncGenerator { generator, .. } | DataSourceKind::UntypedGenerator { generator } => {
                Box::new(GeneratorAdapter::asynchronous(generator.clone()))
            }
        }
    }
}

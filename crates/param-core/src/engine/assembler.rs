//! Fases *expand* y *combine* del ensamblador.
//!
//! `Assembler::assemble` produce la lista de borradores (`Draft`) que luego
//! `CombinationStream` re-emite por cada repetición. Cualquier error durante
//! expand/combine descarta los borradores y deja un único borrador fallido;
//! sólo la cancelación sale como `Err`.

use std::sync::Arc;

use futures::StreamExt;
use indexmap::IndexMap;
use log::{debug, warn};
use uuid::Uuid;

use super::{generic_path, sentinel};
use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::errors::DataSourceError;
use crate::model::{ArgumentFactory, DataSourceDescriptor, DataSourceLevel, ParameterMetadata, TestDataCombination,
                   TestMetadata};
use crate::registry::SourceRegistry;
use crate::source::{AdapterContext, AdapterProvider, SourceRow};

/// Borrador previo a la fase de repetición.
#[derive(Debug, Clone)]
pub(crate) enum Draft {
    Ready(TestDataCombination),
    Failed { error: DataSourceError, display_name: String },
}

impl Draft {
    /// Materializa el borrador para una repetición concreta.
    pub(crate) fn emit(&self, repeat_index: u32) -> TestDataCombination {
        match self {
            Self::Ready(c) => c.with_repeat(repeat_index),
            Self::Failed { error, display_name } => {
                TestDataCombination::sentinel(error.clone(), display_name.clone(), repeat_index)
            }
        }
    }
}

/// Fila de un nivel con su procedencia.
#[derive(Clone, Default)]
pub(crate) struct LevelRow {
    pub factories: Vec<ArgumentFactory>,
    pub source_index: usize,
    pub loop_index: usize,
    pub display_name: Option<String>,
}

/// Un nivel sin filas se sustituye por un único marcador neutro para que el
/// producto nunca sea vacío.
pub(crate) fn or_neutral<T: Default>(rows: Vec<T>) -> Vec<T> {
    if rows.is_empty() {
        vec![T::default()]
    } else {
        rows
    }
}

pub(crate) struct Assembler {
    pub metadata: Arc<TestMetadata>,
    pub provider: Arc<dyn AdapterProvider>,
    pub registry: SourceRegistry,
    pub config: EngineConfig,
    pub cancel: CancellationToken,
    pub session_id: Uuid,
}

impl Assembler {
    pub(crate) async fn assemble(&self) -> Result<Vec<Draft>, DataSourceError> {
        self.cancel.check()?;
        let md = &self.metadata;
        if md.is_generic() {
            return generic_path::drafts(self).await;
        }
        if !md.has_sources() {
            debug!("{}.{}: no data sources declared", md.class.name, md.method.name);
            return Ok(vec![Draft::Ready(TestDataCombination::default())]);
        }
        match self.cartesian().await {
            Ok(drafts) => Ok(drafts.into_iter().map(Draft::Ready).collect()),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => Ok(vec![sentinel::data_generation_failure(md, e)]),
        }
    }

    /// Producto clase (exterior) × método (interior) con las propiedades
    /// fusionadas en cada borrador.
    async fn cartesian(&self) -> Result<Vec<TestDataCombination>, DataSourceError> {
        let method_rows = or_neutral(self.expand_level(DataSourceLevel::Method).await?);
        let class_rows = or_neutral(self.expand_level(DataSourceLevel::Class).await?);
        let properties = self.expand_properties().await?;

        let mut drafts = Vec::with_capacity(class_rows.len() * method_rows.len());
        for c in &class_rows {
            for m in &method_rows {
                drafts.push(TestDataCombination { class_data_factories: c.factories.clone(),
                                                  method_data_factories: m.factories.clone(),
                                                  class_data_source_index: c.source_index,
                                                  class_loop_index: c.loop_index,
                                                  method_data_source_index: m.source_index,
                                                  method_loop_index: m.loop_index,
                                                  display_name: c.display_name.clone().or_else(|| m.display_name.clone()),
                                                  property_value_factories: properties.clone(),
                                                  ..TestDataCombination::default() });
            }
        }
        debug!("{}.{}: {} class rows x {} method rows",
               self.metadata.class.name,
               self.metadata.method.name,
               class_rows.len(),
               method_rows.len());
        Ok(drafts)
    }

    pub(crate) fn sources(&self, level: DataSourceLevel) -> &[DataSourceDescriptor] {
        match level {
            DataSourceLevel::Class => &self.metadata.class.data_sources,
            DataSourceLevel::Method => &self.metadata.method.data_sources,
            DataSourceLevel::Property => &[],
        }
    }

    fn context(&self, level: DataSourceLevel, parameters: Vec<ParameterMetadata>, sole_source: bool) -> AdapterContext {
        AdapterContext { session_id: self.session_id,
                         class_name: self.metadata.class.name.clone(),
                         method_name: self.metadata.method.name.clone(),
                         level,
                         parameters,
                         registry: self.registry.clone(),
                         cancel: self.cancel.clone(),
                         sole_source }
    }

    /// Expande todas las fuentes de un nivel. El índice de fuente avanza una
    /// vez por fuente declarada; el de bucle se reinicia en cada fuente.
    pub(crate) async fn expand_level(&self, level: DataSourceLevel) -> Result<Vec<LevelRow>, DataSourceError> {
        let sources = self.sources(level);
        let parameters = self.metadata.parameters_for(level);
        let sole_source = sources.len() == 1 && parameters.iter().any(ParameterMetadata::is_required);

        let mut rows = Vec::new();
        for (source_index, descriptor) in sources.iter().enumerate() {
            let ctx = self.context(level, parameters.to_vec(), sole_source);
            let produced = self.expand_source(descriptor, ctx).await?;
            for (loop_index, row) in produced.into_iter().enumerate() {
                let display_name = row.display_name.or_else(|| descriptor.display_name.clone());
                rows.push(LevelRow { factories: row.factories,
                                     source_index,
                                     loop_index,
                                     display_name });
            }
        }
        Ok(rows)
    }

    /// Drena el stream de un adapter comprobando cancelación y el límite de
    /// filas configurado.
    async fn expand_source(&self, descriptor: &DataSourceDescriptor, ctx: AdapterContext)
                           -> Result<Vec<SourceRow>, DataSourceError> {
        let adapter = self.provider.adapter_for(descriptor);
        let mut stream = adapter.rows(ctx);
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await {
            self.cancel.check()?;
            let row = row?;
            if let Some(limit) = self.config.max_rows_per_source {
                if rows.len() >= limit {
                    return Err(DataSourceError::RowLimitExceeded { limit });
                }
            }
            rows.push(row);
        }
        debug!("{} source ({:?}) produced {} rows", descriptor.kind.name(), descriptor.level, rows.len());
        Ok(rows)
    }

    /// Una factoría por propiedad: el primer argumento de la primera fila de
    /// su fuente. El resto del stream no se consume.
    pub(crate) async fn expand_properties(&self) -> Result<IndexMap<String, ArgumentFactory>, DataSourceError> {
        let mut map = IndexMap::new();
        for prop in &self.metadata.class.property_sources {
            let params = vec![ParameterMetadata::new(prop.name.clone(), prop.ty.clone())];
            let ctx = self.context(DataSourceLevel::Property, params, true);
            let mut stream = self.provider.adapter_for(&prop.source).rows(ctx);
            self.cancel.check()?;
            let first = match stream.next().await {
                Some(row) => row?.factories.into_iter().next(),
                None => None,
            };
            match first {
                Some(f) => {
                    map.insert(prop.name.clone(), f);
                }
                None => warn!("property '{}' of {}: data source produced no value",
                              prop.name,
                              self.metadata.class.name),
            }
        }
        Ok(map)
    }
}

//! Camino genérico del ensamblador.
//!
//! Las filas se muestrean (se invocan sus factorías una vez) para conocer los
//! tipos en tiempo de ejecución; las combinaciones resultantes llevan
//! factorías construidas directamente desde esos valores ya conocidos, junto
//! con el binding resuelto. Un fallo de resolución afecta sólo a su fila.
//!
//! Si ninguna fuente está tipada, el binding sale de las anotaciones de los
//! parámetros y se comparte entre todas las filas; sin anotaciones el test
//! produce un único centinela.

use log::warn;

use super::assembler::{or_neutral, Assembler, Draft, LevelRow};
use super::sentinel;
use crate::constants::{generic_resolution_error_display, GENERIC_INFERENCE_FAILED_DISPLAY, NO_TYPED_ANNOTATIONS_DISPLAY};
use crate::errors::{DataSourceError, GenericResolutionError};
use crate::generics::{GenericTypeResolver, TypedArguments};
use crate::model::factory::{constant, materialize};
use crate::model::{DataSourceLevel, GenericBinding, RuntimeType, TestDataCombination, TestValue};

#[derive(Default)]
struct SampledRow {
    values: Vec<TestValue>,
    declared: Vec<RuntimeType>,
    inferable: bool,
    source_index: usize,
    loop_index: usize,
    display_name: Option<String>,
}

impl SampledRow {
    fn arguments(&self) -> TypedArguments<'_> { TypedArguments::new(&self.values, &self.declared, self.inferable) }
}

pub(crate) async fn drafts(asm: &Assembler) -> Result<Vec<Draft>, DataSourceError> {
    let md = &asm.metadata;
    let mut sources = md.class.data_sources.iter().chain(&md.method.data_sources);
    let binding = if sources.clone().any(|d| d.kind.is_typed()) {
        None
    } else {
        let resolver = GenericTypeResolver::new(md, asm.config.generic_fallback);
        match resolver.resolve_from_annotations() {
            Some(Ok(binding)) => Some(binding),
            Some(Err(e)) => {
                warn!("{}.{}: {e}", md.class.name, md.method.name);
                return Ok(vec![Draft::Failed { display_name: generic_resolution_error_display(&e.to_string()),
                                               error: e.into() }]);
            }
            None if sources.next().is_some() => {
                warn!("{}.{} is generic but none of its sources or parameters is typed", md.class.name, md.method.name);
                return Ok(vec![Draft::Failed { error: GenericResolutionError::NoTypedAnnotations.into(),
                                               display_name: NO_TYPED_ANNOTATIONS_DISPLAY.to_string() }]);
            }
            None => {
                warn!("{}.{} is generic but declares no typed data source", md.class.name, md.method.name);
                return Ok(vec![Draft::Failed { error: GenericResolutionError::NoTypedSource.into(),
                                               display_name: GENERIC_INFERENCE_FAILED_DISPLAY.to_string() }]);
            }
        }
    };
    match resolve_rows(asm, binding.as_ref()).await {
        Ok(drafts) => Ok(drafts),
        Err(e) if e.is_cancelled() => Err(e),
        Err(e) => Ok(vec![sentinel::data_generation_failure(md, e)]),
    }
}

/// Con `annotated` todas las filas comparten ese binding; sin él cada par de
/// filas se resuelve por separado.
async fn resolve_rows(asm: &Assembler, annotated: Option<&GenericBinding>) -> Result<Vec<Draft>, DataSourceError> {
    let class_rows = or_neutral(sample_level(asm, DataSourceLevel::Class).await?);
    let method_rows = or_neutral(sample_level(asm, DataSourceLevel::Method).await?);
    let properties = asm.expand_properties().await?;
    let resolver = GenericTypeResolver::new(&asm.metadata, asm.config.generic_fallback);

    let mut drafts = Vec::with_capacity(class_rows.len() * method_rows.len());
    for c in &class_rows {
        for m in &method_rows {
            let resolved = match annotated {
                Some(binding) => Ok(binding.clone()),
                None => resolver.resolve(c.arguments(), m.arguments()),
            };
            let draft = match resolved {
                Ok(binding) => {
                    Draft::Ready(TestDataCombination { class_data_factories: c.values.iter().cloned().map(constant).collect(),
                                                       method_data_factories: m.values.iter().cloned().map(constant).collect(),
                                                       class_data_source_index: c.source_index,
                                                       class_loop_index: c.loop_index,
                                                       method_data_source_index: m.source_index,
                                                       method_loop_index: m.loop_index,
                                                       display_name: c.display_name.clone().or_else(|| m.display_name.clone()),
                                                       resolved_generic_types: Some(binding),
                                                       property_value_factories: properties.clone(),
                                                       ..TestDataCombination::default() })
                }
                Err(e) => {
                    warn!("{}.{}: {e}", asm.metadata.class.name, asm.metadata.method.name);
                    Draft::Failed { display_name: generic_resolution_error_display(&e.to_string()),
                                    error: e.into() }
                }
            };
            drafts.push(draft);
        }
    }
    Ok(drafts)
}

/// Expande un nivel y evalúa cada fila una vez.
async fn sample_level(asm: &Assembler, level: DataSourceLevel) -> Result<Vec<SampledRow>, DataSourceError> {
    let sources = asm.sources(level);
    let rows: Vec<LevelRow> = asm.expand_level(level).await?;
    let mut sampled = Vec::with_capacity(rows.len());
    for row in rows {
        let kind = &sources[row.source_index].kind;
        sampled.push(SampledRow { values: materialize(&row.factories).await?,
                                  declared: kind.type_arguments().to_vec(),
                                  inferable: kind.is_typed(),
                                  source_index: row.source_index,
                                  loop_index: row.loop_index,
                                  display_name: row.display_name });
    }
    Ok(sampled)
}

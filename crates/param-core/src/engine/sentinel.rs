//! Canal de errores: convierte fallos de generación en centinelas.
//!
//! El fallo se guarda como un único `Draft::Failed`; la fase de repetición lo
//! re-emite una vez por repetición, así un test con repetición R siempre
//! informa R+1 resultados, haya fallado o no la generación de sus datos.

use log::error;

use super::assembler::Draft;
use crate::constants::data_generation_error_display;
use crate::errors::DataSourceError;
use crate::model::TestMetadata;

pub(crate) fn data_generation_failure(metadata: &TestMetadata, error: DataSourceError) -> Draft {
    error!("data generation failed for {}.{}: {error}", metadata.class.name, metadata.method.name);
    Draft::Failed { display_name: data_generation_error_display(&error.to_string()),
                    error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassMetadata, MethodMetadata};

    #[test]
    fn failed_draft_emits_sentinels() {
        let md = TestMetadata::new(ClassMetadata::new("C"), MethodMetadata::new("M"));
        let draft = data_generation_failure(&md, DataSourceError::generation("boom"));
        let emitted: Vec<_> = (0..=2).map(|r| draft.emit(r)).collect();
        assert!(emitted.iter().all(|c| c.is_failed()));
        assert_eq!(emitted.iter().map(|c| c.repeat_index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(emitted[0].display_name.as_deref(), Some("[DATA GENERATION ERROR: boom]"));
        assert_eq!(emitted[2].data_generation_error, Some(DataSourceError::generation("boom")));
    }
}

//! Configuración del motor.
//!
//! El core no lee el entorno: recibe un `EngineConfig` ya construido (el
//! crate fachada lo carga desde variables de entorno).

use serde::{Deserialize, Serialize};

/// Qué hacer con un parámetro de tipo que no se pudo inferir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenericFallback {
    /// Enlaza `object` y continúa (con un `warn!`).
    #[default]
    Placeholder,
    /// La resolución falla con `GenericResolutionError::Unresolved`.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Repetición global (último eslabón de la precedencia).
    pub default_repeat: u32,
    pub generic_fallback: GenericFallback,
    /// Máximo de filas que se aceptan de una sola fuente; `None` = sin límite.
    ///
    /// Las filas de cada fuente se expanden por completo antes de emitir la
    /// primera combinación, así que con `None` un generador infinito deja la
    /// primera llamada a `next` sin terminar hasta que se cancele el token.
    /// Fijar un tope convierte ese caso en un centinela `RowLimitExceeded`.
    pub max_rows_per_source: Option<usize>,
}

//! Constantes del motor de combinaciones.
//!
//! Agrupa los textos que forman parte de la identidad o del nombre visible de
//! un test. Cambiar estos valores altera los ids derivados (ver
//! `engine::identity`), así que deben tratarse como parte del contrato.

/// Versión lógica del motor. Entra en el fingerprint de cada combinación para
/// que un cambio incompatible del ensamblador invalide identidades previas.
pub const ENGINE_VERSION: &str = "P1.0";

/// Sufijo añadido al id de un test cuya generación de datos falló.
pub const DATA_GENERATION_ERROR_SUFFIX: &str = "_DataGenerationError";

/// Nombre visible de los centinelas cuando la inferencia genérica no tiene
/// ninguna fuente tipada con la que trabajar.
pub const GENERIC_INFERENCE_FAILED_DISPLAY: &str = "[GENERIC TYPE INFERENCE FAILED: No typed data sources]";

/// Igual, cuando hay fuentes sin tipo pero ningún parámetro anotado.
pub const NO_TYPED_ANNOTATIONS_DISPLAY: &str = "[GENERIC TYPE INFERENCE FAILED: No typed parameter attributes]";

/// Nombre visible de un centinela de error de generación.
pub fn data_generation_error_display(message: &str) -> String {
    format!("[DATA GENERATION ERROR: {message}]")
}

/// Nombre visible de un centinela de fallo en la resolución genérica.
pub fn generic_resolution_error_display(message: &str) -> String {
    format!("[GENERIC TYPE RESOLUTION ERROR: {message}]")
}

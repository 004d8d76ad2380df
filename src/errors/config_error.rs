use thiserror::Error;

/// Errores al leer la configuración desde el entorno.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Valor numérico inválido en {var}: '{value}'")]
    InvalidNumber { var: String, value: String },
    #[error("Modo de fallback genérico desconocido: '{0}' (se espera 'placeholder' o 'fail')")]
    UnknownFallback(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_number_format() {
        let err = ConfigError::InvalidNumber { var: "PARAMFLOW_DEFAULT_REPEAT".into(),
                                               value: "tres".into() };
        assert_eq!(err.to_string(), "Valor numérico inválido en PARAMFLOW_DEFAULT_REPEAT: 'tres'");
    }

    #[test]
    fn test_unknown_fallback_format() {
        let err = ConfigError::UnknownFallback("guess".into());
        assert_eq!(err.to_string(),
                   "Modo de fallback genérico desconocido: 'guess' (se espera 'placeholder' o 'fail')");
    }
}

//! Forma canónica de la identidad de una combinación (versión del motor, id
//! del test y resumen de índices, binding y error) antes de calcular su
//! fingerprint. Las claves se ordenan para que dos descubrimientos del mismo
//! test den la misma cadena aunque el resumen se construya en otro orden.

use serde_json::Value;
use std::collections::BTreeMap;

/// Serializa sin espacios y con las claves de cada objeto ordenadas.
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let tree: BTreeMap<&String, String> = map.iter().map(|(k, v)| (k, to_canonical_json(v))).collect();
            let items: Vec<String> = tree.into_iter().map(|(k, v)| format!("{}:{}", quote(k), v)).collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

// Serializar un `Value::String` no puede fallar.
fn quote(s: &str) -> String { Value::String(s.to_string()).to_string() }

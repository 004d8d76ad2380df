//! Digest blake3 (hex) con el que `engine::identity` firma cada combinación.

use blake3::Hasher;
use serde_json::Value;

use super::canonical_json::to_canonical_json;

pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Fingerprint de una identidad de combinación ya serializada a JSON.
pub fn hash_value(value: &Value) -> String { hash_str(&to_canonical_json(value)) }

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identity_fingerprint_ignores_key_order() {
        let a = json!({"engine_version": "P1.0", "test_id": "demo.C().0.0.M().0.0.0", "summary": {"repeat_index": 0}});
        let b = json!({"summary": {"repeat_index": 0}, "test_id": "demo.C().0.0.M().0.0.0", "engine_version": "P1.0"});
        assert_eq!(hash_value(&a), hash_value(&b));
        assert_eq!(hash_value(&a).len(), 64);
        assert_ne!(hash_value(&a), hash_value(&json!({"test_id": "demo.C().0.0.M().0.0.1"})));
    }
}

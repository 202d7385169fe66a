//! JSON value helpers: deep merging of opaque objects (`parserOptions`,
//! `settings`) and lenient integer reads

use serde_json::{Map, Number, Value};

/// Merge `layer` into `target`
///
/// Objects merge key by key; any other value (arrays included) replaces the
/// existing one whole.
pub fn merge_json(target: &mut Map<String, Value>, layer: &Map<String, Value>) {
    for (key, incoming) in layer {
        match (target.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_json(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

/// Integer value of `number`, accepting integral floats such as `2.0`
pub(crate) fn integral(number: &Number) -> Option<u64> {
    number.as_u64().or_else(|| {
        let value = number.as_f64()?;
        (value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value)).then_some(value as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_nested_objects_merge() {
        let mut target = object(json!({
            "ecmaVersion": 2018,
            "ecmaFeatures": { "jsx": true, "globalReturn": false }
        }));
        merge_json(
            &mut target,
            &object(json!({ "ecmaFeatures": { "globalReturn": true }, "sourceType": "module" })),
        );

        assert_eq!(
            Value::Object(target),
            json!({
                "ecmaVersion": 2018,
                "ecmaFeatures": { "jsx": true, "globalReturn": true },
                "sourceType": "module"
            })
        );
    }

    #[test]
    fn test_arrays_and_scalars_replace() {
        let mut target = object(json!({ "extensions": [".js"], "project": { "a": 1 } }));
        merge_json(
            &mut target,
            &object(json!({ "extensions": [".ts"], "project": "tsconfig.json" })),
        );
        assert_eq!(
            Value::Object(target),
            json!({ "extensions": [".ts"], "project": "tsconfig.json" })
        );
    }
}

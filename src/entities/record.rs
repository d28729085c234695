//! Chiave dei record
//!
//! Il backend è mongo-like: un documento può esporre `_id`, `id` o entrambi
//! (quando serializza anche i virtuals). Le entità derivano serde con
//! `#[serde(remote = "Self")]` e passano da `record_serde!`, che riduce le due
//! chiavi a un solo `id` prima della decodifica.

use serde_json::Value;

/// Tiene un solo `id`: `_id` ha la precedenza, un `_id` nullo viene ignorato
pub(crate) fn merge_record_id(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };
    match map.remove("_id") {
        Some(Value::Null) | None => {}
        Some(mongo_id) => {
            map.insert("id".to_string(), mongo_id);
        }
    }
}

/// Implementa `Serialize`/`Deserialize` sopra le funzioni generate da
/// `#[serde(remote = "Self")]`
macro_rules! record_serde {
    ($($entity:ty),+ $(,)?) => {$(
        impl ::serde::Serialize for $entity {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                <$entity>::serialize(self, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $entity {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let mut value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                $crate::entities::record::merge_record_id(&mut value);
                <$entity>::deserialize(value).map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    )+};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mongo_id_wins_over_virtual_id() {
        let mut value = json!({"_id": "m1", "id": "virtual"});
        merge_record_id(&mut value);
        assert_eq!(value, json!({"id": "m1"}));
    }

    #[test]
    fn test_plain_id_is_kept() {
        let mut value = json!({"_id": null, "id": "p1"});
        merge_record_id(&mut value);
        assert_eq!(value, json!({"id": "p1"}));
    }
}

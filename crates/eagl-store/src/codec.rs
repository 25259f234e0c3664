//! JSON chain codec.
//!
//! A chain is stored as a pretty-printed JSON array of block objects. The
//! codec is purely structural: it does not look at hashes or links, so a
//! decoded chain must still go through `ChainVerifier::verify` before it is
//! trusted.

use eagl_types::Chain;

use crate::error::{StoreError, StoreResult};

/// Encode a chain as a JSON array.
pub fn serialize(chain: &Chain) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(chain).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a chain from a JSON array.
pub fn deserialize(bytes: &[u8]) -> StoreResult<Chain> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Parse {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{create_genesis, create_next};
    use eagl_crypto::{ChainVerifier, ViolationKind};
    use eagl_types::timestamp;
    use proptest::prelude::*;
    use serde_json::Value;

    fn build_chain(payloads: &[String]) -> Chain {
        let mut chain = Chain::from_blocks(vec![create_genesis("Genesis Block")]);
        for p in payloads {
            let block = create_next(&chain, p).unwrap();
            chain.push(block);
        }
        chain
    }

    /// Change exactly one stored field of the block at `at`.
    fn mutate_field(value: &mut Value, at: usize, field: usize) {
        let block = &mut value[at];
        match field {
            0 => {
                let index = block["index"].as_u64().unwrap();
                block["index"] = Value::from(index + 1);
            }
            1 => {
                let ts = timestamp::parse(block["timestamp"].as_str().unwrap()).unwrap();
                let shifted = ts + chrono::Duration::nanoseconds(1);
                block["timestamp"] = Value::from(timestamp::format(&shifted));
            }
            2 => {
                let data = block["data"].as_str().unwrap().to_string();
                block["data"] = Value::from(format!("{data}!"));
            }
            3 => block["prev_hash"] = Value::from("ab".repeat(32)),
            _ => block["hash"] = Value::from("cd".repeat(32)),
        }
    }

    #[test]
    fn empty_array_decodes_to_empty_chain() {
        let chain = deserialize(b"[]").unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = deserialize(b"{not json").unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let err = deserialize(br#"{"index": 0}"#).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        let err = deserialize(br#"[{"index": "zero"}]"#).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn decoding_does_not_verify() {
        let chain = build_chain(&["a".into()]);
        let mut value: Value = serde_json::from_slice(&serialize(&chain).unwrap()).unwrap();
        value[1]["data"] = Value::from("b");
        let bytes = serde_json::to_vec(&value).unwrap();

        let decoded = deserialize(&bytes).unwrap();
        assert_eq!(decoded.len(), 2);
        let err = ChainVerifier::verify(&decoded).unwrap_err();
        assert_eq!((err.index, err.kind), (1, ViolationKind::BadHash));
    }

    #[test]
    fn output_is_a_json_array_of_blocks() {
        let chain = build_chain(&[]);
        let value: Value = serde_json::from_slice(&serialize(&chain).unwrap()).unwrap();
        assert_eq!(value[0]["index"], 0);
        assert_eq!(value[0]["prev_hash"], "0");
        assert_eq!(value[0]["data"], "Genesis Block");
        assert_eq!(value[0]["hash"].as_str().unwrap().len(), 64);
    }

    proptest! {
        #[test]
        fn serialize_then_deserialize_is_identity(
            payloads in proptest::collection::vec(".*", 0..8)
        ) {
            let chain = build_chain(&payloads);
            let decoded = deserialize(&serialize(&chain).unwrap()).unwrap();
            prop_assert_eq!(&decoded, &chain);
            prop_assert!(ChainVerifier::verify(&decoded).is_ok());
        }

        #[test]
        fn single_field_tamper_is_located(
            payloads in proptest::collection::vec("[a-z]{0,12}", 0..6),
            pick in any::<prop::sample::Index>(),
            field in 0usize..5,
        ) {
            let chain = build_chain(&payloads);
            let at = pick.index(chain.len());
            let mut value: Value = serde_json::from_slice(&serialize(&chain).unwrap()).unwrap();
            mutate_field(&mut value, at, field);

            let reloaded = deserialize(&serde_json::to_vec(&value).unwrap()).unwrap();
            let err = ChainVerifier::verify(&reloaded).unwrap_err();
            prop_assert_eq!(err.index, at as u64);
        }
    }
}

//! Property tests for merge semantics.

#![allow(missing_docs, reason = "test suite")]

use proptest::prelude::*;
use serde_json::Value;
use weft_state::{FieldType, PartialState, StateSchema};

fn any_schema() -> StateSchema {
    StateSchema::builder()
        .field("a", FieldType::Any)
        .field("b", FieldType::Any)
        .field("c", FieldType::Any)
        .field("d", FieldType::Any)
        .build()
        .unwrap()
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn disjoint_merges_commute(va in arb_value(), vb in arb_value(), vc in arb_value()) {
        let schema = any_schema();
        let base = schema.initial_state(PartialState::new()).unwrap();

        let pa = PartialState::new().with("a", va);
        let pb = PartialState::new().with("b", vb).with("c", vc);

        let ab = schema.merge(schema.merge(base.clone(), &pa).unwrap(), &pb).unwrap();
        let ba = schema.merge(schema.merge(base, &pb).unwrap(), &pa).unwrap();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn empty_partial_is_identity(va in arb_value(), vd in arb_value()) {
        let schema = any_schema();
        let state = schema
            .initial_state(PartialState::new().with("a", va).with("d", vd))
            .unwrap();
        let merged = schema.merge(state.clone(), &PartialState::new()).unwrap();
        prop_assert_eq!(state, merged);
    }

    #[test]
    fn merge_never_adds_or_drops_fields(va in arb_value(), vb in arb_value()) {
        let schema = any_schema();
        let state = schema.initial_state(PartialState::new()).unwrap();
        let partial = PartialState::new().with("a", va).with("b", vb);
        let merged = schema.merge(state, &partial).unwrap();
        prop_assert_eq!(merged.len(), schema.len());
    }
}

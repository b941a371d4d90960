#![no_main]
use bson_builder::{Encoder, Node};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(data) {
        let tree = Node::from(json);
        if let Ok(mut enc) = Encoder::from_tree(&tree) {
            let doc = enc.extract().unwrap();
            let len = u32::from_le_bytes([doc[0], doc[1], doc[2], doc[3]]) as usize;
            assert_eq!(len, doc.len());
            assert_eq!(doc[len - 1], 0);
        }
    }
});

//! A minimal BSON reader for checking encoder output. It panics on anything malformed,
//! including a length prefix that doesn't match the span of its container.

#![allow(dead_code)]

use byteorder::{LittleEndian, ReadBytesExt};

#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Double(f64),
    Str(String),
    Doc(Vec<(String, Decoded)>),
    Array(Vec<(String, Decoded)>),
    Binary(u8, Vec<u8>),
    ObjectId([u8; 12]),
    Bool(bool),
    DateTime(i64),
    Null,
    Int32(i32),
    /// Seconds, then increment
    Timestamp(u32, u32),
    Int64(i64),
    Decimal128([u8; 16]),
    MinKey,
    MaxKey,
}

/// Read a complete document, which must span all of `data`.
pub fn read_document(data: &[u8]) -> Vec<(String, Decoded)> {
    let mut cur = data;
    let doc = read_doc(&mut cur);
    assert!(cur.is_empty(), "{} trailing bytes after document", cur.len());
    doc
}

/// Keys of a document, in order.
pub fn keys(doc: &[(String, Decoded)]) -> Vec<&str> {
    doc.iter().map(|(k, _)| k.as_str()).collect()
}

fn read_doc(cur: &mut &[u8]) -> Vec<(String, Decoded)> {
    let data = *cur;
    let mut prefix = data;
    let len = prefix.read_i32::<LittleEndian>().expect("length prefix") as usize;
    assert!(len >= 5, "document length {} is too short", len);
    assert!(len <= data.len(), "document length {} overruns {} bytes", len, data.len());
    let (doc, rest) = data.split_at(len);
    *cur = rest;
    assert_eq!(doc[len - 1], 0, "document isn't null-terminated");

    let mut body = &doc[4..len - 1];
    let mut elems = Vec::new();
    while !body.is_empty() {
        let ty = body.read_u8().unwrap();
        let key = read_cstring(&mut body);
        let value = read_value(ty, &mut body);
        elems.push((key, value));
    }
    elems
}

fn read_cstring(cur: &mut &[u8]) -> String {
    let data = *cur;
    let end = data.iter().position(|&b| b == 0).expect("unterminated key");
    *cur = &data[end + 1..];
    String::from_utf8(data[..end].to_vec()).expect("key isn't UTF-8")
}

fn take<'a>(cur: &mut &'a [u8], n: usize) -> &'a [u8] {
    assert!(cur.len() >= n, "wanted {} bytes, only {} left", n, cur.len());
    let data: &'a [u8] = *cur;
    let (head, rest) = data.split_at(n);
    *cur = rest;
    head
}

fn read_value(ty: u8, cur: &mut &[u8]) -> Decoded {
    match ty {
        0x01 => Decoded::Double(cur.read_f64::<LittleEndian>().unwrap()),
        0x02 => {
            let len = cur.read_i32::<LittleEndian>().unwrap() as usize;
            assert!(len >= 1);
            let bytes = take(cur, len);
            assert_eq!(bytes[len - 1], 0, "string isn't null-terminated");
            Decoded::Str(String::from_utf8(bytes[..len - 1].to_vec()).expect("invalid UTF-8"))
        }
        0x03 => Decoded::Doc(read_doc(cur)),
        0x04 => {
            let elems = read_doc(cur);
            for (i, (k, _)) in elems.iter().enumerate() {
                assert_eq!(k, &i.to_string(), "array keys must be sequential");
            }
            Decoded::Array(elems)
        }
        0x05 => {
            let len = cur.read_i32::<LittleEndian>().unwrap() as usize;
            let subtype = cur.read_u8().unwrap();
            Decoded::Binary(subtype, take(cur, len).to_vec())
        }
        0x07 => {
            let mut oid = [0u8; 12];
            oid.copy_from_slice(take(cur, 12));
            Decoded::ObjectId(oid)
        }
        0x08 => match cur.read_u8().unwrap() {
            0 => Decoded::Bool(false),
            1 => Decoded::Bool(true),
            b => panic!("bad bool byte {}", b),
        },
        0x09 => Decoded::DateTime(cur.read_i64::<LittleEndian>().unwrap()),
        0x0a => Decoded::Null,
        0x10 => Decoded::Int32(cur.read_i32::<LittleEndian>().unwrap()),
        0x11 => {
            let increment = cur.read_u32::<LittleEndian>().unwrap();
            let seconds = cur.read_u32::<LittleEndian>().unwrap();
            Decoded::Timestamp(seconds, increment)
        }
        0x12 => Decoded::Int64(cur.read_i64::<LittleEndian>().unwrap()),
        0x13 => {
            let mut dec = [0u8; 16];
            dec.copy_from_slice(take(cur, 16));
            Decoded::Decimal128(dec)
        }
        0xff => Decoded::MinKey,
        0x7f => Decoded::MaxKey,
        _ => panic!("unknown element type 0x{:02x}", ty),
    }
}

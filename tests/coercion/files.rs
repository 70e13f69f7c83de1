//! Binary and file-like coercion

use crate::common::*;
use schemata::{parse, parse_with, ContentAnalyzer, Document, File, Image, ParseOptions};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

struct FixedAnalyzer {
    calls: AtomicUsize,
}

impl ContentAnalyzer for FixedAnalyzer {
    fn content_type(&self, _content: &[u8]) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        "application/x-fixed".to_string()
    }

    fn thumbnail(&self, content: &[u8]) -> Vec<u8> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        content.iter().take(2).copied().collect()
    }

    fn extract_text(&self, _content: &[u8]) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        "fixed text".to_string()
    }
}

#[test]
fn binary_hex_forms() {
    for text in ["\\xdeadbeef", "\\\\xdeadbeef", "  \\xDEADBEEF "] {
        assert_eq!(
            parse(PrimitiveKind::Binary, &RawValue::from(text)).unwrap(),
            Value::Binary(vec![0xde, 0xad, 0xbe, 0xef]),
            "{}",
            text
        );
    }
    assert_code(parse(PrimitiveKind::Binary, &RawValue::from("deadbeef")), "invalid_binary");
    assert_code(parse(PrimitiveKind::Binary, &RawValue::from("\\xabc")), "invalid_binary");
    let value = parse(PrimitiveKind::Binary, &RawValue::Bytes(vec![1, 2])).unwrap();
    assert_eq!(value.to_string(), "\\x0102");
}

#[test]
fn bytes_become_sniffed_files() {
    match parse(PrimitiveKind::Image, &RawValue::Bytes(PNG.to_vec())).unwrap() {
        Value::Image(image) => {
            assert_eq!(image.content_type(), "image/png");
            assert_eq!(image.content(), PNG);
        }
        other => panic!("unexpected {:?}", other),
    }
    match parse(PrimitiveKind::Audio, &RawValue::Bytes(b"ID3\x04rest".to_vec())).unwrap() {
        Value::Audio(file) => assert_eq!(file.content_type(), "audio/mpeg"),
        other => panic!("unexpected {:?}", other),
    }
    match parse(PrimitiveKind::Document, &RawValue::Bytes(b"<html><p>Hi &amp; bye</p></html>".to_vec())).unwrap() {
        Value::Document(document) => {
            assert_eq!(document.content_type(), "text/html");
            assert_eq!(document.text(), "Hi & bye");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn composite_text_round_trips() {
    let file = File::from_parts(vec![0, 1, 254, 255], "application/octet-stream");
    let value = parse(PrimitiveKind::File, &RawValue::from(file.encode())).unwrap();
    assert_eq!(value, Value::File(file));

    let image = Image::from_parts(PNG.to_vec(), vec![7, 7], "image/png");
    let value = parse(PrimitiveKind::Image, &RawValue::from(image.encode())).unwrap();
    assert_eq!(value, Value::Image(image));

    let document = Document::from_parts(b"%PDF-1.7".to_vec(), "quarterly \"final\", v2", "application/pdf");
    let encoded = document.encode();
    assert!(encoded.contains("\"\"final\"\""), "{}", encoded);
    let value = parse(PrimitiveKind::Document, &RawValue::from(encoded)).unwrap();
    match &value {
        Value::Document(decoded) => assert_eq!(decoded.text(), "quarterly \"final\", v2"),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(value, Value::Document(document));
}

#[test]
fn composite_text_from_database_quoting() {
    let value = parse(PrimitiveKind::Image, &RawValue::from("(\"\\\\x0102\",\"\\\\x01\",image/gif)")).unwrap();
    match value {
        Value::Image(image) => {
            assert_eq!(image.content(), &[1, 2]);
            assert_eq!(image.thumbnail(), &[1]);
            assert_eq!(image.content_type(), "image/gif");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn malformed_composites_are_rejected() {
    assert_code(parse(PrimitiveKind::File, &RawValue::from("(nohex,text/plain)")), "invalid_binary");
    assert_code(parse(PrimitiveKind::Image, &RawValue::from("(\\\\x00,image/png)")), "invalid_binary");
    assert_code(parse(PrimitiveKind::Document, &RawValue::from("(\\\\x00)")), "invalid_binary");
    assert_code(parse(PrimitiveKind::File, &RawValue::Int(3)), "unexpected_value");
}

#[test]
fn json_objects_carry_derived_members() {
    let raw = RawValue::Json(serde_json::json!({
        "content": "AQID",
        "content_type": "image/x-custom",
        "thumbnail": "CQ==",
        "name": "pic.bin"
    }));
    match parse(PrimitiveKind::Image, &raw).unwrap() {
        Value::Image(image) => {
            assert_eq!(image.content(), &[1, 2, 3]);
            assert_eq!(image.thumbnail(), &[9]);
            assert_eq!(image.content_type(), "image/x-custom");
        }
        other => panic!("unexpected {:?}", other),
    }
    let raw = RawValue::Json(serde_json::json!({"content": "not base64!"}));
    assert_code(parse(PrimitiveKind::File, &raw), "invalid_binary");
    let raw = RawValue::Json(serde_json::json!({"content_type": "text/plain"}));
    assert_code(parse(PrimitiveKind::File, &raw), "invalid_binary");
}

#[test]
fn custom_analyzer_runs_lazily_and_once() {
    let analyzer = Arc::new(FixedAnalyzer {
        calls: AtomicUsize::new(0),
    });
    let options = ParseOptions {
        analyzer: analyzer.clone(),
        extract_document_text: true,
    };
    let value = parse_with(PrimitiveKind::Image, &RawValue::Bytes(vec![5, 6, 7]), &options).unwrap();
    assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
    let image = match value {
        Value::Image(image) => image,
        other => panic!("unexpected {:?}", other),
    };
    for _ in 0..3 {
        assert_eq!(image.thumbnail(), &[5, 6]);
        assert_eq!(image.content_type(), "application/x-fixed");
    }
    assert_eq!(analyzer.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn document_text_extraction_can_be_disabled() {
    let options = ParseOptions {
        extract_document_text: false,
        ..ParseOptions::default()
    };
    match parse_with(PrimitiveKind::Document, &RawValue::Bytes(b"plain words".to_vec()), &options).unwrap() {
        Value::Document(document) => assert_eq!(document.text(), ""),
        other => panic!("unexpected {:?}", other),
    }
    match parse(PrimitiveKind::Document, &RawValue::Bytes(b"plain words".to_vec())).unwrap() {
        Value::Document(document) => assert_eq!(document.text(), "plain words"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn wrappers_are_shared_across_threads() {
    let image = Arc::new(Image::new(PNG.to_vec()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let image = Arc::clone(&image);
            std::thread::spawn(move || image.content_type().to_string())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "image/png");
    }
}

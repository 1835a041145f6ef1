#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use proptest::prelude::*;
    use ece_core::keys::{KeyLocator, KeyLookupError, KeyTable};
    use ece_core::stream::{
        decode_bytes, decode_stream, encode_bytes, encode_stream, DecodeKey, DecodeParams, EncodeParams,
        InputSource, OutputSink,
    };
    use ece_core::types::ErrorKind;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn key() -> Vec<u8> {
        vec![0x11u8; 16]
    }

    /// `Write + Send` sink the test can inspect afterwards.
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut inner = self.0.lock().map_err(|_| io::Error::other("poisoned sink"))?;
            inner.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedSink {
        fn contents(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    // --- Parameter validation ---

    #[test]
    fn encode_params_defaults() {
        let p = EncodeParams::default();
        assert_eq!(p.record_size, 4096);
        assert!(p.salt.is_none());
        assert!(p.key_id.is_none());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn encode_params_rejects_bad_values() {
        assert!(EncodeParams::new().with_salt(vec![0u8; 8]).validate().is_err());
        assert!(EncodeParams::new().with_record_size(17).validate().is_err());
        assert!(EncodeParams::new().with_record_size(18).validate().is_ok());
        assert!(EncodeParams::new().with_key_id("x".repeat(256)).validate().is_err());
    }

    // --- Whole-stream API ---

    #[test]
    fn memory_roundtrip_reports_header_and_telemetry() {
        init_tracing();
        let plaintext = b"streaming encrypted content coding".repeat(50);
        let params = EncodeParams::new().with_key_id("k1").with_record_size(100);

        let enc = encode_stream(InputSource::Memory(plaintext.clone()), OutputSink::Memory, &key(), params).unwrap();
        let wire = enc.output.unwrap();
        assert_eq!(enc.header.key_id(), Some("k1"));
        assert_eq!(enc.header.record_size, 100);
        assert_eq!(enc.telemetry.bytes_plaintext, plaintext.len() as u64);
        assert_eq!(enc.telemetry.bytes_wire, wire.len() as u64);
        assert!(enc.telemetry.sanity_check());

        let dec = decode_stream(InputSource::Memory(wire.clone()), OutputSink::Memory, DecodeKey::key(&key()), DecodeParams::default()).unwrap();
        assert_eq!(dec.output.unwrap(), plaintext);
        assert_eq!(dec.header, enc.header);
        assert_eq!(dec.telemetry.records, enc.telemetry.records);
        assert_eq!(dec.telemetry.bytes_wire, wire.len() as u64);
    }

    #[test]
    fn reader_and_writer_endpoints() {
        init_tracing();
        let plaintext = vec![0xC3u8; 10_000];
        let sink = SharedSink::default();

        let report = encode_stream(
            InputSource::Reader(Box::new(io::Cursor::new(plaintext.clone()))),
            OutputSink::Writer(Box::new(sink.clone())),
            &key(),
            EncodeParams::new(),
        )
        .unwrap();
        assert!(report.output.is_none());

        let wire = sink.contents();
        assert_eq!(report.telemetry.bytes_wire, wire.len() as u64);

        let out = SharedSink::default();
        decode_stream(
            InputSource::Reader(Box::new(io::Cursor::new(wire))),
            OutputSink::Writer(Box::new(out.clone())),
            DecodeKey::key(&key()),
            DecodeParams::default(),
        )
        .unwrap();
        assert_eq!(out.contents(), plaintext);
    }

    #[test]
    fn file_endpoints() {
        let dir = std::env::temp_dir().join(format!("ece-core-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let plain_path = dir.join("plain.bin");
        let wire_path = dir.join("wire.bin");
        let back_path = dir.join("back.bin");

        let plaintext: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&plain_path, &plaintext).unwrap();

        encode_stream(InputSource::File(plain_path), OutputSink::File(wire_path.clone()), &key(), EncodeParams::new().with_record_size(512)).unwrap();
        decode_stream(InputSource::File(wire_path), OutputSink::File(back_path.clone()), DecodeKey::key(&key()), DecodeParams::default()).unwrap();

        assert_eq!(std::fs::read(&back_path).unwrap(), plaintext);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_input_file_is_io_error() {
        let err = encode_stream(
            InputSource::File("/nonexistent/ece-core/input".into()),
            OutputSink::Memory,
            &key(),
            EncodeParams::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn decode_failure_surfaces_typed_error() {
        let mut wire = encode_bytes(b"payload", &key(), EncodeParams::new()).unwrap();
        let last = wire.len() - 1;
        wire[last] ^= 0x01;

        let err = decode_stream(InputSource::Memory(wire), OutputSink::Memory, DecodeKey::key(&key()), DecodeParams::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Verification);
    }

    // --- Key table ---

    #[test]
    fn key_table_insert_and_locate() {
        let mut table = KeyTable::new();
        assert!(table.is_empty());

        table.insert("a1", &[7u8; 16]).unwrap();
        table.insert_base64("", "yqdlZ+tYemfogSmv7Ws5PQ==").unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.contains(Some("a1")));
        assert!(table.contains(None));

        assert_eq!(table.locate(Some("a1")).unwrap().as_slice(), &[7u8; 16]);
        assert_eq!(table.locate(None).unwrap().len(), 16);
        assert!(table.locate(Some("zz")).is_none());
    }

    #[test]
    fn key_table_rejects_bad_keys() {
        let mut table = KeyTable::new();
        assert!(matches!(table.insert("k", &[0u8; 32]), Err(KeyLookupError::InvalidLength { len: 32, .. })));
        assert!(matches!(table.insert_base64("k", "not base64!"), Err(KeyLookupError::InvalidEncoding { .. })));
        assert!(table.is_empty());
    }

    #[test]
    fn key_table_debug_lists_ids_only() {
        let mut table = KeyTable::new();
        table.insert("b", &[0xABu8; 16]).unwrap();
        table.insert("a", &[0xABu8; 16]).unwrap();
        let shown = format!("{table:?}");
        assert_eq!(shown, r#"KeyTable { key_ids: ["a", "b"] }"#);
    }

    #[test]
    fn whole_stream_decode_with_key_table() {
        let mut table = KeyTable::new();
        table.insert("tenant-7", &key()).unwrap();

        let params = EncodeParams::new().with_key_id("tenant-7");
        let wire = encode_bytes(b"routed by key id", &key(), params).unwrap();

        let report = decode_stream(InputSource::Memory(wire), OutputSink::Memory, DecodeKey::locator(table), DecodeParams::default()).unwrap();
        assert_eq!(report.output.unwrap(), b"routed by key id");
    }

    // --- Round-trip properties ---

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
            record_size in prop_oneof![18u32..40, 40u32..300, Just(4096u32)],
            key in any::<[u8; 16]>(),
        ) {
            let wire = encode_bytes(&data, &key, EncodeParams::new().with_record_size(record_size)).unwrap();
            prop_assert_eq!(decode_bytes(&wire, &key).unwrap(), data);
        }

        #[test]
        fn prop_exact_multiples_roundtrip(records in 1usize..6, record_size in 18u32..64) {
            let capacity = record_size as usize - 17;
            let data = vec![0x42u8; records * capacity];
            let wire = encode_bytes(&data, &key(), EncodeParams::new().with_record_size(record_size)).unwrap();
            prop_assert_eq!(wire.len(), 21 + records * record_size as usize);
            prop_assert_eq!(decode_bytes(&wire, &key()).unwrap(), data);
        }

        #[test]
        fn prop_any_flip_is_detected(
            data in proptest::collection::vec(any::<u8>(), 1..200),
            pos in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let params = EncodeParams::new().with_record_size(40);
            let mut wire = encode_bytes(&data, &key(), params).unwrap();
            let i = 21 + pos.index(wire.len() - 21);
            wire[i] ^= 1 << bit;
            let err = decode_bytes(&wire, &key()).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::Verification);
        }
    }
}

// Coding header codec: layout, round-trips, truncation and range checks across
//
// * `encode_header`
// * `decode_header`
// * `read_header`

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use proptest::prelude::*;
    use ece_core::constants::{MAX_RECORD_SIZE, MIN_RECORD_SIZE};
    use ece_core::headers::{
        decode_header, encode_header, read_header, CodingHeader, HeaderError, HEADER_FIXED_LEN,
    };

    fn sample_header(key_id: &str) -> CodingHeader {
        CodingHeader::new([7u8; 16], 4096, key_id)
    }

// # ✅ 1. Layout

    #[test]
    fn layout_matches_wire_format() {
        let h = CodingHeader::new([0u8; 16], 21, "a1");
        let wire = encode_header(&h).unwrap();

        assert_eq!(wire.len(), 23);
        assert_eq!(&wire[..16], &[0u8; 16]);
        assert_eq!(&wire[16..20], &[0, 0, 0, 21]);
        assert_eq!(wire[20], 2);
        assert_eq!(&wire[21..], b"a1");
    }

    #[test]
    fn empty_key_id_means_none() {
        let wire = encode_header(&sample_header("")).unwrap();
        assert_eq!(wire.len(), HEADER_FIXED_LEN);

        let (h, used) = decode_header(&wire).unwrap();
        assert_eq!(used, HEADER_FIXED_LEN);
        assert_eq!(h.key_id(), None);
    }

// # ✅ 2. Round-trips

    #[test]
    fn roundtrip_key_id_lengths_0_1_255() {
        for len in [0usize, 1, 255] {
            let h = sample_header(&"k".repeat(len));
            let wire = encode_header(&h).unwrap();
            assert_eq!(wire.len(), 21 + len);

            let (decoded, used) = decode_header(&wire).unwrap();
            assert_eq!(decoded, h);
            assert_eq!(used, wire.len());
        }
    }

    #[test]
    fn multibyte_utf8_key_id_counts_octets() {
        let h = sample_header("clé");
        let wire = encode_header(&h).unwrap();
        assert_eq!(wire[20], 4);
        assert_eq!(decode_header(&wire).unwrap().0.key_id(), Some("clé"));
    }

    #[test]
    fn decode_ignores_following_records() {
        let h = sample_header("a1");
        let mut wire = encode_header(&h).unwrap();
        wire.extend_from_slice(b"record octets");

        let (decoded, used) = decode_header(&wire).unwrap();
        assert_eq!(decoded, h);
        assert_eq!(&wire[used..], b"record octets");
    }

    #[test]
    fn read_header_leaves_source_at_first_record() {
        let h = sample_header("a1");
        let mut wire = encode_header(&h).unwrap();
        wire.extend_from_slice(&[0xEE; 5]);

        let mut cur = Cursor::new(wire);
        assert_eq!(read_header(&mut cur).unwrap(), h);
        assert_eq!(cur.position() as usize, 23);
    }

// # ❌ 3. Malformed input

    #[test]
    fn every_truncation_is_malformed() {
        let wire = encode_header(&sample_header("abc")).unwrap();
        for cut in 0..wire.len() {
            let err = decode_header(&wire[..cut]).unwrap_err();
            assert!(matches!(err, HeaderError::Truncated { .. }), "cut at {cut}: {err:?}");

            let err = read_header(&mut Cursor::new(&wire[..cut])).unwrap_err();
            assert!(matches!(err, HeaderError::Truncated { .. }), "read cut at {cut}: {err:?}");
        }
    }

    #[test]
    fn truncation_names_the_field() {
        let wire = encode_header(&sample_header("abc")).unwrap();
        let field = |cut: usize| match decode_header(&wire[..cut]) {
            Err(HeaderError::Truncated { field, .. }) => field,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(field(3), "salt");
        assert_eq!(field(18), "record size");
        assert_eq!(field(20), "key id length");
        assert_eq!(field(22), "key id");
    }

    #[test]
    fn record_size_above_i32_is_unsupported() {
        let mut wire = encode_header(&sample_header("")).unwrap();
        wire[16..20].copy_from_slice(&(MAX_RECORD_SIZE + 1).to_be_bytes());
        assert!(matches!(
            decode_header(&wire),
            Err(HeaderError::RecordSizeUnsupported { have }) if have == MAX_RECORD_SIZE + 1
        ));
    }

    #[test]
    fn record_size_below_minimum_is_rejected() {
        let mut wire = encode_header(&sample_header("")).unwrap();
        wire[16..20].copy_from_slice(&17u32.to_be_bytes());
        assert!(matches!(decode_header(&wire), Err(HeaderError::RecordSizeTooSmall { have: 17 })));
    }

    #[test]
    fn non_utf8_key_id_is_rejected() {
        let mut wire = encode_header(&sample_header("ab")).unwrap();
        wire[21] = 0xFF;
        assert!(matches!(decode_header(&wire), Err(HeaderError::InvalidKeyId(_))));
        assert!(matches!(read_header(&mut Cursor::new(wire)), Err(HeaderError::InvalidKeyId(_))));
    }

    #[test]
    fn encode_rejects_long_key_id() {
        let h = sample_header(&"x".repeat(256));
        assert!(matches!(encode_header(&h), Err(HeaderError::KeyIdTooLong { len: 256 })));
    }

    #[test]
    fn encode_rejects_record_size_out_of_range() {
        let mut h = sample_header("");
        h.record_size = MIN_RECORD_SIZE - 1;
        assert!(matches!(encode_header(&h), Err(HeaderError::RecordSizeTooSmall { .. })));

        h.record_size = u32::MAX;
        assert!(matches!(encode_header(&h), Err(HeaderError::RecordSizeUnsupported { .. })));
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            salt in any::<[u8; 16]>(),
            record_size in MIN_RECORD_SIZE..=MAX_RECORD_SIZE,
            key_id in "[a-zA-Z0-9_-]{0,255}",
        ) {
            let h = CodingHeader::new(salt, record_size, key_id);
            let wire = encode_header(&h).unwrap();
            prop_assert_eq!(wire.len(), h.encoded_len());

            let (decoded, used) = decode_header(&wire).unwrap();
            prop_assert_eq!(used, wire.len());
            prop_assert_eq!(decoded, h);
        }
    }
}

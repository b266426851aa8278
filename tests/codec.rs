#[cfg(test)]
mod tests {
    use launcher_ping::utils::codec::{
        CodecError, MAX_PACKET_SIZE, PacketDecoder, VAR_INT_MAX_SIZE, build_packet, decode_string,
        decode_var_int, encode_string, encode_var_int, put_var_int, var_int_len,
    };

    use rand::{Rng, distr::Alphanumeric};

    #[test]
    fn var_int_boundaries() {
        assert_eq!(&encode_var_int(0)[..], [0x00]);
        assert_eq!(&encode_var_int(127)[..], [0x7F]);
        assert_eq!(&encode_var_int(128)[..], [0x80, 0x01]);
        assert_eq!(&encode_var_int(25565)[..], [0xDD, 0xC7, 0x01]);
        assert_eq!(&encode_var_int(u32::MAX)[..], [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn var_int_round_trip() {
        let mut rng = rand::rng();

        for n in (0..100_000)
            .map(|_| rng.random_range(0..=i32::MAX as u32))
            .chain([0, 1, 127, 128, 16383, 16384, i32::MAX as u32, u32::MAX])
        {
            let encoded = encode_var_int(n);
            assert!(encoded.len() <= VAR_INT_MAX_SIZE);
            assert_eq!(encoded.len(), var_int_len(n));
            assert_eq!(decode_var_int(&encoded, 0), Ok((n, encoded.len())));
        }
    }

    #[test]
    fn var_int_at_offset() {
        let mut buf = vec![0xAA, 0xBB];
        put_var_int(&mut buf, 300);
        buf.push(0xCC);

        assert_eq!(decode_var_int(&buf, 2), Ok((300, 2)));
    }

    #[test]
    fn var_int_overflow_guard() {
        let six_continuations = [0x80_u8; 6];
        assert_eq!(
            decode_var_int(&six_continuations, 0),
            Err(CodecError::VarIntTooLarge)
        );
        assert_eq!(
            decode_var_int(&six_continuations[..5], 0),
            Err(CodecError::VarIntTooLarge)
        );

        assert_eq!(
            decode_var_int(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F], 0),
            Err(CodecError::VarIntTooLarge)
        );
        assert_eq!(
            decode_var_int(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F], 0),
            Err(CodecError::VarIntTooLarge)
        );
        assert_eq!(
            decode_var_int(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F], 0),
            Ok((u32::MAX, 5))
        );
    }

    #[test]
    fn var_int_incomplete() {
        assert_eq!(decode_var_int(&[], 0), Err(CodecError::Incomplete));
        assert_eq!(decode_var_int(&[0x80, 0x80], 0), Err(CodecError::Incomplete));
        assert_eq!(decode_var_int(&[0x01], 1), Err(CodecError::Incomplete));
        assert_eq!(decode_var_int(&[0x01], 7), Err(CodecError::Incomplete));
    }

    #[test]
    fn string_round_trip() {
        let mut rng = rand::rng();
        let mut inputs = vec![
            String::new(),
            String::from("mc.example.net"),
            String::from("§aGrüße, 世界 🎮"),
        ];
        inputs.extend((0..200).map(|_| {
            (0..rng.random_range(0..300))
                .map(|_| rng.sample(Alphanumeric) as char)
                .collect::<String>()
        }));

        for s in inputs {
            let encoded = encode_string(&s);
            assert_eq!(decode_string(&encoded, 0), Ok((s.clone(), encoded.len())));
        }
    }

    #[test]
    fn string_length_counts_bytes() {
        let encoded = encode_string("é");
        assert_eq!(&encoded[..], [0x02, 0xC3, 0xA9]);
    }

    #[test]
    fn string_errors() {
        assert_eq!(decode_string(&[0x05, b'a', b'b'], 0), Err(CodecError::Incomplete));
        assert_eq!(decode_string(&[0x02, 0xC3, 0x28], 0), Err(CodecError::InvalidUtf8));
        assert_eq!(
            CodecError::Incomplete.within_frame(),
            CodecError::Truncated
        );
        assert_eq!(
            CodecError::InvalidUtf8.within_frame(),
            CodecError::InvalidUtf8
        );
    }

    #[test]
    fn packet_framing() {
        let payload = [0xDE, 0xAD, 0xBE, 0xEF];
        let packet = build_packet(0, &[&payload[..]]);

        let (body_len, len_size) = decode_var_int(&packet, 0).unwrap();
        assert_eq!(body_len as usize, payload.len() + encode_var_int(0).len());
        assert_eq!(packet.len(), len_size + body_len as usize);

        let (id, id_size) = decode_var_int(&packet, len_size).unwrap();
        assert_eq!(id, 0);
        assert_eq!(&packet[len_size + id_size..], payload);
    }

    #[test]
    fn packet_framing_joins_chunks() {
        let packet = build_packet(0x2A, &[&[1, 2][..], &[], &[3]]);
        assert_eq!(&packet[..], [0x04, 0x2A, 1, 2, 3]);

        let empty = build_packet(0, &[]);
        assert_eq!(&empty[..], [0x01, 0x00]);
    }

    #[test]
    fn decoder_waits_for_full_frame() {
        let packet = build_packet(0, &[&encode_string("hello")[..]]);
        let mut decoder = PacketDecoder::new();

        for &byte in &packet[..packet.len() - 1] {
            decoder.queue_slice(&[byte]);
            assert!(decoder.try_next_packet().unwrap().is_none());
        }

        decoder.queue_slice(&packet[packet.len() - 1..]);
        let frame = decoder.try_next_packet().unwrap().unwrap();
        assert_eq!(frame.id, 0);
        assert_eq!(decode_string(&frame.body, 0), Ok((String::from("hello"), 6)));
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn decoder_splits_coalesced_frames() {
        let mut bytes = build_packet(0x01, &[&[9, 9, 9][..]]);
        bytes.extend_from_slice(&build_packet(0x00, &[&encode_string("{}")[..]]));
        bytes.extend_from_slice(&[0x05, 0x00]);

        let mut decoder = PacketDecoder::new();
        decoder.queue_slice(&bytes);

        let first = decoder.try_next_packet().unwrap().unwrap();
        assert_eq!(first.id, 0x01);
        assert_eq!(&first.body[..], [9, 9, 9]);

        let second = decoder.try_next_packet().unwrap().unwrap();
        assert_eq!(second.id, 0x00);

        assert!(decoder.try_next_packet().unwrap().is_none());
        assert_eq!(decoder.buffered(), 2);
    }

    #[test]
    fn decoder_rejects_malformed_frames() {
        let mut decoder = PacketDecoder::new();
        decoder.queue_slice(&[0xFF_u8; 6]);
        assert_eq!(decoder.try_next_packet().unwrap_err(), CodecError::VarIntTooLarge);

        let mut decoder = PacketDecoder::new();
        decoder.queue_slice(&encode_var_int(MAX_PACKET_SIZE + 1));
        assert_eq!(
            decoder.try_next_packet().unwrap_err(),
            CodecError::PacketTooLarge(MAX_PACKET_SIZE + 1)
        );

        let mut decoder = PacketDecoder::new();
        decoder.queue_slice(&[0x00]);
        assert_eq!(decoder.try_next_packet().unwrap_err(), CodecError::Truncated);
    }
}

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Tag byte introducing a data frame.
pub const DATA_TAG: u8 = b's';

/// Tag byte introducing an exit message.
pub const EXIT_TAG: u8 = b'e';

/// Largest value a wire length field (i32) can carry.
pub const MAX_FIELD_LEN: usize = i32::MAX as usize;

/// One inbound control message.
///
/// The protocol defines a single variant: the remote process ended with the
/// given 8-bit exit status. Any other inbound tag is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    Exit(u8),
}

/// Encode the startup parameter list.
///
/// Wire format:
/// ```text
/// ┌────────────┬───────────────────────────────┐
/// │ Count      │ Count times:                  │
/// │ (i32 LE)   │   Len (i32 LE) + Len bytes    │
/// └────────────┴───────────────────────────────┘
/// ```
///
/// Entry order is preserved; the entries are positional arguments to the
/// remote process.
pub fn encode_startup(params: &[String], dst: &mut BytesMut) -> Result<()> {
    if params.len() > MAX_FIELD_LEN {
        return Err(FrameError::PayloadTooLarge {
            size: params.len(),
            max: MAX_FIELD_LEN,
        });
    }

    let mut total = 4;
    for param in params {
        if param.len() > MAX_FIELD_LEN {
            return Err(FrameError::PayloadTooLarge {
                size: param.len(),
                max: MAX_FIELD_LEN,
            });
        }
        total += 4 + param.len();
    }

    dst.reserve(total);
    dst.put_i32_le(params.len() as i32);
    for param in params {
        dst.put_i32_le(param.len() as i32);
        dst.put_slice(param.as_bytes());
    }
    Ok(())
}

/// Encode one data frame: `'s'` + length + chunk bytes.
pub fn encode_data(chunk: &[u8], dst: &mut BytesMut) -> Result<()> {
    if chunk.len() > MAX_FIELD_LEN {
        return Err(FrameError::PayloadTooLarge {
            size: chunk.len(),
            max: MAX_FIELD_LEN,
        });
    }
    dst.reserve(1 + 4 + chunk.len());
    dst.put_u8(DATA_TAG);
    dst.put_i32_le(chunk.len() as i32);
    dst.put_slice(chunk);
    Ok(())
}

/// Encode one exit message: `'e'` + status byte. This is what the agent side
/// sends; the client only ever decodes it.
pub fn encode_exit(code: u8, dst: &mut BytesMut) {
    dst.reserve(2);
    dst.put_u8(EXIT_TAG);
    dst.put_u8(code);
}

/// Decode a startup frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes and yields the entries in order.
pub fn decode_startup(src: &mut BytesMut) -> Result<Option<Vec<Bytes>>> {
    if src.len() < 4 {
        return Ok(None); // Need more data
    }

    let count = i32::from_le_bytes(src[0..4].try_into().unwrap());
    if count < 0 {
        return Err(FrameError::InvalidLength(count));
    }

    // Walk the entries without consuming anything until the frame is whole.
    let mut offset = 4;
    for _ in 0..count {
        if src.len() < offset + 4 {
            return Ok(None);
        }
        let len = i32::from_le_bytes(src[offset..offset + 4].try_into().unwrap());
        if len < 0 {
            return Err(FrameError::InvalidLength(len));
        }
        offset += 4;
        if src.len() < offset + len as usize {
            return Ok(None);
        }
        offset += len as usize;
    }

    src.advance(4);
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let len = i32::from_le_bytes(src[0..4].try_into().unwrap()) as usize;
        src.advance(4);
        entries.push(src.split_to(len).freeze());
    }
    Ok(Some(entries))
}

/// Decode a data frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes and yields the chunk.
pub fn decode_data(src: &mut BytesMut) -> Result<Option<Bytes>> {
    if src.is_empty() {
        return Ok(None);
    }
    if src[0] != DATA_TAG {
        return Err(FrameError::UnexpectedTag(src[0]));
    }
    if src.len() < 5 {
        return Ok(None);
    }

    let len = i32::from_le_bytes(src[1..5].try_into().unwrap());
    if len < 0 {
        return Err(FrameError::InvalidLength(len));
    }

    let total = 5 + len as usize;
    if src.len() < total {
        return Ok(None);
    }

    src.advance(5);
    Ok(Some(src.split_to(len as usize).freeze()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_startup(params: &[&str]) -> Vec<Bytes> {
        let owned: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        let mut buf = BytesMut::new();
        encode_startup(&owned, &mut buf).unwrap();
        let entries = decode_startup(&mut buf).unwrap().unwrap();
        assert!(buf.is_empty());
        entries
    }

    #[test]
    fn startup_roundtrip_empty_list() {
        let entries = roundtrip_startup(&[]);
        assert!(entries.is_empty());
    }

    #[test]
    fn startup_roundtrip_single_entry() {
        let entries = roundtrip_startup(&["run"]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].as_ref(), b"run");
    }

    #[test]
    fn startup_roundtrip_preserves_order() {
        let entries = roundtrip_startup(&["alpha", "beta", "gamma", "delta"]);
        let decoded: Vec<&[u8]> = entries.iter().map(|e| e.as_ref()).collect();
        assert_eq!(
            decoded,
            [
                b"alpha".as_ref(),
                b"beta".as_ref(),
                b"gamma".as_ref(),
                b"delta".as_ref()
            ]
        );
    }

    #[test]
    fn startup_roundtrip_empty_strings() {
        let entries = roundtrip_startup(&["", "x", ""]);
        assert_eq!(entries[0].as_ref(), b"");
        assert_eq!(entries[1].as_ref(), b"x");
        assert_eq!(entries[2].as_ref(), b"");
    }

    #[test]
    fn startup_entries_may_contain_tag_bytes() {
        // Length-prefixed framing must not care about 's' or 'e' in payloads.
        let entries = roundtrip_startup(&["sse", "esse", "s"]);
        assert_eq!(entries[0].as_ref(), b"sse");
        assert_eq!(entries[1].as_ref(), b"esse");
        assert_eq!(entries[2].as_ref(), b"s");
    }

    #[test]
    fn startup_wire_bytes_are_exact() {
        let params = vec!["hello".to_string(), "bye".to_string()];
        let mut buf = BytesMut::new();
        encode_startup(&params, &mut buf).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&2i32.to_le_bytes());
        expected.extend_from_slice(&5i32.to_le_bytes());
        expected.extend_from_slice(b"hello");
        expected.extend_from_slice(&3i32.to_le_bytes());
        expected.extend_from_slice(b"bye");
        assert_eq!(buf.as_ref(), expected.as_slice());
    }

    #[test]
    fn startup_decode_incomplete_returns_none() {
        let params = vec!["hello".to_string(), "bye".to_string()];
        let mut full = BytesMut::new();
        encode_startup(&params, &mut full).unwrap();

        for cut in 0..full.len() {
            let mut partial = BytesMut::from(&full[..cut]);
            assert!(
                decode_startup(&mut partial).unwrap().is_none(),
                "cut at {cut} should be incomplete"
            );
        }
    }

    #[test]
    fn startup_decode_rejects_negative_count() {
        let mut buf = BytesMut::new();
        buf.put_i32_le(-1);
        let err = decode_startup(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::InvalidLength(-1)));
    }

    #[test]
    fn startup_decode_rejects_negative_entry_length() {
        let mut buf = BytesMut::new();
        buf.put_i32_le(1);
        buf.put_i32_le(-7);
        let err = decode_startup(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::InvalidLength(-7)));
    }

    #[test]
    fn data_frame_length_matches_chunk_for_every_size() {
        for size in 1..=1024usize {
            let chunk = vec![0xAB; size];
            let mut buf = BytesMut::new();
            encode_data(&chunk, &mut buf).unwrap();

            assert_eq!(buf[0], DATA_TAG);
            let declared = i32::from_le_bytes(buf[1..5].try_into().unwrap()) as usize;
            assert_eq!(declared, size);
            assert_eq!(buf.len(), 5 + size);
        }
    }

    #[test]
    fn data_roundtrip() {
        let mut buf = BytesMut::new();
        encode_data(b"stdin bytes", &mut buf).unwrap();
        let chunk = decode_data(&mut buf).unwrap().unwrap();
        assert_eq!(chunk.as_ref(), b"stdin bytes");
        assert!(buf.is_empty());
    }

    #[test]
    fn data_decode_incomplete_returns_none() {
        let mut full = BytesMut::new();
        encode_data(b"partial", &mut full).unwrap();

        for cut in 0..full.len() {
            let mut partial = BytesMut::from(&full[..cut]);
            assert!(decode_data(&mut partial).unwrap().is_none());
        }
    }

    #[test]
    fn data_decode_rejects_wrong_tag() {
        let mut buf = BytesMut::from(&b"x\x01\x00\x00\x00y"[..]);
        let err = decode_data(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::UnexpectedTag(b'x')));
    }

    #[test]
    fn multiple_data_frames_decode_in_order() {
        let mut buf = BytesMut::new();
        encode_data(b"first", &mut buf).unwrap();
        encode_data(b"second", &mut buf).unwrap();

        let one = decode_data(&mut buf).unwrap().unwrap();
        let two = decode_data(&mut buf).unwrap().unwrap();
        assert_eq!(one.as_ref(), b"first");
        assert_eq!(two.as_ref(), b"second");
        assert!(buf.is_empty());
    }

    #[test]
    fn exit_message_encodes_tag_and_code() {
        let mut buf = BytesMut::new();
        encode_exit(7, &mut buf);
        assert_eq!(buf.as_ref(), &[EXIT_TAG, 7]);
    }
}

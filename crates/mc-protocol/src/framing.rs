//! Length-prefixed packet frames with optional threshold-based zlib
//! compression (spec §4.5). These functions work on already-buffered bytes;
//! `mc-client::Connection` is responsible for reading the length-prefix
//! `VarInt` and exactly that many bytes off the socket before calling
//! [`decode_frame`], and for writing [`encode_frame`]'s output to the socket.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::FramingError;
use crate::varint::{read_varint, varint_len, write_varint};

/// A non-compressed frame body (or, with compression enabled, the raw frame
/// bytes after the length prefix) may not exceed this many bytes.
pub const MAX_FRAME_LEN: i32 = 2_097_151; // 2^21 - 1

/// An uncompressed serverbound packet body may not exceed this many bytes.
pub const MAX_SERVERBOUND_BODY: i32 = 8_388_608;

/// Encode `body` (packet id `VarInt` followed by its payload) into a
/// complete wire frame, applying zlib compression when `threshold` is set
/// and `body` is at least that long.
pub fn encode_frame(body: &[u8], threshold: Option<i32>) -> Result<Vec<u8>, FramingError> {
    let Some(threshold) = threshold else {
        let mut out = Vec::with_capacity(varint_len(body.len() as i32) + body.len());
        write_varint(&mut out, body.len() as i32)?;
        out.extend_from_slice(body);
        return Ok(out);
    };

    if (body.len() as i64) < i64::from(threshold) {
        // data_length == 0 marks an uncompressed body.
        let mut out = Vec::with_capacity(1 + varint_len(body.len() as i32 + 1) + body.len());
        write_varint(&mut out, body.len() as i32 + 1)?;
        write_varint(&mut out, 0)?;
        out.extend_from_slice(body);
        Ok(out)
    } else {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body)?;
        let compressed = encoder.finish()?;

        let data_len_varint_len = varint_len(body.len() as i32);
        let frame_len = data_len_varint_len + compressed.len();

        let mut out = Vec::with_capacity(varint_len(frame_len as i32) + frame_len);
        write_varint(&mut out, frame_len as i32)?;
        write_varint(&mut out, body.len() as i32)?;
        out.extend_from_slice(&compressed);
        Ok(out)
    }
}

/// Recover a packet body from the bytes of one frame — everything after the
/// outer length-prefix `VarInt` has already been stripped by the caller.
/// `compression_enabled` must reflect the connection's current compression
/// state at the time this frame was read.
pub fn decode_frame(frame: &[u8], compression_enabled: bool) -> Result<Vec<u8>, FramingError> {
    if !compression_enabled {
        return Ok(frame.to_vec());
    }

    let mut cursor = std::io::Cursor::new(frame);
    let data_length = read_varint(&mut cursor)?;
    let rest = &frame[cursor.position() as usize..];

    if data_length == 0 {
        Ok(rest.to_vec())
    } else {
        check_serverbound_body_len(data_length)?;

        let mut decoder = ZlibDecoder::new(rest);
        let mut decompressed = Vec::with_capacity(data_length.max(0) as usize);
        decoder.read_to_end(&mut decompressed)?;

        if decompressed.len() as i64 != i64::from(data_length) {
            return Err(FramingError::InflateMismatch {
                expected: data_length,
                actual: decompressed.len(),
            });
        }
        Ok(decompressed)
    }
}

/// Validate a frame's declared length against [`MAX_FRAME_LEN`].
pub fn check_frame_len(len: i32) -> Result<(), FramingError> {
    if len > MAX_FRAME_LEN {
        Err(FramingError::OversizeFrame(len))
    } else {
        Ok(())
    }
}

/// Validate an uncompressed serverbound body length against
/// [`MAX_SERVERBOUND_BODY`].
pub fn check_serverbound_body_len(len: i32) -> Result<(), FramingError> {
    if len > MAX_SERVERBOUND_BODY {
        Err(FramingError::OversizeBody(len))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_len(bytes: &[u8]) -> (i32, usize) {
        let mut cursor = std::io::Cursor::new(bytes);
        let len = read_varint(&mut cursor).unwrap();
        (len, cursor.position() as usize)
    }

    #[test]
    fn frame_round_trip_across_thresholds() {
        for len in [0usize, 1, 1024] {
            let body: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
            for threshold in [None, Some(-1), Some(0), Some(1), Some(len as i32), Some(len as i32 + 1), Some(1024)]
            {
                let threshold = threshold.filter(|t| *t >= 0);
                let frame = encode_frame(&body, threshold).unwrap();
                let (frame_len, header_len) = read_len(&frame);
                let frame_body = &frame[header_len..];
                assert_eq!(frame_len as usize, frame_body.len());
                let decoded = decode_frame(frame_body, threshold.is_some()).unwrap();
                assert_eq!(decoded, body);
            }
        }
    }

    #[test]
    fn uncompressed_small_frame_matches_spec_example() {
        let payload = vec![7u8; 10];
        let frame = encode_frame(&payload, Some(256)).unwrap();
        // VarInt(11) ++ VarInt(0) ++ P
        assert_eq!(frame[0], 11);
        assert_eq!(frame[1], 0);
        assert_eq!(&frame[2..], payload.as_slice());
    }

    #[test]
    fn compressed_frame_matches_spec_shape() {
        let payload = vec![7u8; 10];
        let frame = encode_frame(&payload, Some(4)).unwrap();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload).unwrap();
        let compressed = encoder.finish().unwrap();

        let expected_len = varint_len(10) + compressed.len();
        let (frame_len, header_len) = read_len(&frame);
        assert_eq!(frame_len as usize, expected_len);
        let (data_len, data_header_len) = read_len(&frame[header_len..]);
        assert_eq!(data_len, 10);
        assert_eq!(&frame[header_len + data_header_len..], compressed.as_slice());
    }

    #[test]
    fn inflate_mismatch_is_detected() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hello").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut frame = Vec::new();
        write_varint(&mut frame, 999).unwrap();
        frame.extend_from_slice(&compressed);

        assert!(matches!(
            decode_frame(&frame, true),
            Err(FramingError::InflateMismatch { .. })
        ));
    }

    #[test]
    fn oversize_frame_is_rejected() {
        assert!(check_frame_len(MAX_FRAME_LEN + 1).is_err());
        assert!(check_frame_len(MAX_FRAME_LEN).is_ok());
    }

    #[test]
    fn oversize_body_is_rejected_on_decode() {
        let mut frame = Vec::new();
        write_varint(&mut frame, MAX_SERVERBOUND_BODY + 1).unwrap();

        assert!(matches!(
            decode_frame(&frame, true),
            Err(FramingError::OversizeBody(len)) if len == MAX_SERVERBOUND_BODY + 1
        ));
    }
}

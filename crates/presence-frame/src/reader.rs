use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::codec::{decode_header, decode_payload, Frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Read the next complete frame (blocking).
///
/// The header and payload are each read to their exact size, accumulating
/// across as many short reads as the stream hands back. Never reads past the
/// end of the frame.
///
/// Returns `Err(FrameError::ConnectionClosed)` if EOF arrives first.
pub fn read_frame<R: Read + ?Sized>(reader: &mut R, config: &FrameConfig) -> Result<Frame> {
    let mut header = [0u8; HEADER_SIZE];
    read_exact_or_closed(reader, &mut header)?;
    let (opcode, len) = decode_header(&header)?;

    if len > config.max_payload_size {
        return Err(FrameError::PayloadTooLarge {
            size: len,
            max: config.max_payload_size,
        });
    }

    let mut payload = vec![0u8; len];
    read_exact_or_closed(reader, &mut payload)?;
    trace!(%opcode, len, "read frame");

    let payload = decode_payload(&payload)?;
    Ok(Frame { opcode, payload })
}

/// Fill `buf` completely. A short read is not an error; a zero-byte read is.
fn read_exact_or_closed<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(FrameError::ConnectionClosed {
                    expected: buf.len(),
                    received: filled,
                })
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;

    use bytes::BytesMut;
    use serde_json::json;

    use super::*;
    use crate::codec::encode_frame;
    use crate::opcode::Opcode;

    fn wire(opcode: Opcode, value: &serde_json::Value) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(opcode, value, &mut buf).unwrap();
        buf.to_vec()
    }

    /// Hands out the wire bytes in a fixed sequence of chunk sizes.
    struct ChunkedReader {
        bytes: Vec<u8>,
        pos: usize,
        chunks: VecDeque<usize>,
        reads: usize,
    }

    impl ChunkedReader {
        fn new(bytes: Vec<u8>, chunks: &[usize]) -> Self {
            Self {
                bytes,
                pos: 0,
                chunks: chunks.iter().copied().collect(),
                reads: 0,
            }
        }
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.reads += 1;
            let remaining = self.bytes.len() - self.pos;
            let want = self.chunks.pop_front().unwrap_or(remaining);
            let n = want.min(remaining).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn read_single_frame() {
        let value = json!({"cmd": "DISPATCH", "evt": "READY"});
        let mut cursor = Cursor::new(wire(Opcode::Message, &value));

        let frame = read_frame(&mut cursor, &FrameConfig::default()).unwrap();
        assert_eq!(frame.opcode, Opcode::Message);
        assert_eq!(frame.payload, value);
    }

    #[test]
    fn fragmented_header_decodes_identically() {
        let value = json!({"cmd": "DISPATCH", "evt": "READY", "data": {"v": 1}});
        let bytes = wire(Opcode::Message, &value);

        let whole = read_frame(&mut Cursor::new(bytes.clone()), &FrameConfig::default()).unwrap();

        let mut fragmented = ChunkedReader::new(bytes, &[3, 2, 3]);
        let split = read_frame(&mut fragmented, &FrameConfig::default()).unwrap();

        assert_eq!(split, whole);
        assert!(fragmented.reads >= 4);
    }

    #[test]
    fn byte_by_byte_payload() {
        let value = json!({"data": {"message": "slow"}});
        let bytes = wire(Opcode::Message, &value);
        let chunks = vec![1; bytes.len()];
        let mut reader = ChunkedReader::new(bytes, &chunks);

        let frame = read_frame(&mut reader, &FrameConfig::default()).unwrap();
        assert_eq!(frame.payload, value);
    }

    #[test]
    fn does_not_consume_following_frame() {
        let mut bytes = wire(Opcode::Message, &json!({"n": 1}));
        bytes.extend(wire(Opcode::Close, &json!({"n": 2})));
        let mut cursor = Cursor::new(bytes);

        let first = read_frame(&mut cursor, &FrameConfig::default()).unwrap();
        let second = read_frame(&mut cursor, &FrameConfig::default()).unwrap();
        assert_eq!(first.payload, json!({"n": 1}));
        assert_eq!(second.opcode, Opcode::Close);
        assert_eq!(second.payload, json!({"n": 2}));
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let err = read_frame(&mut cursor, &FrameConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ConnectionClosed {
                expected: 8,
                received: 0
            }
        ));
    }

    #[test]
    fn connection_closed_mid_header() {
        let bytes = wire(Opcode::Message, &json!({}));
        let mut cursor = Cursor::new(bytes[..5].to_vec());
        let err = read_frame(&mut cursor, &FrameConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ConnectionClosed {
                expected: 8,
                received: 5
            }
        ));
    }

    #[test]
    fn connection_closed_mid_payload() {
        let bytes = wire(Opcode::Message, &json!({"message": "truncated"}));
        let cut = HEADER_SIZE + 4;
        let mut reader = ChunkedReader::new(bytes[..cut].to_vec(), &[3, 5, 2]);
        let err = read_frame(&mut reader, &FrameConfig::default()).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed { received: 4, .. }));
    }

    #[test]
    fn unknown_opcode_in_stream() {
        let mut bytes = vec![9, 0, 0, 0, 2, 0, 0, 0];
        bytes.extend_from_slice(b"{}");
        let err = read_frame(&mut Cursor::new(bytes), &FrameConfig::default()).unwrap_err();
        assert!(matches!(err, FrameError::UnknownOpcode(9)));
    }

    #[test]
    fn oversized_frame_in_stream() {
        let mut bytes = vec![1, 0, 0, 0];
        bytes.extend_from_slice(&1024u32.to_le_bytes());

        let cfg = FrameConfig {
            max_payload_size: 16,
        };
        let err = read_frame(&mut Cursor::new(bytes), &cfg).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 1024, max: 16 }));
    }

    #[test]
    fn interrupted_read_retries() {
        let bytes = wire(Opcode::Message, &json!({"ok": true}));
        let mut reader = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(bytes),
        };
        let frame = read_frame(&mut reader, &FrameConfig::default()).unwrap();
        assert_eq!(frame.payload, json!({"ok": true}));
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn other_io_errors_propagate() {
        let err = read_frame(&mut BrokenReader, &FrameConfig::default()).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::ConnectionReset));
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::ConnectionReset))
        }
    }
}

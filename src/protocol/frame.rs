//! Length-prefixed message framing over a byte-stream transport.
//!
//! A stream transport may split or merge writes arbitrarily, so a single
//! `read` is never trusted to return one logical message. Every message is
//! framed as `<4-byte big-endian length N><N raw bytes>`; the reader first
//! collects exactly the prefix, then exactly the payload, looping over
//! partial reads (`read_exact`/`write_all` perform the loop). The declared
//! length is checked against a caller-supplied maximum before any payload
//! byte is read or allocated.

use std::io::{Read, Write};

use thiserror::Error;

use crate::domain::params::LEN_PREFIX_LEN;

#[derive(Debug, Error)]
pub enum FrameError {
    /// Underlying read/write failed, timed out, or the peer closed the
    /// connection (short read surfaces as `UnexpectedEof`).
    #[error("transport i/o failure: {0}")]
    Io(#[from] std::io::Error),
    /// Peer declared (or caller supplied) a payload larger than the cap.
    #[error("frame length {declared} exceeds maximum {max}")]
    TooLarge { declared: usize, max: usize },
}

/// Write one framed message: length prefix, then payload, flushed.
///
/// # Errors
/// `FrameError::TooLarge` if `payload` exceeds `max_len` (nothing is
/// written), `FrameError::Io` if the transport fails mid-write.
pub fn write_frame<W: Write>(w: &mut W, payload: &[u8], max_len: usize) -> Result<(), FrameError> {
    if payload.len() > max_len {
        return Err(FrameError::TooLarge {
            declared: payload.len(),
            max: max_len,
        });
    }
    let len = u32::try_from(payload.len()).map_err(|_| FrameError::TooLarge {
        declared: payload.len(),
        max: max_len,
    })?;
    w.write_all(&len.to_be_bytes())?;
    w.write_all(payload)?;
    w.flush()?;
    Ok(())
}

/// Read one framed message, whole or not at all.
///
/// # Errors
/// `FrameError::TooLarge` if the declared length exceeds `max_len` (checked
/// before allocating or reading the payload), `FrameError::Io` on transport
/// failure or a connection closed mid-frame.
pub fn read_frame<R: Read>(r: &mut R, max_len: usize) -> Result<Vec<u8>, FrameError> {
    let mut prefix = [0u8; LEN_PREFIX_LEN];
    r.read_exact(&mut prefix)?;
    let declared = u32::from_be_bytes(prefix) as usize;
    if declared > max_len {
        return Err(FrameError::TooLarge {
            declared,
            max: max_len,
        });
    }
    let mut payload = vec![0u8; declared];
    r.read_exact(&mut payload)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::params::MAX_FRAME_LEN;
    use std::io::Cursor;

    /// Reader that hands out at most `chunk` bytes per `read` call,
    /// simulating a fragmenting stream transport.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf
                .len()
                .min(self.chunk)
                .min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn round_trip() {
        let payload = b"challenge-response".to_vec();
        let mut wire = Vec::new();
        write_frame(&mut wire, &payload, MAX_FRAME_LEN).unwrap();
        assert_eq!(wire.len(), LEN_PREFIX_LEN + payload.len());

        let got = read_frame(&mut Cursor::new(wire), MAX_FRAME_LEN).unwrap();
        assert_eq!(got, payload);
    }

    #[test]
    fn round_trip_empty_payload() {
        let mut wire = Vec::new();
        write_frame(&mut wire, b"", MAX_FRAME_LEN).unwrap();
        let got = read_frame(&mut Cursor::new(wire), MAX_FRAME_LEN).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn survives_single_byte_reads() {
        let payload: Vec<u8> = (0..=255u8).collect();
        let mut wire = Vec::new();
        write_frame(&mut wire, &payload, MAX_FRAME_LEN).unwrap();

        for chunk in [1usize, 2, 3, 7] {
            let mut r = Trickle {
                data: wire.clone(),
                pos: 0,
                chunk,
            };
            let got = read_frame(&mut r, MAX_FRAME_LEN).unwrap();
            assert_eq!(got, payload, "chunk size {chunk}");
        }
    }

    #[test]
    fn two_frames_back_to_back_stay_separate() {
        let mut wire = Vec::new();
        write_frame(&mut wire, b"first", MAX_FRAME_LEN).unwrap();
        write_frame(&mut wire, b"second", MAX_FRAME_LEN).unwrap();

        let mut cur = Cursor::new(wire);
        assert_eq!(read_frame(&mut cur, MAX_FRAME_LEN).unwrap(), b"first");
        assert_eq!(read_frame(&mut cur, MAX_FRAME_LEN).unwrap(), b"second");
    }

    #[test]
    fn oversized_declared_length_rejected_before_payload_read() {
        // Wire carries only the header; were the payload read attempted the
        // error would be Io(UnexpectedEof) instead of TooLarge.
        let header = u32::try_from(MAX_FRAME_LEN + 1).unwrap().to_be_bytes();
        let err = read_frame(&mut Cursor::new(header.to_vec()), MAX_FRAME_LEN).unwrap_err();
        match err {
            FrameError::TooLarge { declared, max } => {
                assert_eq!(declared, MAX_FRAME_LEN + 1);
                assert_eq!(max, MAX_FRAME_LEN);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn hostile_huge_length_rejected_without_allocation() {
        let header = u32::MAX.to_be_bytes();
        let err = read_frame(&mut Cursor::new(header.to_vec()), MAX_FRAME_LEN).unwrap_err();
        assert!(matches!(err, FrameError::TooLarge { .. }));
    }

    #[test]
    fn closed_before_header_is_io_error() {
        let err = read_frame(&mut Cursor::new(Vec::new()), MAX_FRAME_LEN).unwrap_err();
        match err {
            FrameError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn closed_mid_payload_is_io_error() {
        let mut wire = Vec::new();
        write_frame(&mut wire, b"truncate me", MAX_FRAME_LEN).unwrap();
        wire.truncate(LEN_PREFIX_LEN + 4);
        let err = read_frame(&mut Cursor::new(wire), MAX_FRAME_LEN).unwrap_err();
        match err {
            FrameError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn write_refuses_oversized_payload() {
        let mut wire = Vec::new();
        let payload = vec![0u8; MAX_FRAME_LEN + 1];
        let err = write_frame(&mut wire, &payload, MAX_FRAME_LEN).unwrap_err();
        assert!(matches!(err, FrameError::TooLarge { .. }));
        assert!(wire.is_empty(), "nothing may reach the wire");
    }
}

//! Payload codec hook.
//!
//! When compression is enabled the store passes every payload through a
//! codec on its way in and out. The default codec returns payloads unchanged.

/// Encode/decode strategy applied to payloads.
pub trait PayloadCodec<T>: Send + Sync {
    fn compress(&self, data: T) -> T;
    fn decompress(&self, data: T) -> T;
}

/// Identity codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughCodec;

impl<T> PayloadCodec<T> for PassthroughCodec {
    fn compress(&self, data: T) -> T {
        data
    }

    fn decompress(&self, data: T) -> T {
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_is_identity() {
        let codec = PassthroughCodec;
        let payload = vec![1u8, 2, 3];
        let stored = codec.compress(payload.clone());
        assert_eq!(stored, payload);
        assert_eq!(codec.decompress(stored), payload);
    }
}

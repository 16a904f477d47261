//! zlib compression of encoded output

use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Compress bytes with zlib at the default level
pub fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::ZlibDecoder;

    use super::*;

    #[test]
    fn test_zlib_roundtrip() {
        let data = b"return {\n{\n\t\"id\",\n},\n}".repeat(20);
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len());

        let mut decoded = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_zlib_header() {
        let compressed = compress(b"x").unwrap();
        assert_eq!(compressed[0], 0x78);
    }
}

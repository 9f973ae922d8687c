//! Response compression.

use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::SizeAbove;

/// Bodies smaller than this go out uncompressed.
pub const MIN_COMPRESS_BYTES: u16 = 1024;

/// Gzip layer for notification listings; small acks and counts are skipped.
pub fn build_compression_layer() -> CompressionLayer<SizeAbove> {
    CompressionLayer::new()
        .gzip(true)
        .compress_when(SizeAbove::new(MIN_COMPRESS_BYTES))
}

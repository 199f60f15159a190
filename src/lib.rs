/*! Two independent text compressors for side-by-side comparison: a Huffman
coder built on a binary min-heap, and a brute-force sliding-window LZ77 coder.

The `codec` module holds the text-level entry points; the `huffman` and `lz77`
modules work over any hashable symbol type.
*/

pub mod codec;
pub mod huff_tree;
pub mod huffman;
pub mod lz77;
pub mod min_heap;
pub mod report;
pub mod sliding_window;

pub use codec::{
  huffman_compress, huffman_decompress, lz77_compress, lz77_decompress, CodecError, CodecOptions,
  HuffmanOutput,
};
pub use report::CompressionReport;

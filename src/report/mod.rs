/*! Size comparison between the raw input and the output of each pipeline.

Sizes are conceptual bit counts: each input character and each LZ77 token is
charged `BITS_PER_SYMBOL` bits, while Huffman output is charged one bit per
character of its rendered form.
*/

use std::fmt;

use serde::Serialize;

use crate::codec::{self, CodecError, CodecOptions, HuffmanOutput};
use crate::lz77::TokenStream;

pub const BITS_PER_SYMBOL: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionReport {
  pub original_bits: usize,
  pub huffman_bits: usize,
  pub lz77_bits: usize,
  pub lz77_tokens: usize,
  pub lz77_matches: usize,
  pub distinct_symbols: usize,
  pub huffman_ratio: f64,
  pub lz77_ratio: f64,
  pub huffman_round_trip: bool,
  pub lz77_round_trip: bool,
}

/// Percentage of `original` saved by shrinking it to `compressed`. Negative
/// when the output is larger than the input.
pub fn savings_percent(original: usize, compressed: usize) -> f64 {
  if original == 0 {
    return 0.0;
  }
  (original as f64 - compressed as f64) / original as f64 * 100.0
}

impl CompressionReport {
  /// Run both pipelines over `text` and record their sizes and whether each
  /// one reproduced the input.
  pub fn from_text(text: &str, opts: &CodecOptions) -> Result<Self, CodecError> {
    let huff = codec::huffman_compress(text, opts)?;
    let tokens = codec::lz77_compress(text, opts)?;
    Ok(Self::from_outputs(text, &huff, &tokens, opts))
  }

  /// Build a report from outputs that were already produced for `text`.
  pub fn from_outputs(
    text: &str,
    huff: &HuffmanOutput,
    tokens: &TokenStream<char>,
    opts: &CodecOptions,
  ) -> Self {
    let original_bits = text.chars().count() * BITS_PER_SYMBOL;

    let huffman_bits = huff.encoded.chars().count();
    let huffman_round_trip =
      codec::huffman_decompress(&huff.encoded, &huff.codes, opts).map_or(false, |d| d == text);

    let lz77_bits = tokens.len() * BITS_PER_SYMBOL;
    let lz77_round_trip = codec::lz77_decompress(tokens).map_or(false, |d| d == text);

    if !huffman_round_trip || !lz77_round_trip {
      log::warn!(
        "Round trip failed (huffman: {}, lz77: {})",
        huffman_round_trip,
        lz77_round_trip
      );
    }

    Self {
      original_bits,
      huffman_bits,
      lz77_bits,
      lz77_tokens: tokens.len(),
      lz77_matches: tokens.num_matches(),
      distinct_symbols: huff.codes.len(),
      huffman_ratio: savings_percent(original_bits, huffman_bits),
      lz77_ratio: savings_percent(original_bits, lz77_bits),
      huffman_round_trip,
      lz77_round_trip,
    }
  }
}

fn verdict(ok: bool) -> &'static str {
  if ok {
    "Successful"
  } else {
    "Failed"
  }
}

impl fmt::Display for CompressionReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Compression Results:")?;
    writeln!(f, "  Original Size: {} bits", self.original_bits)?;
    writeln!(f, "  Huffman Compressed Size: {} bits", self.huffman_bits)?;
    writeln!(f, "  Huffman Compression Ratio: {:.2}%", self.huffman_ratio)?;
    writeln!(
      f,
      "  LZ77 Compressed Size: {} bits ({} tokens, {} matches)",
      self.lz77_bits, self.lz77_tokens, self.lz77_matches
    )?;
    writeln!(f, "  LZ77 Compression Ratio: {:.2}%", self.lz77_ratio)?;
    writeln!(f, "  Huffman Decompression Check: {}", verdict(self.huffman_round_trip))?;
    write!(f, "  LZ77 Decompression Check: {}", verdict(self.lz77_round_trip))
  }
}

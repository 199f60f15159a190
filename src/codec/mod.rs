/*! Text-level entry points for both compression pipelines.

Huffman output is rendered as a string of `0` and `1` characters interleaved
with the pass-through character, and parsed back from the same form.
*/

use thiserror::Error;

use crate::huff_tree::HuffTree;
use crate::huffman::{self, CodeTable, EncodedSym, HuffmanError};
use crate::lz77::{LZError, LZParams, TokenStream};

/// Largest input, in characters, that the LZ77 search will accept by default
pub const DEFAULT_MAX_LZ_INPUT: usize = 1 << 20;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
  #[error("Cannot compress empty input")]
  EmptyInput,
  #[error("Input of {0} characters exceeds the limit of {1}")]
  InputTooLarge(usize, usize),
  #[error("Unexpected character {0:?} at position {1} of encoded data")]
  InvalidCharacter(char, usize),
  #[error("{0:?} cannot be used as the pass-through character")]
  InvalidPassthrough(char),
  #[error("Huffman error: {0}")]
  Huffman(#[from] HuffmanError),
  #[error("LZ77 error: {0}")]
  LZ77(#[from] LZError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
  /// Character copied through Huffman coding uncompressed. `None` codes every
  /// character.
  pub passthrough: Option<char>,
  pub lz_params: LZParams,
  /// Cap on LZ77 input length; `None` removes the cap.
  pub max_lz_input: Option<usize>,
}

impl Default for CodecOptions {
  fn default() -> Self {
    Self {
      passthrough: Some(' '),
      lz_params: LZParams::default(),
      max_lz_input: Some(DEFAULT_MAX_LZ_INPUT),
    }
  }
}

impl CodecOptions {
  fn is_passthrough(&self, c: &char) -> bool {
    self.passthrough == Some(*c)
  }

  fn validate(&self) -> Result<(), CodecError> {
    match self.passthrough {
      Some(c @ '0') | Some(c @ '1') => Err(CodecError::InvalidPassthrough(c)),
      _ => Ok(()),
    }
  }
}

#[derive(Debug, Clone)]
pub struct HuffmanOutput {
  pub encoded: String,
  pub codes: CodeTable<char>,
  pub tree: HuffTree<char>,
}

fn render(encoded: &[EncodedSym<char>]) -> String {
  encoded
    .iter()
    .map(|e| match e {
      EncodedSym::Bit(false) => '0',
      EncodedSym::Bit(true) => '1',
      EncodedSym::PassThrough(c) => *c,
    })
    .collect()
}

fn parse(encoded: &str, opts: &CodecOptions) -> Result<Vec<EncodedSym<char>>, CodecError> {
  encoded
    .chars()
    .enumerate()
    .map(|(i, c)| match c {
      '0' => Ok(EncodedSym::Bit(false)),
      '1' => Ok(EncodedSym::Bit(true)),
      c if opts.is_passthrough(&c) => Ok(EncodedSym::PassThrough(c)),
      c => Err(CodecError::InvalidCharacter(c, i)),
    })
    .collect()
}

pub fn huffman_compress(text: &str, opts: &CodecOptions) -> Result<HuffmanOutput, CodecError> {
  opts.validate()?;
  if text.is_empty() {
    return Err(CodecError::EmptyInput);
  }
  let symbols: Vec<char> = text.chars().collect();
  let out = huffman::compress(&symbols, |c| opts.is_passthrough(c))?;
  Ok(HuffmanOutput {
    encoded: render(&out.encoded),
    codes: out.codes,
    tree: out.tree,
  })
}

pub fn huffman_decompress(
  encoded: &str,
  codes: &CodeTable<char>,
  opts: &CodecOptions,
) -> Result<String, CodecError> {
  opts.validate()?;
  let syms = parse(encoded, opts)?;
  let decoded = huffman::decompress(&syms, codes)?;
  Ok(decoded.into_iter().collect())
}

pub fn lz77_compress(text: &str, opts: &CodecOptions) -> Result<TokenStream<char>, CodecError> {
  if text.is_empty() {
    return Err(CodecError::EmptyInput);
  }
  let symbols: Vec<char> = text.chars().collect();
  if let Some(max) = opts.max_lz_input {
    if symbols.len() > max {
      return Err(CodecError::InputTooLarge(symbols.len(), max));
    }
  }
  Ok(TokenStream::from_uncompressed(&symbols, &opts.lz_params))
}

pub fn lz77_decompress(tokens: &TokenStream<char>) -> Result<String, CodecError> {
  let decoded = tokens.decode()?;
  Ok(decoded.into_iter().collect())
}

/*! A sliding-window LZ77 coder over arbitrary symbols.

The encoder greedily takes the longest match found by a brute-force scan of the
search window. Matches only pay off once they are longer than
`MATCH_THRESHOLD`; anything shorter is emitted as a literal.
*/

pub mod decoder;
pub mod encoder;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_SEARCH_WINDOW: usize = 255;
pub const DEFAULT_LOOKAHEAD: usize = 15;

/// Matches must be strictly longer than this to be emitted.
pub const MATCH_THRESHOLD: usize = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LZError {
  #[error("Invalid LZ77 configuration: window {search_window}, lookahead {lookahead} (both must be positive)")]
  InvalidConfiguration {
    search_window: usize,
    lookahead: usize,
  },
  #[error("Tried to go back {0} symbols, but the output is only {1} long")]
  BackrefPastStart(usize, usize),
  #[error("Invalid match token: distance {distance}, length {length}")]
  InvalidToken { distance: usize, length: usize },
  #[error("Match of length {0} cannot fit in the output")]
  LengthOverflow(usize),
}

/** A single symbol of LZ77 output: either a literal or a back-reference
followed by (at most) one literal.
*/
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub enum Token<S> {
  Literal(S),
  Match {
    distance: usize,
    length: usize,
    next: Option<S>,
  },
}

impl<S: fmt::Display> fmt::Display for Token<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Token::Literal(s) => write!(f, "{}", s),
      Token::Match {
        distance,
        length,
        next: Some(s),
      } => write!(f, "({}, {}, {})", distance, length, s),
      Token::Match {
        distance,
        length,
        next: None,
      } => write!(f, "({}, {}, )", distance, length),
    }
  }
}

/// Limits on how far back and how far ahead the encoder may look.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct LZParams {
  search_window: usize,
  lookahead: usize,
}

impl LZParams {
  pub fn new(search_window: usize, lookahead: usize) -> Result<Self, LZError> {
    if search_window == 0 || lookahead == 0 {
      return Err(LZError::InvalidConfiguration {
        search_window,
        lookahead,
      });
    }
    Ok(Self {
      search_window,
      lookahead,
    })
  }

  pub fn search_window(&self) -> usize {
    self.search_window
  }

  pub fn lookahead(&self) -> usize {
    self.lookahead
  }
}

impl Default for LZParams {
  fn default() -> Self {
    Self {
      search_window: DEFAULT_SEARCH_WINDOW,
      lookahead: DEFAULT_LOOKAHEAD,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenStream<S> {
  pub tokens: Vec<Token<S>>,
}

impl<S> TokenStream<S>
where
  S: PartialEq + Eq + Clone,
{
  /// Generate a token stream by compressing raw symbols using the given parameters
  pub fn from_uncompressed(data: &[S], params: &LZParams) -> Self {
    Self {
      tokens: encoder::do_lz77(data, params),
    }
  }

  /// Replay the stream, producing the original symbols
  pub fn decode(&self) -> Result<Vec<S>, LZError> {
    let mut decoded = Vec::new();
    decoder::decode_lz77(&self.tokens, &mut decoded)?;
    Ok(decoded)
  }

  pub fn len(&self) -> usize {
    self.tokens.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tokens.is_empty()
  }

  /// How many symbols result when this stream is decoded? `None` if the
  /// count does not fit in a `usize`.
  pub fn decoded_len(&self) -> Option<usize> {
    self.tokens.iter().try_fold(0usize, |total, t| match t {
      Token::Literal(_) => total.checked_add(1),
      Token::Match { length, next, .. } => total
        .checked_add(*length)?
        .checked_add(next.is_some() as usize),
    })
  }

  pub fn num_matches(&self) -> usize {
    self
      .tokens
      .iter()
      .filter(|t| matches!(t, Token::Match { .. }))
      .count()
  }
}

impl<S: fmt::Display> fmt::Display for TokenStream<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for t in self.tokens.iter() {
      if !first {
        f.write_str(" ")?;
      }
      first = false;
      write!(f, "{}", t)?;
    }
    Ok(())
  }
}

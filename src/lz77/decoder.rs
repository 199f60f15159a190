use super::{LZError, Token};

/// Expand a backref at the given point in the data.
///
/// Symbols are copied one at a time, so when `length > distance` the symbols
/// appended earlier in this copy become the source for later ones.
fn expand_backref<S: Clone>(length: usize, distance: usize, data: &mut Vec<S>) -> Result<(), LZError> {
  if distance == 0 || length == 0 {
    return Err(LZError::InvalidToken { distance, length });
  }
  let last_data_index = data.len();
  if distance > last_data_index {
    return Err(LZError::BackrefPastStart(distance, last_data_index));
  }
  let first_i = last_data_index - distance;
  let end = first_i
    .checked_add(length)
    .ok_or(LZError::LengthOverflow(length))?;
  data
    .try_reserve(length)
    .map_err(|_| LZError::LengthOverflow(length))?;
  for j in first_i..end {
    let target = data[j].clone();
    data.push(target);
  }
  Ok(())
}

/// Decode an LZ77 token stream. Appends symbols to the decoded vector
pub fn decode_lz77<S: Clone>(data: &[Token<S>], decoded: &mut Vec<S>) -> Result<(), LZError> {
  for sym in data.iter() {
    match sym {
      Token::Literal(ch) => decoded.push(ch.clone()),
      Token::Match {
        distance,
        length,
        next,
      } => {
        expand_backref(*length, *distance, decoded)?;
        if let Some(ch) = next {
          decoded.push(ch.clone());
        }
      }
    }
  }
  Ok(())
}

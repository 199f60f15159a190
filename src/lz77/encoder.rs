//! Contains the greedy match loop that turns raw symbols into LZ77 tokens.
use super::{LZParams, Token, MATCH_THRESHOLD};
use crate::sliding_window::SlidingWindow;

/// Build the (position, percent) checkpoints at which progress is logged, in
/// reverse order so the next checkpoint can be popped off the end.
fn progress_checkpoints(len: usize) -> Vec<(usize, usize)> {
  let steps = if len < 300_000usize { 10 } else { 100 };
  let stepsz = len / steps;
  let mut x = Vec::with_capacity(steps + 1);
  x.push((len, 100));
  for z in (1..steps).rev() {
    x.push((stepsz * z, 100 * z / steps));
  }
  x
}

/// Computes the compressed representation of a stream of symbols.
pub fn do_lz77<S>(data: &[S], params: &LZParams) -> Vec<Token<S>>
where
  S: PartialEq + Eq + Clone,
{
  let mut window = SlidingWindow::new_with_params(data, params.search_window(), params.lookahead());
  let mut output = Vec::new();
  let mut index = 0usize;

  let mut checkpoints = progress_checkpoints(data.len());
  log::debug!(
    "Encoding {} symbols with window {} and lookahead {}",
    data.len(),
    params.search_window(),
    params.lookahead()
  );

  while index < data.len() {
    if let Some((nsyms, percent)) = checkpoints.last().copied() {
      if index >= nsyms {
        log::debug!("Finished {}/{}, {}%", index, data.len(), percent);
        let _ = checkpoints.pop();
      }
    }

    window.advance_to(index);
    let (distance, length) = window.find_match();

    if length > MATCH_THRESHOLD {
      debug_assert!(distance <= params.search_window());
      let next = data.get(index + length).cloned();
      output.push(Token::Match {
        distance,
        length,
        next,
      });
      index += length + 1;
    } else {
      output.push(Token::Literal(data[index].clone()));
      index += 1;
    }
  }

  output
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
  }

  fn lits(s: &str) -> Vec<Token<char>> {
    s.chars().map(Token::Literal).collect()
  }

  #[test]
  fn empty_input() {
    let empty: Vec<char> = Vec::new();
    assert!(do_lz77(&empty, &LZParams::default()).is_empty());
  }

  #[test]
  fn overlapping_match() {
    let params = LZParams::new(6, 6).unwrap();
    let syms = do_lz77(&chars("abcabcabc"), &params);
    let mut answer = lits("abc");
    answer.push(Token::Match {
      distance: 3,
      length: 6,
      next: None,
    });
    assert_eq!(syms, answer);
  }

  #[test]
  fn length_three_stays_literal() {
    // The best match at every position is at most three long
    let syms = do_lz77(&chars("aaaa"), &LZParams::default());
    assert_eq!(syms, lits("aaaa"));

    let syms = do_lz77(&chars("abcxabc"), &LZParams::default());
    assert_eq!(syms, lits("abcxabc"));
  }

  #[test]
  fn length_four_becomes_match() {
    let syms = do_lz77(&chars("aaaaa"), &LZParams::default());
    assert_eq!(
      syms,
      vec![
        Token::Literal('a'),
        Token::Match {
          distance: 1,
          length: 4,
          next: None
        }
      ]
    );

    let syms = do_lz77(&chars("abcdxabcdy"), &LZParams::default());
    let mut answer = lits("abcdx");
    answer.push(Token::Match {
      distance: 5,
      length: 4,
      next: Some('y'),
    });
    assert_eq!(syms, answer);
  }

  #[test]
  fn match_length_capped_by_lookahead() {
    let data = vec![7u8; 40];
    let params = LZParams::new(255, 15).unwrap();
    let syms = do_lz77(&data, &params);
    assert!(syms.iter().all(|t| match t {
      Token::Match { length, distance, .. } => *length <= 15 && *distance >= 1,
      Token::Literal(_) => true,
    }));
  }

  #[test]
  fn distance_capped_by_window() {
    let mut data = chars("wxyzw");
    data.extend(std::iter::repeat('-').take(20));
    data.extend(chars("wxyzw"));
    let far = do_lz77(&data, &LZParams::new(255, 15).unwrap());
    assert!(far.contains(&Token::Match {
      distance: 25,
      length: 5,
      next: None
    }));

    let near = do_lz77(&data, &LZParams::new(10, 15).unwrap());
    assert!(near.iter().all(|t| match t {
      Token::Match { distance, .. } => *distance <= 10,
      Token::Literal(_) => true,
    }));
    assert!(near.ends_with(&lits("wxyzw")));
  }

  #[test]
  fn checkpoints_are_ordered() {
    let c = progress_checkpoints(1000);
    assert_eq!(c.first(), Some(&(1000, 100)));
    assert_eq!(c.last(), Some(&(100, 10)));
    assert!(c.windows(2).all(|w| w[0].0 >= w[1].0));
  }
}

/** A search window over already-seen input, paired with a bounded lookahead.

The window is a right-open `[a, b)` pair of indices into `source`, where `b` is
the position currently being encoded. Matches may run past `b` into the
lookahead, which is what lets a back-reference be longer than its distance.
*/
#[derive(Debug)]
pub struct SlidingWindow<'a, S> {
  source: &'a [S],
  window: (usize, usize),
  winsz: usize,
  lookahead: usize,
}

impl<'a, S> SlidingWindow<'a, S>
where
  S: PartialEq + Eq,
{
  pub fn new_with_params(source: &'a [S], winsz: usize, lookahead: usize) -> Self {
    Self {
      source,
      window: (0, 0),
      winsz,
      lookahead,
    }
  }

  /// Move the window so that it ends just before `pos`
  pub fn advance_to(&mut self, pos: usize) {
    let pos = pos.min(self.source.len());
    self.window = (pos.saturating_sub(self.winsz), pos);
  }

  pub fn position(&self) -> usize {
    self.window.1
  }

  pub fn window_len(&self) -> usize {
    self.window.1 - self.window.0
  }

  /// Find the longest match for the lookahead at the current position using a
  /// brute-force search of the window. Returns a (distance, length) pair; the
  /// earliest (most distant) start wins among equally long matches. A length of
  /// zero means nothing in the window matched.
  pub fn find_match(&self) -> (usize, usize) {
    let mut backref_dist = 0;
    let mut backref_size = 0;

    for i in 0..self.window_len() {
      let match_size = self.longest_match(self.window.0 + i);
      if match_size > backref_size {
        backref_dist = self.window_len() - i;
        backref_size = match_size;
      }
    }
    (backref_dist, backref_size)
  }

  fn longest_match(&self, source_start: usize) -> usize {
    let pos = self.window.1;
    let mut len = 0usize;
    while len < self.lookahead
      && pos + len < self.source.len()
      && self.source[source_start + len] == self.source[pos + len]
    {
      len += 1;
    }
    len
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn window_clamps_to_start() {
    let s = ['a'; 1024];
    let mut win = SlidingWindow::new_with_params(&s[..], 64, 15);
    win.advance_to(10);
    assert_eq!(win.window, (0, 10));
    win.advance_to(100);
    assert_eq!(win.window, (36, 100));
    assert_eq!(win.position(), 100);
    assert_eq!(win.window_len(), 64);
    win.advance_to(5000);
    assert_eq!(win.position(), 1024);
  }

  #[test]
  fn match_test() {
    let s = "qwertyuiop[]asdfghjkl;'zxcvbnm,./werty".as_bytes();
    let mut win = SlidingWindow::new_with_params(s, 64, 15);
    win.advance_to(33);
    assert_eq!(win.find_match(), (32, 5));
  }

  #[test]
  fn match_limited_by_window() {
    let s = "qwertyuiop[]asdfghjkl;'zxcvbnm,./werty".as_bytes();
    let mut win = SlidingWindow::new_with_params(s, 16, 15);
    win.advance_to(33);
    assert_eq!(win.find_match().1, 0);
  }

  #[test]
  fn match_limited_by_lookahead() {
    let s = "abcdefghabcdefgh".as_bytes();
    let mut win = SlidingWindow::new_with_params(s, 255, 4);
    win.advance_to(8);
    assert_eq!(win.find_match(), (8, 4));
  }

  #[test]
  fn match_overlaps_lookahead() {
    let s = "abcabcabc".as_bytes();
    let mut win = SlidingWindow::new_with_params(s, 255, 15);
    win.advance_to(3);
    assert_eq!(win.find_match(), (3, 6));
  }

  #[test]
  fn empty_window() {
    let s = "abc".as_bytes();
    let win = SlidingWindow::new_with_params(s, 255, 15);
    assert_eq!(win.find_match(), (0, 0));
  }
}

/*! Prefix-code generation from a `HuffTree`, and encoding/decoding with the
resulting code table.

Codes are kept as bit strings and are never packed into bytes. Pass-through
symbols are carried through the encoded stream untouched.
*/

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;

use bit_vec::BitVec;
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::huff_tree::{HuffNode, HuffTree, HuffTreeError};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HuffmanError {
  #[error("{0}")]
  Tree(#[from] HuffTreeError),
  #[error("Symbol {0} has no code in the code table")]
  UnknownSymbol(String),
  #[error("Encoded stream ended in the middle of a code, with bits {0:?} left over")]
  TruncatedCode(String),
  #[error("Bit sequence {0} does not match any code in the table")]
  InvalidCode(String),
}

/// A single Huffman code, most significant (first-taken) bit first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(BitVec);

impl Code {
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
    self.0.iter()
  }

  pub fn is_prefix_of(&self, other: &Code) -> bool {
    self.len() <= other.len() && self.bits().zip(other.bits()).all(|(a, b)| a == b)
  }
}

impl From<BitVec> for Code {
  fn from(bits: BitVec) -> Self {
    Self(bits)
  }
}

impl fmt::Display for Code {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for b in self.bits() {
      f.write_str(if b { "1" } else { "0" })?;
    }
    Ok(())
  }
}

impl Serialize for Code {
  fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
    serializer.collect_str(self)
  }
}

fn bits_to_string(bits: &BitVec) -> String {
  Code(bits.clone()).to_string()
}

/// Symbol to code mapping, in the order the leaves were reached (left first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Eq + Hash> {
  entries: Vec<(S, Code)>,
  index: HashMap<S, usize>,
}

impl<S> CodeTable<S>
where
  S: Eq + Hash + Clone + Debug,
{
  /// Walk the tree from the root, appending 0 for each left turn and 1 for
  /// each right turn. A tree that is a single leaf gets the code `0`.
  pub fn from_tree(tree: &HuffTree<S>) -> Self {
    let mut entries = Vec::new();
    let mut stack = vec![(tree.root(), BitVec::new())];
    while let Some((id, code)) = stack.pop() {
      match tree.node(id) {
        HuffNode::Leaf { sym, .. } => {
          let code = if code.is_empty() {
            BitVec::from_elem(1, false)
          } else {
            code
          };
          entries.push((sym.clone(), Code(code)));
        }
        HuffNode::Internal { left, right, .. } => {
          let mut rcode = code.clone();
          rcode.push(true);
          let mut lcode = code;
          lcode.push(false);
          stack.push((*right, rcode));
          stack.push((*left, lcode));
        }
      }
    }
    Self::from_entries(entries)
  }

  fn from_entries(entries: Vec<(S, Code)>) -> Self {
    let index = entries
      .iter()
      .enumerate()
      .map(|(i, (s, _))| (s.clone(), i))
      .collect();
    Self { entries, index }
  }

  pub fn get(&self, sym: &S) -> Option<&Code> {
    self.index.get(sym).map(|i| &self.entries[*i].1)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&S, &Code)> + '_ {
    self.entries.iter().map(|(s, c)| (s, c))
  }

  pub fn max_code_len(&self) -> usize {
    self.entries.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
  }

  pub fn is_prefix_free(&self) -> bool {
    for (i, (_, a)) in self.entries.iter().enumerate() {
      for (j, (_, b)) in self.entries.iter().enumerate() {
        if i != j && a.is_prefix_of(b) {
          return false;
        }
      }
    }
    true
  }

  fn inverse(&self) -> HashMap<&BitVec, &S> {
    self.entries.iter().map(|(s, c)| (&c.0, s)).collect()
  }
}

impl<S> Serialize for CodeTable<S>
where
  S: Eq + Hash + fmt::Display,
{
  fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (sym, code) in self.entries.iter() {
      map.serialize_entry(&sym.to_string(), code)?;
    }
    map.end()
  }
}

/// One element of a Huffman-encoded stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedSym<S> {
  Bit(bool),
  PassThrough(S),
}

/// The products of a single compression call
#[derive(Debug, Clone)]
pub struct HuffmanCompressed<S: Eq + Hash> {
  pub encoded: Vec<EncodedSym<S>>,
  pub codes: CodeTable<S>,
  pub tree: HuffTree<S>,
}

/// Replace every symbol of `src` with its code. Symbols accepted by
/// `is_passthrough` are copied through as-is.
pub fn encode<S>(
  src: &[S],
  codes: &CodeTable<S>,
  is_passthrough: impl Fn(&S) -> bool,
) -> Result<Vec<EncodedSym<S>>, HuffmanError>
where
  S: Eq + Hash + Clone + Debug,
{
  let mut out = Vec::new();
  for sym in src.iter() {
    if is_passthrough(sym) {
      out.push(EncodedSym::PassThrough(sym.clone()));
      continue;
    }
    let code = codes
      .get(sym)
      .ok_or_else(|| HuffmanError::UnknownSymbol(format!("{:?}", sym)))?;
    out.extend(code.bits().map(EncodedSym::Bit));
  }
  Ok(out)
}

/// Decode a stream produced by `encode` with the same code table.
pub fn decode<S>(encoded: &[EncodedSym<S>], codes: &CodeTable<S>) -> Result<Vec<S>, HuffmanError>
where
  S: Eq + Hash + Clone + Debug,
{
  let inverse = codes.inverse();
  let max_len = codes.max_code_len();
  let mut decoded = Vec::new();
  let mut acc = BitVec::new();

  for esym in encoded.iter() {
    match esym {
      EncodedSym::PassThrough(sym) => {
        if !acc.is_empty() {
          return Err(HuffmanError::TruncatedCode(bits_to_string(&acc)));
        }
        decoded.push(sym.clone());
      }
      EncodedSym::Bit(b) => {
        acc.push(*b);
        if let Some(sym) = inverse.get(&acc) {
          decoded.push((*sym).clone());
          acc.truncate(0);
        } else if acc.len() >= max_len {
          return Err(HuffmanError::InvalidCode(bits_to_string(&acc)));
        }
      }
    }
  }

  if !acc.is_empty() {
    return Err(HuffmanError::TruncatedCode(bits_to_string(&acc)));
  }
  Ok(decoded)
}

/// Build a tree and code table for `src` and encode it.
pub fn compress<S>(
  src: &[S],
  is_passthrough: impl Fn(&S) -> bool,
) -> Result<HuffmanCompressed<S>, HuffmanError>
where
  S: Eq + Hash + Clone + Debug,
{
  let tree = HuffTree::from_symbols(src, &is_passthrough)?;
  let codes = CodeTable::from_tree(&tree);
  log::debug!(
    "Generated {} codes, longest is {} bits",
    codes.len(),
    codes.max_code_len()
  );
  let encoded = encode(src, &codes, &is_passthrough)?;
  Ok(HuffmanCompressed {
    encoded,
    codes,
    tree,
  })
}

pub fn decompress<S>(encoded: &[EncodedSym<S>], codes: &CodeTable<S>) -> Result<Vec<S>, HuffmanError>
where
  S: Eq + Hash + Clone + Debug,
{
  decode(encoded, codes)
}

use std::{env, io::Write, process};

use serde::Serialize;

use dualcodec::huff_tree::TreeView;
use dualcodec::huffman::CodeTable;
use dualcodec::lz77::TokenStream;
use dualcodec::*;

#[derive(Serialize)]
struct Dump<'a> {
  report: &'a CompressionReport,
  codes: &'a CodeTable<char>,
  tree: TreeView,
  huffman: &'a str,
  lz77: &'a TokenStream<char>,
}

fn main() -> Result<(), std::io::Error> {
  let args: Vec<String> = env::args().collect();

  if args.len() != 3 {
    println!("Usage: {} <text-in> <json-out>", &args[0]);
    println!("\tDumps the Huffman code table, tree, and both compressed forms of a text file as JSON");
    process::exit(1);
  }

  pretty_env_logger::init();

  let text = std::fs::read_to_string(&args[1])?;
  let opts = CodecOptions::default();

  let compressed = huffman_compress(&text, &opts)
    .and_then(|huff| Ok((huff, lz77_compress(&text, &opts)?)));
  let (huff, tokens) = match compressed {
    Ok(x) => x,
    Err(e) => {
      println!("{}", e);
      process::exit(1);
    }
  };
  let report = CompressionReport::from_outputs(&text, &huff, &tokens, &opts);
  log::info!(
    "Dumping {} codes and {} tokens",
    huff.codes.len(),
    tokens.len()
  );

  let dump = Dump {
    report: &report,
    codes: &huff.codes,
    tree: huff.tree.to_view(),
    huffman: &huff.encoded,
    lz77: &tokens,
  };
  let json_string = serde_json::to_string(&dump)?;

  let mut outfile = std::fs::File::create(&args[2])?;
  outfile.write_all(json_string.as_bytes())?;
  println!("Output written to {}", args[2]);

  Ok(())
}

use std::env;
use std::io::Read;
use std::process;

use ansi_term::Colour;

use dualcodec::lz77::LZParams;
use dualcodec::*;

fn print_usage(prog_name: &str) {
  println!("Usage: {} <infilename | -> [window] [lookahead]", prog_name);
  println!(
    r#"    Compresses the text with both Huffman coding and LZ77, then prints the
    resulting sizes, the Huffman code table and both compressed forms.
    Reads standard input when <infilename> is "-".
    [window] and [lookahead] default to 255 and 15."#
  );
}

fn read_input(name: &str) -> std::io::Result<String> {
  if name == "-" {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
  } else {
    std::fs::read_to_string(name)
  }
}

fn parse_size(arg: Option<&String>, default: usize) -> usize {
  match arg {
    Some(x) => x.parse().unwrap_or_else(|_| {
      println!("Could not parse {:?} as a size", x);
      process::exit(1);
    }),
    None => default,
  }
}

fn label(sym: char) -> String {
  match sym {
    ' ' => "(space)".to_string(),
    '\n' => "(newline)".to_string(),
    '\t' => "(tab)".to_string(),
    c => c.to_string(),
  }
}

fn main() {
  let args: Vec<String> = env::args().collect();

  if args.len() < 2 || args.len() > 4 {
    print_usage(&args[0]);
    process::exit(1);
  }

  pretty_env_logger::init();

  let text = read_input(&args[1]).unwrap_or_else(|e| {
    println!("Could not read {}: {}", &args[1], e);
    process::exit(1);
  });

  let window = parse_size(args.get(2), lz77::DEFAULT_SEARCH_WINDOW);
  let lookahead = parse_size(args.get(3), lz77::DEFAULT_LOOKAHEAD);
  let lz_params = match LZParams::new(window, lookahead) {
    Ok(p) => p,
    Err(e) => {
      println!("{}", e);
      process::exit(1);
    }
  };
  log::info!("Using LZ77 parameters {:?}", lz_params);

  let opts = CodecOptions {
    lz_params,
    ..CodecOptions::default()
  };

  let run = || -> Result<(), CodecError> {
    let huff = huffman_compress(&text, &opts)?;
    let tokens = lz77_compress(&text, &opts)?;
    let report = CompressionReport::from_outputs(&text, &huff, &tokens, &opts);
    log::info!(
      "Huffman tree has {} nodes and depth {}",
      huff.tree.num_nodes(),
      huff.tree.depth()
    );

    println!("{}", report);
    let verdict = if report.huffman_round_trip && report.lz77_round_trip {
      Colour::Green.bold().paint("Both codecs reproduced the input")
    } else {
      Colour::Red.bold().paint("A codec failed to reproduce the input")
    };
    println!("{}\n", verdict);

    println!("Huffman Mapping:");
    for (sym, code) in huff.codes.iter() {
      println!("  {} -> {}", label(*sym), code);
    }
    println!("\nCompressed Content (Huffman):\n{}", huff.encoded);
    println!("\nCompressed Content (LZ77):\n{}", tokens);
    Ok(())
  };

  if let Err(e) = run() {
    log::warn!("Compression failed: {:?}", e);
    println!("{}", Colour::Red.paint(e.to_string()));
    process::exit(1);
  }
}

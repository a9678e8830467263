#[macro_use]
extern crate structopt;
extern crate net_frequency;

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::PathBuf;
use std::process;

use structopt::StructOpt;

use net_frequency::SuffixTree;

#[derive(StructOpt)]
struct Options {
    #[structopt(short = "f", long = "file", parse(from_os_str))]
    file_path: Option<PathBuf>,
    #[structopt(short = "s", long = "sentinel", default_value = "$")]
    sentinel: String,
    #[structopt(short = "q", long = "query")]
    query: Option<String>,
    #[structopt(name = "TEXT")]
    text: Option<String>,
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt::init();
    let options = Options::from_args();

    let sentinel = options.sentinel.as_bytes();
    if sentinel.len() != 1 {
        eprintln!("error: the sentinel must be a single byte");
        process::exit(2);
    }

    let mut text: Vec<u8> = if let Some(text) = options.text {
        text.into_bytes()
    } else if let Some(file_path) = options.file_path {
        let mut buffer = Vec::new();
        File::open(file_path)?.read_to_end(&mut buffer)?;
        buffer
    } else {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        buffer
    };

    while text.last() == Some(&b'\n') || text.last() == Some(&b'\r') {
        text.pop();
    }
    text.push(sentinel[0]);

    let mut tree = match SuffixTree::new(&text) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    match options.query {
        Some(query) => println!("{}", tree.single_nf(query.as_bytes())),
        None => {
            let mut pairs = tree.all_nf();
            pairs.sort();
            for (substring, count) in pairs {
                println!("{}\t{}", String::from_utf8_lossy(substring), count);
            }
        }
    }

    Ok(())
}

#[macro_use]
extern crate structopt;
extern crate net_frequency;

use std::process;

use structopt::StructOpt;

use net_frequency::SuffixTree;

#[derive(StructOpt)]
struct Options {
    #[structopt(name = "INPUT")]
    input: String,
}

fn main() {
    tracing_subscriber::fmt::init();
    let options = Options::from_args();

    let s = format!("{}$", options.input);
    match SuffixTree::new(s.as_bytes()) {
        Ok(mut tree) => {
            tree.all_nf();
            tree.visualize();
        }
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}

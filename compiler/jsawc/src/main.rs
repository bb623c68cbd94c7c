//! `jsaw`: weave aspect scripts into flow scripts.

use jsawc::commands::{aspects_file, parse_weave_options, tokens_file, weave_file, WeaveOptions};

fn main() {
    jsawc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "weave" => {
            if args.len() < 3 {
                eprintln!("Usage: jsaw weave <file.js> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --stop=<name>       Stop-execution function, repeatable");
                eprintln!("                      (default: cocoon.sendPageAndWait)");
                eprintln!("  --serialize         Also write <file>_intercepted.js");
                eprintln!("  --tab-width=<n>     Spaces per tab (default: 4)");
                eprintln!("  -o <path>           Output file (default: stdout)");
                std::process::exit(1);
            }

            // -o takes the next argument
            let mut options = WeaveOptions::default();
            let mut i = 3;
            while i < args.len() {
                if args[i] == "-o" && i + 1 < args.len() {
                    options.output = Some(std::path::PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    let parsed = parse_weave_options(&args[i..=i]);
                    options.merge(&parsed);
                    i += 1;
                }
            }

            weave_file(&args[2], &options);
        }
        "tokens" => {
            if args.len() < 3 {
                eprintln!("Usage: jsaw tokens <file.js>");
                std::process::exit(1);
            }
            tokens_file(&args[2]);
        }
        "aspects" => {
            if args.len() < 3 {
                eprintln!("Usage: jsaw aspects <file.js>");
                std::process::exit(1);
            }
            aspects_file(&args[2]);
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("jsaw {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("jsaw: aspect weaver for flow scripts");
    println!();
    println!("Usage: jsaw <command> [options]");
    println!();
    println!("Commands:");
    println!("  weave <file>     Weave the aspects a script applies and print the result");
    println!("  tokens <file>    Show the token stream of a script");
    println!("  aspects <file>   List the interceptors an aspect script declares");
    println!("  help             Show this message");
    println!("  version          Show the version");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=jsaw_weaver=debug) for weaving traces.");
}

use clap::{Arg, Command};
use std::fs;
use std::path::Path;

fn main() {
    let matches = Command::new("rill")
        .about("A tree-walking interpreter for a small decimal scripting language")
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .help("Print the parse tree before running")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let show_ast = matches.get_flag("ast");

    if matches.get_flag("interactive") {
        rill::repl::start();
    } else if let Some(file_path) = matches.get_one::<String>("file") {
        run_file(file_path, show_ast);
    } else {
        rill::repl::start();
    }
}

fn run_file(path: &str, show_ast: bool) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            rill::runner::run(&source, path.to_str(), show_ast);
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

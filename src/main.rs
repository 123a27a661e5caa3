use anyhow::Result;
use argh::FromArgs;
use compass::{Interpreter, tokenize};

#[derive(FromArgs)]
/// Compass, a tiny line-oriented command interpreter.
/// Starts an interactive session unless a one-shot command is given.
struct Args {
    #[argh(option, short = 'c')]
    /// evaluate a single command line and exit
    command: Option<String>,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    let mut interp = Interpreter::new();

    match args.command {
        Some(line) => interp.execute(&tokenize(&line), &mut std::io::stdout()),
        None => interp.repl(),
    }
}

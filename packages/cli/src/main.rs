use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lrec::grammars::ContextFreeGrammar;

/// Eliminate left recursion from context-free grammars.
#[derive(Debug, Parser)]
#[command(name = "lrec", version, about)]
struct Args {
    /// A single grammar rule, e.g. "A -> Aa | b".
    grammar: Option<String>,

    /// Read a batch of grammars from stdin: first the number of grammars,
    /// then for each grammar the number of non-terminals followed by one
    /// rule per line.
    #[arg(long, conflicts_with = "grammar")]
    batch: bool,

    /// Print each result as a table instead of plain rules.
    #[arg(long)]
    table: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.batch {
        run_batch(args.table)
    } else if let Some(rule) = args.grammar {
        run_single(&rule, args.table)
    } else {
        run_interactive(args.table)
    }
}

fn transform(lines: &[String]) -> Result<ContextFreeGrammar> {
    let mut grammar = ContextFreeGrammar::parse(lines).context("failed to parse grammar")?;
    grammar
        .eliminate_left_recursion()
        .context("failed to eliminate left recursion")?;

    Ok(grammar)
}

fn render(grammar: &ContextFreeGrammar, table: bool) -> String {
    if table {
        grammar.table()
    } else {
        grammar.definition()
    }
}

fn run_single(rule: &str, table: bool) -> Result<()> {
    let grammar = transform(&[rule.to_string()])?;
    println!("{}", render(&grammar, table));

    Ok(())
}

fn run_batch(table: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let count: usize = next_line(&mut lines)?
        .trim()
        .parse()
        .context("expected the number of grammars")?;

    let mut outputs = Vec::with_capacity(count);

    for index in 0..count {
        let rules: usize = next_line(&mut lines)?
            .trim()
            .parse()
            .context("expected the number of non-terminals")?;
        let rule_lines = (0..rules)
            .map(|_| next_line(&mut lines))
            .collect::<Result<Vec<_>>>()?;

        // A failed grammar aborts only itself, not the rest of the batch.
        match transform(&rule_lines) {
            Ok(grammar) => outputs.push(render(&grammar, table)),
            Err(error) => eprintln!("grammar {}: {:#}", index + 1, error),
        }
    }

    println!("{}", outputs.join("\n\n"));

    Ok(())
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => bail!("unexpected end of input"),
    }
}

fn run_interactive(table: bool) -> Result<()> {
    let stdin = io::stdin();

    loop {
        print!("Grammar rule (e.g. `A -> Aa | b`): ");
        io::stdout().flush()?;

        let mut rule = String::new();
        if stdin.read_line(&mut rule)? == 0 {
            break;
        }

        let rule = rule.trim();
        if !rule.is_empty() {
            match transform(&[rule.to_string()]) {
                Ok(grammar) => println!("\n{}\n", render(&grammar, table)),
                Err(error) => eprintln!("{:#}", error),
            }
        }

        print!("Another grammar? (y/n): ");
        io::stdout().flush()?;

        let mut answer = String::new();
        if stdin.read_line(&mut answer)? == 0 {
            break;
        }
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            break;
        }
        println!();
    }

    Ok(())
}

//! # siftql CLI
//!
//! An interactive REPL over a JSON-loaded table: type a query per line,
//! get the filtered and projected rows back.

use std::env;
use std::io::{self, BufRead, Write};

use tracing_subscriber::{fmt, EnvFilter};

use siftql::schema::{self, Schema};
use siftql::sql::parser::Parser;
use siftql::{evaluate_query, table, Table};

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    println!("siftql v{}", env!("CARGO_PKG_VERSION"));
    println!("Enter \".help\" for usage hints.");

    let mut current = Table::new();
    if let Some(path) = args.get(1) {
        match table::load_json(path) {
            Ok(loaded) => {
                println!("Loaded {} rows from {}", loaded.len(), path);
                current = loaded;
            }
            Err(e) => {
                eprintln!("Error loading table: {e}");
                std::process::exit(1);
            }
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut show_ast = false;

    loop {
        print!("siftql> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(_) => break,
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('.') {
            if handle_dot_command(trimmed, &mut current, &mut show_ast) {
                break;
            }
            continue;
        }

        run_query_line(trimmed, &current, show_ast);
    }

    println!();
}

fn run_query_line(text: &str, input: &Table, show_ast: bool) {
    let query = match Parser::parse(text) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    if show_ast {
        print!("{query}");
    }

    let inferred = Schema::infer(input);
    let problems = schema::check_query(&query, &inferred);
    if !problems.is_empty() {
        for p in &problems {
            eprintln!("Semantic error: {p}");
        }
        return;
    }

    let result = evaluate_query(&query, input);
    print_table(&result);
    println!("({} rows)", result.len());
}

/// Render a table with `|`-joined columns. The first row's key order
/// defines the column order.
fn print_table(table: &Table) {
    let Some(first) = table.first() else {
        return;
    };
    let columns: Vec<&String> = first.keys().collect();
    println!(
        "{}",
        columns
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("|")
    );
    for row in table {
        let values: Vec<&str> = columns
            .iter()
            .map(|c| row.get(*c).map(String::as_str).unwrap_or(""))
            .collect();
        println!("{}", values.join("|"));
    }
}

/// Handle a dot-command; returns true when the REPL should exit.
fn handle_dot_command(cmd: &str, current: &mut Table, show_ast: &mut bool) -> bool {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let command = parts[0].to_lowercase();

    match command.as_str() {
        ".help" => {
            println!(".help              Show this help");
            println!(".load FILE         Load a JSON table (array of objects)");
            println!(".schema            Show the schema inferred from the table");
            println!(".ast on|off        Print the parsed tree before results");
            println!(".quit              Exit this program");
            println!(".exit              Exit this program");
        }
        ".load" => match parts.get(1) {
            Some(path) => match table::load_json(path) {
                Ok(loaded) => {
                    println!("Loaded {} rows from {}", loaded.len(), path);
                    *current = loaded;
                }
                Err(e) => eprintln!("Error: {e}"),
            },
            None => eprintln!("Usage: .load FILE"),
        },
        ".schema" => {
            if current.is_empty() {
                println!("(no table loaded)");
            } else {
                let inferred = Schema::infer(current);
                for (name, ty) in inferred.fields() {
                    println!("{name}: {ty}");
                }
            }
        }
        ".ast" => match parts.get(1) {
            Some(&"on") => *show_ast = true,
            Some(&"off") => *show_ast = false,
            _ => eprintln!("Usage: .ast on|off"),
        },
        ".quit" | ".exit" => return true,
        _ => {
            eprintln!("Error: unknown command: {command}");
            eprintln!("Use .help for a list of commands.");
        }
    }
    false
}

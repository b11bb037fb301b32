use dbf_reader::Table;
use std::env;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} <path-to-dbf-file> [--encoding <LABEL>] [--memo <PATH>]",
            args[0]
        );
        std::process::exit(1);
    }

    let dbf_path = &args[1];
    let encoding = flag_value(&args, "--encoding");
    let memo_path = flag_value(&args, "--memo").map(PathBuf::from);

    println!("Reading table: {}", dbf_path);
    println!("{}", "=".repeat(60));

    let table = match Table::new(dbf_path, memo_path.as_deref(), encoding.as_deref()) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("\nERROR: Failed to open table");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let version = table.version();
    println!("\nTable Information:");
    println!(
        "  Version: {} ({})",
        version,
        version.description().unwrap_or("unknown")
    );
    println!("  Records: {}", table.record_count());
    println!("  Encoding: {}", table.encoding().name());
    println!("  Memo file: {}", if table.has_memo() { "yes" } else { "no" });

    println!("\nColumns:");
    for column in table.columns() {
        println!(
            "  {:<12} {} {:>4},{}",
            column.name, column.column_type, column.length, column.decimal
        );
    }

    println!("\nSample Records (first 10):");
    for (i, result) in table.iter().take(10).enumerate() {
        match result {
            Ok(Some(record)) => {
                let fields: Vec<String> = record
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect();
                println!("  {}. {}", i, fields.join(", "));
            }
            Ok(None) => println!("  {}. <deleted>", i),
            Err(e) => {
                eprintln!("\nERROR: Failed to read record {}", i);
                eprintln!("  {}", e);
                std::process::exit(1);
            }
        }
    }

    if table.record_count() > 10 {
        println!("  ... and {} more", table.record_count() - 10);
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|arg| arg == flag)?;
    match args.get(idx + 1) {
        Some(value) => Some(value.clone()),
        None => {
            eprintln!("ERROR: {} flag requires an argument.", flag);
            std::process::exit(1);
        }
    }
}

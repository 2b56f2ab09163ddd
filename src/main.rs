use::std::env;
use::std::process;

use bank_ledger::run;
use env_logger;
use log::info;

const DEFAULT_BANK_NAME: &str = "Bank";

fn main() {
    // Expecting the operations CSV path and, optionally, the bank name
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        let program = args.first().map(String::as_str).unwrap_or("bank_ledger");
        eprintln!("Usage: {} <operations.csv> [bank name]", program);
        process::exit(1);
    }
    let filename = &args[1];
    let bank_name = args.get(2).map(String::as_str).unwrap_or(DEFAULT_BANK_NAME);
    // Initialize logger (respect RUST_LOG env var if set)
    env_logger::init();

    info!("replaying {} into bank {:?}", filename, bank_name);

    if let Err(e) = run(filename, bank_name) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

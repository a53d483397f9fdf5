use std::process;

fn main() {
    if let Err(e) = rsa64::cli::run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

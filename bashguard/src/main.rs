//! Main binary for the bashguard shell script analyzer.

use bashguard::entry_point;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    match entry_point::run_with_args(args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}

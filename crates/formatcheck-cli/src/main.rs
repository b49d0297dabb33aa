use std::process;

fn main() {
    match formatcheck_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("formatcheck error: {err:#}");
            process::exit(2);
        }
    }
}

fn main() {
    if let Err(e) = jscan_cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn main() {
    if let Err(e) = jetton_codec::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

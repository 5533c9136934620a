fn main() {
    if let Err(e) = fluxstat::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

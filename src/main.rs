fn main() {
    if let Err(e) = studyloop_lib::run() {
        eprintln!("studyloop: {}", e);
        std::process::exit(1);
    }
}

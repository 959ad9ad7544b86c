fn main() {
    if let Err(err) = redivent_lib::run() {
        eprintln!("redivent: {err:#}");
        std::process::exit(1);
    }
}

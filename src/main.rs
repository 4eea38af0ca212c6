mod icon;
mod logger;
mod rasterize;

fn main() {
    if let Err(e) = icon::generate_all() {
        logger::log_error("icon generation failed", &e);
        eprintln!("icon generation failed: {}", e);
        std::process::exit(1);
    }
}

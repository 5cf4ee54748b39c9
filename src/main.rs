#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This binary is the web frontend. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    portfolio_site::frontend::run();
}

//! `clientgen` binary.

fn main() {
    clientgen_cli::init_tracing();
    let code = clientgen_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}

fn main() {
    pio_nodelock::cli::run();
}

use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    twostream::example_apps::run_batch_preview(std::env::args().skip(1))
}

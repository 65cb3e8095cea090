//! smilesensor main entrypoint.

use smilesensor::run;
use smilesensor::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

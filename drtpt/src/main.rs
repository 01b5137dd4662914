use clap::Parser;
use drtpt::app::{AppError, DrtptApp};

fn main() -> Result<(), AppError> {
    env_logger::init();
    let args = DrtptApp::parse();
    args.op.run()
}

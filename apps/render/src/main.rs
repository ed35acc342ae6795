use std::process::ExitCode;

fn main() -> ExitCode {
    let child = match std::thread::Builder::new()
        .name("render".to_owned())
        .stack_size(1024 * 1024 * 64)
        .spawn(render::internal_main)
    {
        Ok(child) => child,
        Err(err) => {
            eprintln!("Failed to spawn render thread: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match child.join() {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
        Err(_) => ExitCode::FAILURE,
    }
}

use std::io;
use std::process::exit;

use env_logger;
use log::{debug, error};
use signal_hook::consts::{SIGINT, SIGTERM};

use goshare::arg::Settings;
use goshare::cancel::CancelToken;
use goshare::command::{
    Command,
    Connector,
    Invoker,
};
use goshare::shell;

fn main() {
    env_logger::init();

    let settings = Settings::from_args();

    let ctx = CancelToken::new();
    for sig in [SIGINT, SIGTERM] {
        match signal_hook::flag::register(sig, ctx.flag()) {
            Ok(_) => {},
            Err(e) => {
                error!("cannot register signal {}: {}", sig, e);
            },
        };
    }

    let mut connector = Connector::default();
    let mut invoker = Invoker::default();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stderr = io::stderr();
    let mut err = stderr.lock();

    match &settings.repo {
        Some(v) => {
            debug!("opening repository {} from arguments", v);
            invoker.set_command(Command::Config {
                repository: v.to_string(),
            });
            match invoker.execute_command(&ctx, &mut connector) {
                Ok(Some(report)) => {
                    let _ = shell::report_ok(&mut out, &report);
                },
                Ok(None) => {},
                Err(e) => {
                    let _ = shell::report_err(&mut err, &e);
                },
            };
        },
        None => {},
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    match shell::run(&ctx, &mut connector, &mut input, &mut out, &mut err) {
        Ok(_) => {},
        Err(e) => {
            error!("{}", e);
            exit(1);
        },
    };
}

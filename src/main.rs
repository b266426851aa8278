use launcher_ping::{
    LOG_ONLY,
    commands::{settings::Settings, status::get_server_status, watch::watch},
    models::{
        cli::{Cli, Command},
        json_data::ServerStatus,
    },
    try_init_app_dir,
    utils::{
        display::{DisplayPanic, DisplayPlayerList, DisplayStatus},
        subscriber::init_subscriber,
        transport::TcpConnector,
    },
};

use clap::Parser;
use tracing::{error, info};

fn print_status(status: &ServerStatus, json: bool, players: bool) {
    if json {
        match serde_json::to_string(status) {
            Ok(out) => println!("{out}"),
            Err(err) => error!("{err}"),
        }
    } else if players {
        println!("{}", DisplayPlayerList(status))
    } else {
        println!("{}", DisplayStatus(status))
    }
}

#[tokio::main]
async fn main() {
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!(name: "PANIC", "{}", DisplayPanic(info));
        prev(info);
    }));

    let cli = Cli::parse();

    let local_dir = try_init_app_dir()
        .map_err(|err| eprintln!("{err}"))
        .ok();

    init_subscriber(local_dir.as_deref()).unwrap_or_else(|err| eprintln!("{err}"));
    info!(name: LOG_ONLY, "App startup");

    let settings = Settings::init(local_dir.as_deref());
    let options = cli.probe.resolve(&settings);

    match cli.command.unwrap_or(Command::Status) {
        Command::Status => print_status(&get_server_status(&options).await, cli.json, false),
        Command::Players => print_status(&get_server_status(&options).await, cli.json, true),
        Command::Watch { interval, count } => {
            let interval = interval
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| settings.poll_interval());

            tokio::select! {
                () = watch(&TcpConnector, &options, interval, count.map(|c| c as usize), |status| {
                    print_status(status, cli.json, false)
                }) => (),
                res = tokio::signal::ctrl_c() => {
                    if let Err(err) = res {
                        error!("{err}")
                    }
                }
            }
        }
    }
}

//! Send one command to a TCP-attached device and print whatever it answers.
//!
//! Usage: tcp_probe <host> <port> <command...>

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use wireline::{CollectPolicy, FrameTemplate, Session, TcpTransport};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: tcp_probe <host> <port> <command...>");
        return ExitCode::FAILURE;
    }
    let host = &args[0];
    let port: u16 = match args[1].parse() {
        Ok(port) => port,
        Err(_) => {
            eprintln!("bad port: {}", args[1]);
            return ExitCode::FAILURE;
        }
    };
    let command = args[2..].join(" ");

    match probe(host, port, &command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn probe(host: &str, port: u16, command: &str) -> Result<(), wireline::Error> {
    let transport = TcpTransport::connect(host, port, Duration::from_secs(2)).await?;
    let mut session = Session::builder()
        .template(FrameTemplate::parse("{0}\r\n")?)
        .policy(CollectPolicy::drain(Duration::from_millis(1000)))
        .build(Box::new(transport));

    let response = session.send_once(command).await?;
    for line in &response.lines {
        println!("{line}");
    }
    session.close().await;
    Ok(())
}

//! wireline, an interactive terminal for line-oriented command/response
//! devices.
//!
//! Connects to a device over TCP (Telnet-style raw socket) or a local serial
//! port and exchanges lines with it, either interactively with line editing
//! and history or as a single-shot command taken from the argument list. A
//! listen-only mode prints whatever the device says without transmitting.
//!
//! Exit codes: 0 on success, 1 on connect or I/O failure, 2 on usage errors,
//! 3 when the host does not resolve.

mod input;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use log::{error, info};

use wireline::{
    CollectPolicy, Error, FrameTemplate, SerialTransport, Session, SessionConfig, SessionError,
    TcpTransport, Transport, TransportError,
};

use input::CliInput;

const EXIT_IO: u8 = 1;
const EXIT_UNKNOWN_HOST: u8 = 3;

/// Interactive terminal for line-oriented command/response devices.
#[derive(Parser, Debug)]
#[command(name = "wireline", version, about, group(ArgGroup::new("target").required(true)))]
struct Args {
    /// Host name or address to connect to
    #[arg(short, long, value_name = "HOST", group = "target")]
    ip: Option<String>,

    /// TCP port
    #[arg(short, long, value_name = "PORT", default_value_t = 23)]
    port: u16,

    /// Serial device to open instead of a socket
    #[arg(short, long, value_name = "DEVICE", group = "target")]
    device: Option<String>,

    /// Baud rate for the serial device
    #[arg(short, long, value_name = "RATE", default_value_t = 115_200)]
    baud: u32,

    /// Reply lines to expect per command; 0 or less drains until quiet
    #[arg(
        short = '#',
        long,
        value_name = "N",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    expect_lines: i64,

    /// Milliseconds to wait for each reply line
    #[arg(short, long, value_name = "MS", default_value_t = 1000)]
    wait: u64,

    /// Connect timeout in milliseconds
    #[arg(short, long, value_name = "MS", default_value_t = 2000)]
    timeout: u64,

    /// Terminate sent lines with a carriage return
    #[arg(short = 'r', long = "return")]
    carriage_return: bool,

    /// Terminate sent lines with a newline
    #[arg(short, long)]
    newline: bool,

    /// Terminate sent lines with carriage return + newline
    #[arg(long)]
    crlf: bool,

    /// Uppercase outgoing commands
    #[arg(short, long)]
    uppercase: bool,

    /// Close the session after a reply ending with this word
    #[arg(short = 'B', long = "bye", value_name = "WORD")]
    goodbye: Option<String>,

    /// Treat input lines starting with this prefix as comments
    #[arg(long, value_name = "PREFIX")]
    comment: Option<String>,

    /// Prefix for the quit/sleep/date escape commands
    #[arg(long, value_name = "PREFIX")]
    escape: Option<String>,

    /// Interactive prompt
    #[arg(short = 'P', long, value_name = "PROMPT", default_value = wireline::DEFAULT_PROMPT)]
    prompt: String,

    /// History file (default: $XDG_DATA_HOME/wireline/history)
    #[arg(short = 'H', long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Only print what the device sends, never transmit
    #[arg(short, long)]
    listen: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Command to send single-shot instead of going interactive
    #[arg(value_name = "COMMAND")]
    command: Vec<String>,
}

impl Args {
    fn frame_pattern(&self) -> &'static str {
        if self.carriage_return {
            "{0}\r"
        } else if self.newline {
            "{0}\n"
        } else if self.crlf {
            "{0}\r\n"
        } else {
            "{0}"
        }
    }

    fn collect_policy(&self) -> CollectPolicy {
        let window = Duration::from_millis(self.wait);
        if self.expect_lines <= 0 {
            CollectPolicy::drain(window)
        } else {
            CollectPolicy::fixed(self.expect_lines as usize, window)
        }
    }

    fn history_file(&self) -> Option<PathBuf> {
        if self.history.is_some() {
            return self.history.clone();
        }
        default_history_file()
    }
}

/// `$XDG_DATA_HOME/wireline/history`, falling back to `~/.local/share`.
fn default_history_file() -> Option<PathBuf> {
    let data_home = std::env::var_os("XDG_DATA_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".local").join("share")))?;
    Some(data_home.join("wireline").join("history"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("{err}");
            return ExitCode::from(EXIT_IO);
        }
    };
    let result = runtime.block_on(run(args));
    // a prompt read abandoned by an interrupt keeps its blocking thread
    // parked until the user presses Enter; shut down without joining it
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            match err {
                Error::Transport(TransportError::UnknownHost { .. }) => {
                    ExitCode::from(EXIT_UNKNOWN_HOST)
                }
                _ => ExitCode::from(EXIT_IO),
            }
        }
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let transport = open_transport(&args).await?;
    let config = SessionConfig {
        template: FrameTemplate::parse(args.frame_pattern())?,
        uppercase: args.uppercase,
        policy: args.collect_policy(),
        prompt: args.prompt.clone(),
        goodbye_word: args.goodbye.clone(),
        comment_prefix: args.comment.clone(),
        escape_prefix: args.escape.clone(),
    };
    let mut session = Session::new(transport, config);

    let result = if args.listen {
        listen(&mut session).await
    } else if !args.command.is_empty() {
        single_shot(&mut session, &args.command.join(" ")).await
    } else {
        interactive(&mut session, &args).await
    };
    session.close().await;
    result
}

async fn open_transport(args: &Args) -> Result<Box<dyn Transport>, Error> {
    if let Some(host) = &args.ip {
        let timeout = Duration::from_millis(args.timeout);
        let transport = TcpTransport::connect(host, args.port, timeout).await?;
        info!("connected to {host}:{}", args.port);
        Ok(Box::new(transport))
    } else if let Some(device) = &args.device {
        let transport = SerialTransport::open(device, args.baud)?;
        info!("opened {device} at {} baud", args.baud);
        Ok(Box::new(transport))
    } else {
        unreachable!("clap requires a connection target")
    }
}

async fn listen(session: &mut Session) -> Result<(), Error> {
    let mut out = io::stdout();
    tokio::select! {
        result = session.run_listen(&mut out) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            Ok(())
        }
    }
}

async fn single_shot(session: &mut Session, command: &str) -> Result<(), Error> {
    let response = session.send_once(command).await?;
    let mut out = io::stdout();
    for line in &response.lines {
        writeln!(out, "{line}").map_err(|err| Error::Session(SessionError::Output(err)))?;
    }
    Ok(())
}

async fn interactive(session: &mut Session, args: &Args) -> Result<(), Error> {
    let mut input = CliInput::create(args.history_file());
    let mut out = io::stdout();
    let result = tokio::select! {
        result = session.run_interactive(&mut input, &mut out) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            Ok(())
        }
    };
    input.save_history();
    result
}

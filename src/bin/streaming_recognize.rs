use anyhow::{Context, Result};
use clap::Parser;
use speechpipe::CommonArgs;
use speechpipe_audio::DeviceManager;
use speechpipe_client::{StreamingPipeline, StreamingSession};
use speechpipe_core::SpeechConfig;
use std::io::Write;

const USAGE: &str = "Usage: streaming-recognize
env SOGOU_SPEECH_ENDPOINT, SOGOU_SPEECH_APPID, SOGOU_SPEECH_TOKEN
must be set (or pass --config).
";

#[derive(Parser)]
#[command(
    name = "streaming-recognize",
    about = "Stream microphone audio to the speech API and print interim results",
    long_about = "Stream microphone audio to the speech API and print interim results.\n\n\
        Runs until Ctrl-C or SIGTERM. If the server ends the stream first, the \
        client shuts down and exits normally."
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Input device name ("default" for the host default)
    #[arg(short, long, default_value = "default")]
    device: String,

    /// List input devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn list_devices(manager: &DeviceManager) -> Result<()> {
    for name in manager.input_device_names()? {
        println!("{}", name);
    }
    Ok(())
}

const BANNER: &str = "Start streaming-recognize.  Press Ctrl-C to stop.";

/// Results go to `out`, which also receives the banner before any setup.
async fn run<W>(cli: &Cli, config: &SpeechConfig, mut out: W) -> Result<()>
where
    W: Write + Send + 'static,
{
    writeln!(out, "{}", BANNER)?;
    out.flush()?;

    let manager = DeviceManager::new();
    // `_node` owns the device stream; it must stay alive until shutdown.
    let (_node, frames) = speechpipe_audio::open_capture(&manager, &cli.device)
        .with_context(|| format!("failed to open input device '{}'", cli.device))?;

    let client = speechpipe_client::connect(config)
        .await
        .context("failed to connect to the speech service")?;
    let session = StreamingSession::open(client, config)?;

    let mut pipeline = StreamingPipeline::start(session, frames, out);

    tokio::select! {
        res = speechpipe::shutdown_signal() => {
            res.context("failed to listen for shutdown signal")?;
            println!("Exiting.");
        }
        res = pipeline.closed() => {
            res?;
            tracing::info!("server ended the stream");
        }
    }

    let summary = pipeline.shutdown().await?;
    tracing::info!(
        frames = summary.capture.frames,
        captured_bytes = summary.capture.bytes,
        sent_bytes = summary.send.bytes,
        chunks = summary.send.chunks,
        results = summary.results,
        "streaming session finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.list_devices {
        if let Err(e) = list_devices(&DeviceManager::new()) {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = match cli.common.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprint!("{}", USAGE);
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = speechpipe::init_tracing(cli.common.log_filter(&config)) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, &config, std::io::stdout()).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

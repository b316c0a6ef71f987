use anyhow::{Context, Result};
use clap::Parser;
use speechpipe::CommonArgs;
use speechpipe_core::SpeechConfig;
use std::path::PathBuf;

const USAGE: &str = "Usage: recognize <AUDIOFILE>
env SOGOU_SPEECH_ENDPOINT, SOGOU_SPEECH_APPID, SOGOU_SPEECH_TOKEN
must be set (or pass --config).
";

#[derive(Parser)]
#[command(
    name = "recognize",
    about = "Send an audio file to the speech API and print its transcript",
    after_help = "Audio file must be 16-bit signed little-endian encoded with a sample rate of 16000."
)]
struct Cli {
    /// Raw 16-bit signed little-endian PCM, 16000 Hz, mono
    audiofile: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

async fn run(cli: &Cli, config: &SpeechConfig) -> Result<()> {
    // Read before dialing so a bad path never touches the network.
    let audio = speechpipe_audio::load_audio(&cli.audiofile)?;
    tracing::debug!(path = %cli.audiofile.display(), bytes = audio.len(), "loaded audio");

    let mut client = speechpipe_client::connect(config)
        .await
        .context("failed to connect to the speech service")?;

    let mut out = std::io::stdout();
    speechpipe_client::recognize_audio(&mut client, config, audio, &mut out).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

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

    if let Err(e) = run(&cli, &config).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use voiceover_rs::{
    config::{VoiceoverConfigBuilder, DEFAULT_OUTPUT_PATH},
    dictionary::DEFAULT_DICTIONARY_PATH,
    driver::LineEvent,
    engines::elevenlabs::{resolve_voice, DEFAULT_BASE_URL, VOICE_CATALOG},
    input::InputSource,
    ledger::{CredentialLedger, FileLedger, DEFAULT_LEDGER_PATH, DEFAULT_QUOTA},
    RunError,
};

#[derive(Debug, Parser)]
#[command(name = "voiceover")]
#[command(about = "Turn each line of a script or subtitle file into an MP3 clip")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Synthesize every non-blank line and bundle the clips into a zip
    Synthesize(SynthesizeArgs),
    /// List the built-in voices
    Voices,
    /// Show per-key usage from the ledger
    Ledger(LedgerArgs),
}

#[derive(Debug, Args)]
struct LedgerArgs {
    /// JSON file with the API keys and their usage
    #[arg(long, env = "VOICEOVER_LEDGER", default_value = DEFAULT_LEDGER_PATH)]
    ledger: PathBuf,

    /// Words each key may be charged
    #[arg(long, default_value_t = DEFAULT_QUOTA)]
    quota: u64,
}

#[derive(Debug, Args)]
struct SynthesizeArgs {
    /// A .txt or .srt file to read lines from
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Text to synthesize, one clip per line (stdin when neither this nor --file is given)
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Catalog voice slug (see `voiceover voices`) or a raw ElevenLabs voice id
    #[arg(long, default_value = "bella")]
    voice: String,

    #[command(flatten)]
    ledger: LedgerArgs,

    /// JSON object mapping words to how they should be spoken
    #[arg(long, env = "VOICEOVER_DICTIONARY", default_value = DEFAULT_DICTIONARY_PATH)]
    dictionary: PathBuf,

    /// Where to write the zip of clips
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    #[arg(long, env = "VOICEOVER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Command::Synthesize(args) => synthesize(args),
        Command::Voices => {
            for voice in VOICE_CATALOG {
                println!("{:<12} {:<20} {}", voice.slug, voice.label, voice.voice_id);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Ledger(args) => show_ledger(args),
    }
}

fn synthesize(args: SynthesizeArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let source = match (&args.file, args.text) {
        (Some(path), _) => InputSource::from_path(path)?,
        (None, Some(text)) => InputSource::Pasted(text),
        (None, None) => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            InputSource::Pasted(text)
        }
    };
    let lines = source.extract_lines();

    let mut builder = VoiceoverConfigBuilder::default();
    builder
        .ledger_path(args.ledger.ledger)
        .quota(args.ledger.quota)
        .dictionary_path(args.dictionary)
        .output_path(args.output)
        .base_url(args.base_url)
        .voice_id(resolve_voice(&args.voice));
    if let Some(secs) = args.timeout {
        builder.request_timeout(Duration::from_secs(secs));
    }
    let config = builder.build()?;

    let mut driver = config.driver()?;
    let report = match driver.run(&lines, print_event) {
        Ok(report) => report,
        Err(RunError::EmptyInput) => {
            eprintln!("⚠️  No content to synthesize.");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return Err(e.into()),
    };

    std::fs::write(&config.output_path, &report.archive)?;
    println!(
        "Saved {}/{} clips ({} words) to {}",
        report.results.len(),
        report.total_lines,
        report.words_charged(),
        config.output_path.display()
    );

    Ok(if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_event(event: &LineEvent<'_>) {
    match event {
        LineEvent::Started { index, text } => log::info!("Line {index}: {text}"),
        LineEvent::Synthesized { result } => println!(
            "✅ line {} ({} words, {} bytes)",
            result.index,
            result.word_count,
            result.size_bytes()
        ),
        LineEvent::Failed { index, error } => eprintln!("❌ line {index}: {error}"),
    }
}

fn show_ledger(args: LedgerArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut ledger = FileLedger::with_quota(&args.ledger, args.quota);
    let credentials = ledger.credentials()?;
    let next = ledger.select_available().ok().map(|c| c.index);

    for (index, credential) in credentials.iter().enumerate() {
        let marker = if Some(index) == next { "*" } else { " " };
        println!(
            "{marker}{index:>3}  {:<8} {:>8} used {:>8} left",
            credential.masked_key(),
            credential.used,
            args.quota.saturating_sub(credential.used)
        );
    }
    if next.is_none() {
        println!("All keys have used up their quota.");
    }
    Ok(ExitCode::SUCCESS)
}

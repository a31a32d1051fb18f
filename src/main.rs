use brief_client::artifact::RecordingLauncher;
use brief_client::presentation::render;
use brief_client::transport::{HttpReply, ScriptedTransport};
use brief_client::{Admission, ClientConfig, ResponseShape, SubmissionController};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DRY_RUN_REPLY: &str = r#"{
    "project_dir": "/tmp/generated_projects/sample-app",
    "tasks": [
        {"name": "Setup Backend", "description": "Initialize FastAPI backend", "assigned_to": "Backend"},
        {"name": "Setup Frontend", "description": "Initialize React app", "assigned_to": "Frontend"},
        {"name": "Integrate APIs", "description": "Connect frontend and backend", "assigned_to": "Coordinator"}
    ],
    "message": "Project generated successfully"
}"#;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(about = "Describe a project, get back a generated plan and archive")]
struct Args {
    /// Generation service base URL.
    #[arg(long, default_value = brief_client::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Use the wrapped `{ result: { summary, tasks } }` endpoint.
    #[arg(long)]
    wrapped: bool,

    /// Where downloaded archives are written.
    #[arg(long, default_value = ".")]
    download_dir: PathBuf,

    /// Answer every brief with a canned plan instead of calling the service.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "brief_client=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let shape = if args.wrapped {
        ResponseShape::Wrapped
    } else {
        ResponseShape::Flat
    };
    let config = ClientConfig::new()
        .with_base_url(&args.base_url)
        .with_shape(shape)
        .with_download_dir(args.download_dir);

    let mut controller = if args.dry_run {
        SubmissionController::new(
            config,
            Arc::new(ScriptedTransport::repeating(HttpReply::ok(DRY_RUN_REPLY))),
            Arc::new(RecordingLauncher::new()),
        )
    } else {
        SubmissionController::http(config)?
    };

    println!("Describe your project idea. `:download` fetches the archive, `:quit` exits.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            ":quit" | ":q" => break,
            ":download" => {
                controller.retrieve_artifact();
                continue;
            }
            _ => {}
        }

        match controller.submit(line.trim_end_matches(['\r', '\n'])) {
            Ok(Admission::Accepted) => {
                print!("{}", render(&controller));
                while !controller.poll() {
                    print!(".");
                    stdout.flush()?;
                    thread::sleep(POLL_INTERVAL);
                }
                println!();
            }
            Ok(Admission::Busy) | Err(_) => {}
        }
        print!("{}", render(&controller));
    }

    // Joins downloads still in flight.
    drop(controller);
    Ok(())
}

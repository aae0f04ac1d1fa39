use askql::{Answer, Config, Pipeline, Result, seed};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::{io::AsyncWriteExt as _, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "\nAsk in plain English (or 'exit'): ";

#[tokio::main]
async fn main() -> Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "askql=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    // One connection: questions are asked one at a time.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;
    info!("Connected to {}", config.database_url);

    if config.seed {
        seed(&pool).await?;
    }

    let pipeline = Pipeline::from_config(pool.clone(), &config)?;
    let result = repl(&pipeline).await;
    pool.close().await;
    result
}

async fn repl(pipeline: &Pipeline<askql::CompletionClient>) -> Result {
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin_lines();
    let interrupts = Interrupts::default();
    interrupts.listen();

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let line = tokio::select! {
            _ = interrupts.shutdown.cancelled() => break,
            line = lines.recv() => line.transpose()?,
        };
        let Some(question) = line else {
            break;
        };
        if is_exit(&question) {
            break;
        }

        let cancel = interrupts.begin();
        let answer = pipeline.ask_with_cancel(&question, &cancel).await;
        interrupts.finish();

        stdout.write_all(render(&answer).as_bytes()).await?;
    }
    Ok(())
}

/// Only the exit check ignores surrounding whitespace; the question itself is
/// passed on as typed.
fn is_exit(line: &str) -> bool {
    line.trim().to_lowercase().starts_with("exit")
}

/// Lines from stdin, read on a plain thread so a pending read does not hold
/// up runtime shutdown.
fn stdin_lines() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Ctrl-C abandons the question in flight, or ends the session when idle.
#[derive(Clone, Default)]
struct Interrupts {
    in_flight: Arc<Mutex<Option<CancellationToken>>>,
    shutdown: CancellationToken,
}

impl Interrupts {
    fn listen(&self) {
        let interrupts = self.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Cannot listen for Ctrl-C: {e}");
                    return;
                }
                if !interrupts.interrupt() {
                    return;
                }
            }
        });
    }

    /// Handle one Ctrl-C. Returns whether the session goes on.
    fn interrupt(&self) -> bool {
        match self.slot().take() {
            Some(cancel) => {
                cancel.cancel();
                true
            }
            None => {
                self.shutdown.cancel();
                false
            }
        }
    }

    fn begin(&self) -> CancellationToken {
        let cancel = CancellationToken::new();
        *self.slot() = Some(cancel.clone());
        cancel
    }

    fn finish(&self) {
        self.slot().take();
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn render(answer: &Answer) -> String {
    let mut out = String::new();
    if let Some(statement) = &answer.statement {
        out.push_str(&format!("Generated SQL: {statement}\n"));
    }
    match &answer.result {
        Ok(rows) => out.push_str(&format!("Result:\n{rows}\n")),
        Err(e) => out.push_str(&format!("Error: {e}\n")),
    }
    out
}

//! Replay a navigation script against an in-memory native history.

use anyhow::{Context, Result};
use hashnav::{History, HistoryConfig, LocationSnapshot, MemoryHistory, MemorySession};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::script::{parse_script, Step};

/// Replay options.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Address the simulated tab starts at.
    pub initial: String,
    /// Print JSON snapshots instead of a one-line stack.
    pub json: bool,
    /// Time allowed for a simulated gesture to be handled.
    pub settle: Duration,
}

/// Run the replay command.
pub async fn run(script: &Path, config: HistoryConfig, options: &ReplayOptions) -> Result<()> {
    let source = tokio::fs::read_to_string(script)
        .await
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let steps = parse_script(&source)?;

    let native = MemoryHistory::new(&options.initial);
    let history = History::new(config, native.clone(), MemorySession::new())
        .context("Failed to initialize history")?;

    print_stack("init", &history.stack(), options.json)?;

    for (line, step) in steps {
        debug!(line, %step, "replaying");
        execute(&history, &native, &step)
            .await
            .with_context(|| format!("line {line}: `{step}` failed"))?;
        if step.is_gesture() {
            tokio::time::sleep(options.settle).await;
        }
        print_stack(&step.to_string(), &history.stack(), options.json)?;
    }

    history.destroy().await?;
    Ok(())
}

async fn execute(history: &History, native: &MemoryHistory, step: &Step) -> Result<()> {
    match step {
        Step::Push { path, data } => {
            history.push(path, data.clone()).await?;
        }
        Step::Replace { path, data } => {
            history.replace(path, data.clone()).await?;
        }
        Step::Back(n) => {
            history.goback(*n).await?;
        }
        Step::BackTo(path) => {
            history.goback(path.as_str()).await?;
        }
        Step::Reload => {
            history.reload().await?;
        }
        Step::UserBack => native.user_back(),
        Step::UserForward => native.user_forward(),
        Step::UserEdit(path) => native.user_navigate(path),
        Step::Show => {}
    }
    Ok(())
}

fn print_stack(label: &str, stack: &[LocationSnapshot], json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(stack).context("Failed to encode stack")?;
        println!("{line}");
    } else {
        let hrefs: Vec<&str> = stack.iter().map(LocationSnapshot::href).collect();
        println!("{label:<24} {}", hrefs.join(" > "));
    }
    Ok(())
}

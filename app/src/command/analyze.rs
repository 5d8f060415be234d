use harbor_core::{AnalysisReport, BatchOutcome};
use std::io::Read;

/// Input for the analyze command. Reads stdin when no text is given.
#[derive(Debug, Clone)]
pub struct AnalyzeInput {
    pub text: Option<String>,
}

/// Strategy for extracting maritime terms from text and storing them.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeStrategy;

impl super::CommandStrategy for AnalyzeStrategy {
    type Input = AnalyzeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let text = match input.text {
            Some(text) => text,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        if text.trim().is_empty() {
            println!("Nothing to analyze.");
            return Ok(());
        }

        let mut desk = super::open_desk().await?;
        super::prime_local_listing(&mut desk).await;

        let report = desk.analyze(&text).await;
        super::print_found(&report.found);
        print_outcomes(&report);
        println!();
        super::print_keywords(desk.keywords());

        if let Some(message) = desk.error() {
            anyhow::bail!(message.to_string());
        }
        Ok(())
    }
}

fn print_outcomes(report: &AnalysisReport) {
    if report.items.is_empty() {
        return;
    }

    println!();
    for item in &report.items {
        match &item.outcome {
            BatchOutcome::Inserted(keyword) => {
                println!("  + {} ({}) id {}", item.term, item.category, keyword.id);
            }
            BatchOutcome::Skipped => {
                println!("  = {} ({}) already stored", item.term, item.category);
            }
            BatchOutcome::Failed(reason) => {
                println!("  ! {} ({}) {reason}", item.term, item.category);
            }
        }
    }
    println!(
        "Stored {}, skipped {}, failed {}",
        report.inserted(),
        report.skipped(),
        report.failed()
    );
}

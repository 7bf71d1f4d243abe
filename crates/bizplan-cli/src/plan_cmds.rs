//! Plan subcommands: inspect and export persisted plans.

use anyhow::{Context, Result, bail};
use sqlx::PgPool;

use bizplan_db::queries::plans;

use crate::PlanCommands;

pub async fn run_plan_command(command: PlanCommands, pool: &PgPool) -> Result<()> {
    match command {
        PlanCommands::Show {
            business_name,
            industry,
        } => match (business_name, industry) {
            (Some(name), Some(industry)) => show_one(pool, &name, &industry).await,
            (None, None) => show_all(pool).await,
            _ => bail!("provide both a business name and an industry, or neither"),
        },
        PlanCommands::Export {
            business_name,
            industry,
            output,
        } => export_plan(pool, &business_name, &industry, output.as_deref()).await,
    }
}

/// List all persisted plans, newest first.
async fn show_all(pool: &PgPool) -> Result<()> {
    let records = plans::list_plans(pool).await?;

    if records.is_empty() {
        println!("No plans found.");
        return Ok(());
    }

    println!(
        "{:<30} {:<24} {:>8}  {}",
        "BUSINESS", "INDUSTRY", "CHARS", "UPDATED"
    );
    for record in &records {
        println!(
            "{:<30} {:<24} {:>8}  {}",
            record.business_name,
            record.industry,
            record.plan_text.len(),
            record.updated_at.format("%Y-%m-%d %H:%M"),
        );
    }

    Ok(())
}

/// Print one plan in full.
async fn show_one(pool: &PgPool, business_name: &str, industry: &str) -> Result<()> {
    let record = plans::find_plan(pool, business_name, industry)
        .await?
        .with_context(|| format!("no plan found for {business_name:?} in {industry:?}"))?;

    println!("Business: {}", record.business_name);
    println!("Industry: {}", record.industry);
    println!("Created:  {}", record.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated:  {}", record.updated_at.format("%Y-%m-%d %H:%M"));
    println!();
    println!("{}", record.plan_text);

    Ok(())
}

/// Write one plan's raw text to a file or stdout.
///
/// This is the plain-text export contract; PDF and word-processor rendering
/// stay client-side.
async fn export_plan(
    pool: &PgPool,
    business_name: &str,
    industry: &str,
    output: Option<&str>,
) -> Result<()> {
    use std::io::Write;

    let record = plans::find_plan(pool, business_name, industry)
        .await?
        .with_context(|| format!("no plan found for {business_name:?} in {industry:?}"))?;

    let mut writer: Box<dyn Write> = if let Some(path) = output {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {path}"))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };

    writeln!(writer, "{}", record.plan_text)?;

    if let Some(path) = output {
        println!(
            "Exported plan for {business_name:?} ({} chars) to {path}",
            record.plan_text.len()
        );
    }

    Ok(())
}

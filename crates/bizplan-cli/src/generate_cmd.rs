//! One-shot plan generation from the terminal.

use anyhow::Result;

use bizplan_core::PlanService;

/// Run the full pipeline for a single pair and print the plan text.
pub async fn run_generate(
    service: &PlanService,
    business_name: &str,
    industry: &str,
) -> Result<()> {
    let text = service.generate_plan(business_name, industry).await?;
    println!("{text}");
    Ok(())
}

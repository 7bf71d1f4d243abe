//! Prompt construction for plan generation.

/// Build the single-turn user prompt for a `(business_name, industry)` pair.
///
/// Target market and USPs are deliberately not included: the boundary accepts
/// them but the generation prompt is keyed on name and industry only.
pub fn build_plan_prompt(business_name: &str, industry: &str) -> String {
    format!("Create a business plan for {business_name} in the {industry} industry.")
}

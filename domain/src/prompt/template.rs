//! Payload templates for each orchestration stage.
//!
//! The orchestration core only decides how pieces are combined; the
//! wording lives here in one place so every stage builds its executor
//! payload the same way.

/// Templates for building executor payloads at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Payload for one pipeline step: the step's instruction combined
    /// with the previous step's output (never the original input).
    pub fn step_payload(instruction: &str, input: &str) -> String {
        format!("{}\n\nInput:\n{}", instruction, input)
    }

    /// Payload for one parallel-map item: the shared instruction applied
    /// to one input. An empty instruction leaves the input unchanged.
    pub fn map_payload(instruction: &str, input: &str) -> String {
        if instruction.is_empty() {
            input.to_string()
        } else {
            format!("{}\n\nInput:\n{}", instruction, input)
        }
    }

    /// Payload for one delegated worker: its role description framing the
    /// shared task.
    pub fn worker_payload(role: &str, task: &str) -> String {
        format!("{}\n\nTask:\n{}\n\nProvide your analysis below:", role, task)
    }

    /// Payload for the synthesis stage: embeds the original task and all
    /// collected worker reports, and instructs the call to reconcile them
    /// into one recommendation.
    pub fn synthesis_payload<'a>(
        task: &str,
        reports: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> String {
        let report_map: serde_json::Map<String, serde_json::Value> = reports
            .into_iter()
            .map(|(name, report)| (name.to_string(), serde_json::Value::from(report)))
            .collect();
        let reports_json = serde_json::to_string_pretty(&report_map)
            .unwrap_or_else(|_| "{}".to_string());

        format!(
            r#"You are the swarm coordinator. You delegated a task to specialized workers and received their reports.

Your responsibilities:
1. Analyze each worker's findings
2. Identify agreements and conflicts between workers
3. Resolve conflicts using expert judgment
4. Synthesize a comprehensive final answer
5. Highlight critical issues flagged by multiple workers
6. Make a clear final recommendation

Original Task:
{}

Worker Reports:
{}

Provide your synthesis with these sections:
## Summary
## Key Agreements
## Conflicts and Resolutions
## Critical Issues
## Final Recommendation

Your synthesis:"#,
            task, reports_json
        )
    }

    /// Payload for merging independent `(input, output)` analyses from a
    /// parallel map into one summary.
    pub fn map_summary_payload<'a>(
        instruction: &str,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> String {
        let mut payload = format!(
            "You reviewed multiple items independently. Merge the individual \
analyses below into one coherent summary.\n\nOriginal instruction:\n{}\n",
            instruction
        );
        for (input, output) in pairs {
            payload.push_str(&format!("\n--- {} ---\n{}\n", input, output));
        }
        payload
    }

    /// Payload for one voting ballot: the task, the option list, and the
    /// delimited answer format the ballot parser expects.
    pub fn voting_payload(task: &str, options: &[String], tag: &str) -> String {
        let options_json =
            serde_json::to_string_pretty(options).unwrap_or_else(|_| "[]".to_string());

        format!(
            r#"You are a voter in a consensus system. Analyze the task and vote for the BEST option.

Task:
{}

Options:
{}

Vote for exactly ONE option. Provide your reasoning and vote:

<reasoning>Your analysis of each option and why you chose this one</reasoning>
<{tag}>The exact option text you're voting for</{tag}>"#,
            task, options_json
        )
    }
}

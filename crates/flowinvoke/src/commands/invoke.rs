//! Invoke command - run a flow and report its result.

use std::io::Write;

use anyhow::Result;
use flowinvoke_client::{ExecutionLog, FlowRunner, InputSet, OoClient, RunReport};

use super::Context;

/// Parse a `--input key=value` argument.
///
/// Splits on the first `=`, so values may themselves contain `=`.
pub fn parse_input(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("input name is empty in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Run the flow.
pub fn run(flow_id: &str, inputs: InputSet, ctx: &Context) -> Result<()> {
    let client = OoClient::builder()
        .host(ctx.host.as_str())
        .credentials(ctx.credentials.clone())
        .build()?;
    let runner = FlowRunner::new(client).with_policy(ctx.policy);

    let started = runner.start(flow_id, inputs)?;
    if ctx.async_mode {
        println!("{}", started.handle);
        return Ok(());
    }

    let report = runner.wait(started.handle)?;
    write_report(&mut std::io::stdout().lock(), &report, ctx.verbose)?;

    if let Err(err) = report.ensure_resolved() {
        write_failure(&mut std::io::stderr().lock(), &report.log)?;
        return Err(err.into());
    }
    Ok(())
}

/// Print the flow outputs and status, or the whole log when verbose.
fn write_report(out: &mut impl Write, report: &RunReport, verbose: bool) -> Result<()> {
    if verbose {
        writeln!(out, "{}", serde_json::to_string_pretty(&report.log)?)?;
        return Ok(());
    }

    for (name, value) in report.log.outputs() {
        writeln!(out, "{}={}", name, render_value(value))?;
    }
    if let Some(status) = report.outcome.status_label() {
        writeln!(out, "Status={}", status)?;
    }
    Ok(())
}

/// Print the execution summary for a run that did not resolve.
fn write_failure(out: &mut impl Write, log: &ExecutionLog) -> Result<()> {
    writeln!(out, "Something went wrong!")?;
    writeln!(out, "Flow Summary:")?;
    writeln!(out, "{}", serde_json::to_string_pretty(&log.execution_summary)?)?;
    Ok(())
}

/// Strings print bare, null prints empty, anything else as JSON.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

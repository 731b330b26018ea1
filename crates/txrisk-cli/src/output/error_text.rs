use txrisk_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    if error.is_empty_input() {
        return render_empty_input_prompt(error);
    }

    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];
    if let Some(row) = error.row() {
        lines.push(format!("  Row:      {row}"));
    }
    lines.push(String::new());
    lines.push("What to do next:".to_string());
    lines.extend(numbered_steps(error, "Retry the command."));

    lines.join("\n")
}

/// Empty input is a prompt, not a failure.
fn render_empty_input_prompt(error: &ClientError) -> String {
    let mut lines = vec![
        "No transactions to screen yet.".to_string(),
        String::new(),
        format!("  {}", error.message),
        String::new(),
        "To get started:".to_string(),
    ];
    lines.extend(numbered_steps(error, "Run `txrisk classify --help`."));
    lines.join("\n")
}

fn numbered_steps(error: &ClientError, fallback: &str) -> Vec<String> {
    if error.recovery_steps.is_empty() {
        return vec![format!("  1. {fallback}")];
    }
    error
        .recovery_steps
        .iter()
        .enumerate()
        .map(|(index, step)| format!("  {}. {step}", index + 1))
        .collect()
}

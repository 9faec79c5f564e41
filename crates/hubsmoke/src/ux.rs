use console::style;
use hubsmoke_core::report::CheckOutcome;
use indicatif::{ProgressBar, ProgressStyle};

pub fn present_error(error: anyhow::Error) {
    let error_text = style("ERROR:").red().bold();
    eprintln!("\n{error_text} {}", error);
}

/// One line per check: PASS with the observed status, or FAIL with the
/// expected-vs-actual pair and the response body for diagnosis.
pub fn format_check_line(check: &CheckOutcome) -> String {
    if check.passed() {
        format!(
            "{} {} ({})",
            style("PASS").green().bold(),
            check.name,
            check.actual
        )
    } else if check.actual == 0 {
        format!(
            "{} {} (expected {}, no response: {})",
            style("FAIL").red().bold(),
            check.name,
            check.expected,
            check.body.as_deref().unwrap_or("unknown error")
        )
    } else {
        format!(
            "{} {} (expected {}, got {}: {})",
            style("FAIL").red().bold(),
            check.name,
            check.expected,
            check.actual,
            check.body.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug)]
pub struct SuiteSpinner {
    spinner: ProgressBar,
}

impl SuiteSpinner {
    pub fn new(msg: String) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.set_message(msg);
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { spinner }
    }

    pub fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

//! Run reporting: the inspectable bundle table and the debug log text.

use std::time::Duration;

use chrono::{DateTime, Local};
use headlights_core::{Bundle, ParseError, RecordKind};
use serde::Serialize;

use crate::IntrospectionInput;

/// A bundle together with the bucket it was rendered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorizedBundle {
    pub bucket: String,
    #[serde(flatten)]
    pub bundle: Bundle,
}

/// One recoverable error in serializable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedError {
    pub kind: RecordKind,
    pub line: String,
    pub message: String,
}

impl From<&ParseError> for ReportedError {
    fn from(err: &ParseError) -> Self {
        Self {
            kind: err.kind(),
            line: err.line().to_string(),
            message: err.to_string(),
        }
    }
}

/// The aggregated state of a run, for the `inspect` output.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub bundle_count: usize,
    pub record_count: usize,
    pub bundles: Vec<CategorizedBundle>,
    pub errors: Vec<ReportedError>,
}

impl InspectReport {
    pub fn new(bundles: &[CategorizedBundle], errors: &[ParseError]) -> Self {
        Self {
            bundle_count: bundles.len(),
            record_count: bundles.iter().map(|b| b.bundle.record_count()).sum(),
            bundles: bundles.to_vec(),
            errors: errors.iter().map(ReportedError::from).collect(),
        }
    }
}

/// Everything needed to troubleshoot a run, rendered as plain text.
///
/// Sections appear in a fixed order: `DATE`, `PLATFORM`, `ERRORS`,
/// `SCRIPTNAMES`, one section per category listing, `MENUS`, then timings.
#[derive(Debug, Clone)]
pub struct DebugLog {
    pub generated_at: DateTime<Local>,
    pub platform: String,
    pub errors: Vec<String>,
    pub scriptnames: String,
    pub blocks: Vec<(RecordKind, String)>,
    pub menus: Vec<String>,
    pub elapsed: Duration,
    /// Time the host spent collecting the listings, when it reported one.
    pub host_elapsed: Option<Duration>,
}

impl DebugLog {
    /// Captures the input and output of a run. `errors` are already
    /// formatted so a fatal cause can lead the list.
    pub fn new(
        input: &IntrospectionInput,
        menus: &[String],
        errors: Vec<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            generated_at: Local::now(),
            platform: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            errors,
            scriptnames: input.scriptnames.clone(),
            blocks: input
                .blocks
                .iter()
                .map(|(kind, text)| (*kind, text.clone()))
                .collect(),
            menus: menus.to_vec(),
            elapsed,
            host_elapsed: None,
        }
    }

    pub fn with_host_elapsed(mut self, elapsed: Duration) -> Self {
        self.host_elapsed = Some(elapsed);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("Headlights debug log\n\n");
        out.push_str(&format!(
            "DATE: {}\n",
            self.generated_at.format("%a %b %e %H:%M:%S %Y")
        ));
        out.push_str(&format!("PLATFORM: {}\n\n", self.platform));
        out.push_str("Disable debug mode when you are done.\n\n");

        out.push_str("ERRORS:\n");
        for error in &self.errors {
            out.push_str(&format!("{error}\n"));
        }

        out.push_str(&format!("\nSCRIPTNAMES:\n{}\n", self.scriptnames.trim_end()));
        for (kind, text) in &self.blocks {
            out.push_str(&format!(
                "\n{}:\n{}\n",
                kind.label().to_uppercase(),
                text.trim_end()
            ));
        }

        out.push_str("\nMENUS:\n");
        for menu in &self.menus {
            out.push_str(&format!("{menu}\n"));
        }

        out.push('\n');
        if let Some(host) = self.host_elapsed {
            out.push_str(&format!(
                "Host listings collected in {:.2} seconds\n",
                host.as_secs_f64()
            ));
        }
        out.push_str(&format!(
            "Menus generated in {:.2} seconds\n",
            self.elapsed.as_secs_f64()
        ));
        out
    }
}

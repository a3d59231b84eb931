//! Output formatting for menu runs and inspect reports.

use headlights_core::ParseError;

use crate::categorize::BUFFER_BUCKET;
use crate::render::escape_label;
use crate::report::{InspectReport, ReportedError};

/// Supported menu output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// One `amenu` line per menu.
    #[default]
    Lines,
    /// A script the host can source directly.
    Vim,
    /// Menus and errors as a JSON object.
    Json,
}

/// Supported inspect report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ReportFormat {
    #[default]
    Json,
    Yaml,
}

const MENU_FAILED_MSG: &str = "Warning: Headlights failed to execute menu command. To enable debug mode, see :help headlights-debug";

/// Formats menu lines in the requested output format.
///
/// The `vim` format first removes the buffer-local bucket, which is the
/// only bucket whose contents change between buffers, then wraps every
/// line so one failing menu does not stop the rest.
pub fn format_menus(
    menus: &[String],
    errors: &[ParseError],
    root: &str,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Lines => Ok(menus.iter().map(|menu| format!("{menu}\n")).collect()),
        OutputFormat::Vim => {
            let mut out = format!(
                "try | aunmenu {root}.{} | catch /E329/ | endtry\n",
                escape_label(BUFFER_BUCKET)
            );
            for menu in menus {
                out.push_str(&format!(
                    "try | {menu} | catch // | echomsg '{MENU_FAILED_MSG}' | endtry\n"
                ));
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "menus": menus,
                "errors": errors.iter().map(ReportedError::from).collect::<Vec<_>>(),
            });
            serde_json::to_string_pretty(&value)
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
    }
}

/// Formats an inspect report in the requested output format.
pub fn format_report(report: &InspectReport, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        ReportFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

//! Result handlers that print a performed request in full.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use http::HeaderMap;
use mockmvc_core::application::MvcResult;
use tracing::debug;

use crate::error::TestError;
use crate::result_actions::ResultHandler;

/// Human-readable dump of a result, section by section.
pub struct ResultReport<'a>(pub &'a MvcResult);

fn line(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "{label:>18} = {value}")
}

fn headers(map: &HeaderMap) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(name, value)| format!("{name}:\"{}\"", value.to_str().unwrap_or("<binary>")))
        .collect();
    format!("[{}]", entries.join(", "))
}

fn or_null(value: Option<impl fmt::Display>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let request = result.request();
        let response = result.response();

        writeln!(f, "\nRequest:")?;
        line(f, "HTTP Method", request.method())?;
        line(f, "Request URI", request.request_uri())?;
        line(f, "Query String", or_null(request.query_string()))?;
        line(f, "Parameters", format!("{:?}", request.parameters()))?;
        line(f, "Headers", headers(request.headers()))?;
        line(f, "Body", or_null((!request.body().is_empty()).then(|| request.body_as_string())))?;
        line(
            f,
            "Session Attrs",
            or_null(request.session().map(|s| format!("{:?}", s.attributes()))),
        )?;

        writeln!(f, "\nHandler:")?;
        line(f, "Name", or_null(result.handler().map(|h| h.name())))?;

        writeln!(f, "\nResolved Error:")?;
        line(f, "Type", or_null(result.resolved_error().map(|e| e.type_name())))?;

        writeln!(f, "\nModelAndView:")?;
        let mav = result.model_and_view();
        line(f, "View name", or_null(mav.and_then(|m| m.view_name())))?;
        line(
            f,
            "View",
            or_null(mav.and_then(|m| m.view_instance()).map(|v| format!("{v:?}"))),
        )?;
        match mav {
            Some(mav) if !mav.model().is_empty() => {
                writeln!(f, "{:>18} = ", "Model")?;
                for (name, value) in mav.model() {
                    line(f, "Attribute", name)?;
                    line(f, "value", value)?;
                }
            }
            _ => line(f, "Model", "null")?,
        }

        writeln!(f, "\nFlashMap:")?;
        let flash = result.flash_map();
        if flash.is_empty() {
            line(f, "Attributes", "null")?;
        } else {
            for (name, value) in flash.attributes() {
                line(f, "Attribute", name)?;
                line(f, "value", value)?;
            }
        }

        writeln!(f, "\nResponse:")?;
        line(f, "Status", response.status().as_u16())?;
        line(f, "Error message", or_null(response.error_message()))?;
        line(f, "Headers", headers(response.headers()))?;
        line(f, "Content type", or_null(response.content_type()))?;
        line(f, "Body", response.content_as_string())?;
        line(f, "Forwarded URL", or_null(response.forwarded_url()))?;
        line(f, "Redirected URL", or_null(response.redirected_url()))?;
        let cookies: Vec<String> = response.cookies().iter().map(|c| c.to_string()).collect();
        line(f, "Cookies", format!("[{}]", cookies.join(", ")))
    }
}

/// Print the result to stdout.
pub fn print() -> impl ResultHandler {
    |result: &MvcResult| -> Result<(), TestError> {
        let mut out = io::stdout().lock();
        write!(out, "{}", ResultReport(result))?;
        out.flush()?;
        Ok(())
    }
}

/// Print the result to `writer`.
pub fn print_to<W: Write>(writer: W) -> impl ResultHandler {
    let writer = Mutex::new(writer);
    move |result: &MvcResult| -> Result<(), TestError> {
        let mut writer = writer
            .lock()
            .map_err(|_| io::Error::other("writer lock poisoned"))?;
        write!(writer, "{}", ResultReport(result))?;
        writer.flush()?;
        Ok(())
    }
}

/// Emit the result as a debug-level tracing event.
pub fn log() -> impl ResultHandler {
    |result: &MvcResult| -> Result<(), TestError> {
        debug!(target: "mockmvc_test::print", "{}", ResultReport(result));
        Ok(())
    }
}

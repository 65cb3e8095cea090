//! Operator-assisted sink: the operator types a value once per detection,
//! which is sent to the webhook together with each face's age and smile.

use super::ReportSink;
use super::webhook::{WebhookClient, WebhookValues};
use crate::errors::{AppError, AppResult};
use crate::face::FaceRecord;
use chrono::{DateTime, Local};
use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

pub const PROMPT: &str = ">>>  ";

/// Print the prompt and read one trimmed line. EOF is an error: nobody is
/// left to answer.
pub fn read_entry<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> AppResult<String> {
    writeln!(output, "input Now!")?;
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::Input("console input closed".into()));
    }
    Ok(line.trim().to_string())
}

/// `value1` = operator entry, `value2` = age, `value3` = smile (empty when
/// the API did not return one)
pub fn console_values(entry: &str, face: &FaceRecord) -> WebhookValues {
    let smile = face
        .face_attributes
        .smile
        .map(|s| s.to_string())
        .unwrap_or_default();
    WebhookValues::new(entry, face.face_attributes.age, smile)
}

pub struct ConsoleSink<R, W> {
    client: WebhookClient,
    input: R,
    output: W,
    entry: Option<String>,
}

impl ConsoleSink<StdinLock<'static>, Stdout> {
    pub fn stdio(client: WebhookClient) -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(client, stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleSink<R, W> {
    pub fn new(client: WebhookClient, input: R, output: W) -> Self {
        Self {
            client,
            input,
            output,
            entry: None,
        }
    }
}

impl<R: BufRead, W: Write> ReportSink for ConsoleSink<R, W> {
    fn name(&self) -> &'static str {
        "console"
    }

    fn begin(&mut self, _faces: &[FaceRecord]) -> AppResult<()> {
        self.entry = Some(read_entry(&mut self.input, &mut self.output)?);
        Ok(())
    }

    fn report(&mut self, face: &FaceRecord, _at: &DateTime<Local>) -> AppResult<()> {
        let entry = self.entry.as_deref().unwrap_or_default();
        self.client.trigger(&console_values(entry, face))
    }
}
